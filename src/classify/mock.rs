use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{ClassifyError, ClassifyResult};
use super::service::{ImageInput, VisionClassifier};

/// Scripted vision model that records every call.
///
/// Answers are popped in order; once the script runs out the last answer
/// repeats.
#[derive(Default)]
pub struct MockVisionClassifier {
    script: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockVisionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answers `response`.
    pub fn responding(response: impl Into<String>) -> Self {
        Self::scripted([Ok(response.into())])
    }

    /// Always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::scripted([Err(message.into())])
    }

    pub fn scripted(answers: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(answers.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl VisionClassifier for MockVisionClassifier {
    async fn classify(&self, prompt: &str, images: &[ImageInput]) -> ClassifyResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if images.is_empty() {
            return Err(ClassifyError::NoImage);
        }

        let answer = {
            let mut last = self.last.lock();
            match self.script.lock().pop_front() {
                Some(next) => {
                    *last = Some(next.clone());
                    Some(next)
                }
                None => last.clone(),
            }
        };

        match answer {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ClassifyError::Request(message)),
            None => Ok(String::new()),
        }
    }
}
