//! Out-of-band diagnostics: search notifications, worker faults and the
//! classification audit trail.
//!
//! Every hook is optional. Hooks run on the worker that produced the event, so
//! they should be cheap and must not block.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::pipeline::PipelineError;

/// Which part of the pipeline produced a classification decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    /// The vision model answered.
    Model,
    /// The license resolver decided without consulting the model.
    LicenseAssessment,
    /// The standalone [`pre_classify`](crate::classify::pre_classify) heuristic.
    Prefilter,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Model => "model",
            DecisionSource::LicenseAssessment => "license_assessment",
            DecisionSource::Prefilter => "prefilter",
        }
    }
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record per classification decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationEvent {
    pub url: String,
    pub class: String,
    pub confidence: f64,
    pub source: DecisionSource,
}

impl ClassificationEvent {
    pub fn new(
        url: impl Into<String>,
        class: impl Into<String>,
        confidence: f64,
        source: DecisionSource,
    ) -> Self {
        Self {
            url: url.into(),
            class: class.into(),
            confidence,
            source,
        }
    }
}

pub type SearchHook = Arc<dyn Fn(&str) + Send + Sync>;
pub type FaultHook = Arc<dyn Fn(&str, &PipelineError) + Send + Sync>;
pub type ClassificationHook = Arc<dyn Fn(&ClassificationEvent) + Send + Sync>;

/// Optional callbacks shared by the search front end, the validator and the
/// classifier. Cloning is cheap.
#[derive(Clone, Default)]
pub struct Diagnostics {
    on_image_search: Option<SearchHook>,
    on_fault: Option<FaultHook>,
    on_classification: Option<ClassificationHook>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once per non-empty search query, before any I/O.
    pub fn with_image_search<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_image_search = Some(Arc::new(hook));
        self
    }

    /// Called with the stage name and the typed fault when a worker panics.
    pub fn with_fault<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &PipelineError) + Send + Sync + 'static,
    {
        self.on_fault = Some(Arc::new(hook));
        self
    }

    /// Called for every classification decision.
    pub fn with_classification<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ClassificationEvent) + Send + Sync + 'static,
    {
        self.on_classification = Some(Arc::new(hook));
        self
    }

    pub fn image_search(&self, query: &str) {
        if let Some(hook) = &self.on_image_search {
            hook(query);
        }
    }

    pub fn fault(&self, stage: &str, err: &PipelineError) {
        if let Some(hook) = &self.on_fault {
            hook(stage, err);
        }
    }

    pub fn classification(&self, event: ClassificationEvent) {
        if let Some(hook) = &self.on_classification {
            hook(&event);
        }
    }

    pub fn has_classification_hook(&self) -> bool {
        self.on_classification.is_some()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("on_image_search", &self.on_image_search.is_some())
            .field("on_fault", &self.on_fault.is_some())
            .field("on_classification", &self.on_classification.is_some())
            .finish()
    }
}
