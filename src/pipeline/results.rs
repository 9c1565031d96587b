use parking_lot::Mutex;

use crate::candidate::Candidate;

/// Bounded, append-only list of accepted candidates for one validation run.
///
/// The quota check and the append share one lock, so the list never grows past
/// `max`.
#[derive(Debug)]
pub struct ResultSet {
    max: usize,
    items: Mutex<Vec<Candidate>>,
}

impl ResultSet {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            items: Mutex::new(Vec::with_capacity(max.min(64))),
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.lock().len() >= self.max
    }

    /// Appends `candidate` unless the quota is already met. Returns whether it was added.
    pub fn try_push(&self, candidate: Candidate) -> bool {
        let mut items = self.items.lock();
        if items.len() >= self.max {
            return false;
        }
        items.push(candidate);
        true
    }

    /// Moves the accepted candidates out, leaving the set empty.
    pub fn take(&self) -> Vec<Candidate> {
        std::mem::take(&mut *self.items.lock())
    }
}
