use std::fmt;

use parking_lot::Mutex;

/// Per-candidate validation state. `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Queued,
    Probing,
    Downloading,
    DedupChecking,
    AssessingLicense,
    Classifying,
    Accepted,
    Rejected,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Queued => "queued",
            Stage::Probing => "probing",
            Stage::Downloading => "downloading",
            Stage::DedupChecking => "dedup_checking",
            Stage::AssessingLicense => "assessing_license",
            Stage::Classifying => "classifying",
            Stage::Accepted => "accepted",
            Stage::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Accepted | Stage::Rejected)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last stage a worker entered; read after a panic to tag the fault.
#[derive(Debug, Default)]
pub struct StageTracker(Mutex<Stage>);

impl StageTracker {
    pub fn enter(&self, stage: Stage) {
        *self.0.lock() = stage;
    }

    pub fn current(&self) -> Stage {
        *self.0.lock()
    }
}
