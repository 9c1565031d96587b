//! Candidate validation pipeline.

pub mod error;
pub mod results;
pub mod stage;
pub mod validator;


pub use error::{PipelineError, PipelineResult, Rejection};
pub use results::ResultSet;
pub use stage::{Stage, StageTracker};
pub use validator::{Acceptance, CandidateValidator};
