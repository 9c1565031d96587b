use super::parser::CLASS_PHOTO;
use crate::candidate::Candidate;
use crate::license::ImageLicense;

/// Cheap heuristic that can settle a candidate without the model.
///
/// Returns `(class, true)` when conclusive. Only Safe sources qualify today.
/// The validator uses the full license assessment instead; this stays available
/// for callers that only have a domain verdict. Decisions made here are audited
/// with [`DecisionSource::Prefilter`](crate::events::DecisionSource::Prefilter).
pub fn pre_classify(candidate: &Candidate) -> (&'static str, bool) {
    match candidate.license {
        ImageLicense::Safe => (CLASS_PHOTO, true),
        _ => ("", false),
    }
}
