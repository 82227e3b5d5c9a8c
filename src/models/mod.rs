pub mod lead;
pub mod submission;

pub use lead::{Attribution, Consent, Lead};
pub use submission::RawSubmission;
