mod batch;
mod node;
mod severity;
mod submission;

pub use batch::{Batch, BatchFile, FileInput, UploadResult};
pub use node::{ReleasedRecord, SubmissionNode};
pub use severity::Severity;
pub use submission::{Submission, ACTIVE_STATUSES};
