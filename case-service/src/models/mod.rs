pub mod case_file;
pub mod notification;
pub mod permit;
pub mod question;

pub use case_file::{CaseFile, CaseFileSummary, CONSENT_UNMANAGED, STATUS_PENDING_REVIEW};
pub use notification::{Notification, NotificationStatus};
pub use permit::Permit;
pub use question::{Question, QuestionStatus};
