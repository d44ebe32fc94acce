pub mod cases;
pub mod notifications;
pub mod questions;

pub use cases::{CaseSummaryResponse, DocumentLookupRequest, PermitResponse};
pub use notifications::{
    AttachmentParams, ListByUserParams, NotificationResponse, NotificationSummary, PendingCase,
    PendingNotification, UpdateStatusRequest,
};
pub use questions::{
    CreateQuestionsRequest, QuestionInput, QuestionResponse, UpdateQuestionStatusRequest,
};

use axum::Json;
use serde::Serialize;

/// Legacy wire envelope. Every JSON response carries
/// `{"error": 0|1, "response": ...}`; `error: 1` also travels with a
/// 200 status in one listing quirk, so success and failure are both
/// constructable here.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub error: u8,
    pub response: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(response: T) -> Json<Self> {
        Json(Self { error: 0, response })
    }

    pub fn failed(response: T) -> Json<Self> {
        Json(Self { error: 1, response })
    }
}
