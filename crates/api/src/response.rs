use serde::Serialize;

/// `{ "message": ... }` acknowledgement for commands with no resource body,
/// e.g. removing a shortlist entry or clearing counsellor history.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
