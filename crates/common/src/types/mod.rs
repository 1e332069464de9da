use serde::{Deserialize, Serialize};

/// Body for failures that have no dedicated response type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { message: message.into(), error: error.into() }
    }
}

/// Body for successful calls that only report a message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
