//! Response envelopes shared by every resource endpoint.

use serde::{Deserialize, Serialize};

use crate::pagination::Page;

/// Body of `GET /{resource}/fetch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: u16,
    pub data: Page<T>,
}

/// Body of a successful create / edit / delete call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> MutationResponse<T> {
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: true, message: message.into(), data }
    }
}

/// Body of any non-2xx response: `{status, data: {message}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: u16,
    pub data: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self { status, data: ErrorDetail { message: message.into() } }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.data.message
    }
}
