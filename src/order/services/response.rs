//! Transport-neutral failure classification for service errors.

use crate::order::domain::OrderStatus;
use serde::Serialize;

/// Broad category of a service failure, used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The order does not exist or is not visible to the caller.
    NotFound,
    /// The request was rejected before any mutation.
    Validation,
    /// A concurrent writer changed the order first.
    Conflict,
    /// Storage or infrastructure failure.
    Internal,
}

impl FailureKind {
    /// Returns the HTTP status code conventionally used for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Validation => 400,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

/// Serialisable error body returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable explanation.
    pub message: String,
    /// Statuses the caller may choose from, when relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_statuses: Option<Vec<OrderStatus>>,
}

impl ErrorBody {
    /// Creates a body with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            valid_statuses: None,
        }
    }

    /// Attaches the valid status set.
    #[must_use]
    pub fn with_valid_statuses(mut self, statuses: &[OrderStatus]) -> Self {
        self.valid_statuses = Some(statuses.to_vec());
        self
    }
}
