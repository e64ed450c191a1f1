// crates/podium-contract/src/status.rs
// ============================================================================
// Module: Status Taxonomy
// Description: Classification of HTTP statuses observed at the API boundary.
// Purpose: Map raw status codes onto the outcomes the contract asserts.
// Dependencies: reqwest, serde
// ============================================================================

//! ## Overview
//! The contract only distinguishes three outcomes: success (any 2xx),
//! validation failure (422), and not-found (404). Everything else is
//! [`StatusClass::Unexpected`] and is never an acceptable expectation.

use std::fmt;

use reqwest::StatusCode;
use serde::Serialize;

/// Outcome class of an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// Any 2xx status.
    Success,
    /// 422 Unprocessable Entity.
    ValidationError,
    /// 404 Not Found.
    NotFound,
    /// Any status outside the contract.
    Unexpected,
}

impl StatusClass {
    /// Classifies a raw status code.
    #[must_use]
    pub fn classify(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Success
        } else if status == StatusCode::UNPROCESSABLE_ENTITY {
            Self::ValidationError
        } else if status == StatusCode::NOT_FOUND {
            Self::NotFound
        } else {
            Self::Unexpected
        }
    }

    /// Returns true when `status` falls in this class.
    #[must_use]
    pub fn matches(self, status: StatusCode) -> bool {
        self != Self::Unexpected && Self::classify(status) == self
    }

    /// Returns a stable label for reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success (2xx)",
            Self::ValidationError => "validation error (422)",
            Self::NotFound => "not found (404)",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
