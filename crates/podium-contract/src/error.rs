// crates/podium-contract/src/error.rs
// ============================================================================
// Module: Contract Errors
// Description: Error types for contract violations and harness failures.
// Purpose: Give every scenario failure a typed, reportable cause.
// Dependencies: reqwest, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`ContractError`] enumerates every way a scenario can fail, from transport
//! errors through status and body mismatches. [`LifecycleError`] reports an
//! impossible transition in the observed resource state machine.

use reqwest::Method;
use thiserror::Error;

use crate::lifecycle::ResourceState;
use crate::lifecycle::Transition;
use crate::status::StatusClass;

/// Maximum response body characters kept in error messages.
pub(crate) const BODY_EXCERPT_CHARS: usize = 256;

/// Failures raised while verifying the resource contract.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The configured base URL cannot address resource paths.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl {
        /// Base URL as configured.
        url: String,
        /// Parse or shape failure.
        reason: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The request never produced a response.
    #[error("{method} {path} failed: {source}")]
    Transport {
        /// Request method.
        method: Method,
        /// Request path.
        path: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The response status falls outside the expected class.
    #[error("{method} {path}: expected {expected}, got {actual} (body: {body})")]
    UnexpectedStatus {
        /// Request method.
        method: Method,
        /// Request path.
        path: String,
        /// Expected status class.
        expected: StatusClass,
        /// Actual status code.
        actual: u16,
        /// Leading excerpt of the response body.
        body: String,
    },
    /// The response body is not the JSON shape the contract requires.
    #[error("{method} {path}: invalid response body: {reason}")]
    InvalidBody {
        /// Request method.
        method: Method,
        /// Request path.
        path: String,
        /// Decode or shape failure.
        reason: String,
    },
    /// A create response carried no usable `id`.
    #[error("POST {path}: response body has no usable `id`")]
    MissingId {
        /// Collection path.
        path: String,
    },
    /// A read-back field differs from the submitted value.
    #[error("GET {path}: field `{field}` expected {expected}, got {actual}")]
    FieldMismatch {
        /// Item path.
        path: String,
        /// Field name.
        field: String,
        /// Submitted value, as JSON.
        expected: String,
        /// Returned value, as JSON (`<missing>` when absent).
        actual: String,
    },
    /// A created id was absent from the collection listing.
    #[error("GET {path}: created id {id} missing from listing")]
    MissingFromListing {
        /// Collection path.
        path: String,
        /// Created identifier.
        id: String,
    },
    /// A payload could not be built or derived.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    /// The observed lifecycle took an impossible transition.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Impossible transitions in the per-resource state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The transition is not allowed from the current state.
    #[error("cannot {transition} a resource that is {state}")]
    InvalidTransition {
        /// State before the transition.
        state: ResourceState,
        /// Attempted transition.
        transition: Transition,
    },
}

/// Truncates a response body for inclusion in an error message.
pub(crate) fn body_excerpt(body: &str) -> String {
    let mut chars = body.chars();
    let excerpt: String = chars.by_ref().take(BODY_EXCERPT_CHARS).collect();
    if chars.next().is_some() { format!("{excerpt}...") } else { excerpt }
}
