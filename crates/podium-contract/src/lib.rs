// crates/podium-contract/src/lib.rs
// ============================================================================
// Module: Podium Contract Library
// Description: Black-box contract verification for the Podium resource API.
// Purpose: Drive create/read/delete lifecycles and negative cases over HTTP.
// Dependencies: reqwest, serde_json, thiserror, time, tracing, url, uuid
// ============================================================================

//! ## Overview
//! Podium Contract exercises an external CRUD-style HTTP API (competitions,
//! events, users, athletes) and reports every deviation from the expected
//! status codes and response bodies as a [`ContractError`].
//! Invariants:
//! - Scenarios issue requests sequentially and stop at the first violation.
//! - Failures are reported, never retried.
//! - Only identifiers returned by the harness's own POSTs are read back.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod client;
pub mod error;
pub mod lifecycle;
pub mod payload;
pub mod status;
pub mod verifier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::DateField;
pub use catalog::DateFormat;
pub use catalog::ResourceKind;
pub use client::ApiResponse;
pub use client::ResourceClient;
pub use client::TranscriptEntry;
pub use error::ContractError;
pub use error::LifecycleError;
pub use lifecycle::Lifecycle;
pub use lifecycle::ResourceState;
pub use lifecycle::Transition;
pub use payload::AthleteRequest;
pub use payload::CompetitionRequest;
pub use payload::EventRequest;
pub use payload::Payload;
pub use payload::ResourceRequest;
pub use payload::UNKNOWN_FIELD_NAME;
pub use payload::UserRequest;
pub use status::StatusClass;
pub use verifier::ContractVerifier;
pub use verifier::ResourceId;
pub use verifier::Scenario;
pub use verifier::ScenarioOutcome;
