// crates/podium-contract/src/payload.rs
// ============================================================================
// Module: Resource Payloads
// Description: Typed request bodies and derived negative-case payloads.
// Purpose: Build valid, malformed-date, and extra-field request bodies.
// Dependencies: serde, serde_json, uuid
// ============================================================================

//! ## Overview
//! Each resource kind has a typed request struct implementing
//! [`ResourceRequest`]. Requests serialize into a [`Payload`], a JSON object
//! tagged with its [`ResourceKind`], from which negative cases are derived:
//! [`Payload::with_malformed_date`] and [`Payload::with_unknown_field`].
//! Invariants:
//! - A payload's fields are always a JSON object.
//! - Derived payloads never modify declared fields other than the one targeted.
//! - Identifiers referenced by samples are fresh UUID v4 values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::ResourceKind;
use crate::error::ContractError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field name injected by the unknown-field scenario.
pub const UNKNOWN_FIELD_NAME: &str = "bad_data";

// ============================================================================
// SECTION: Typed Requests
// ============================================================================

/// A typed request body for one resource kind.
pub trait ResourceRequest: Serialize {
    /// Kind this request creates.
    const KIND: ResourceKind;

    /// Returns a valid request used by the standard scenarios.
    fn sample() -> Self;
}

/// Request body for `POST /competitions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionRequest {
    /// Competition name.
    pub name: String,
    /// Venue description.
    pub location: String,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
}

impl ResourceRequest for CompetitionRequest {
    const KIND: ResourceKind = ResourceKind::Competition;

    fn sample() -> Self {
        Self {
            name: "test_name".to_string(),
            location: "test_location".to_string(),
            start_date: "2021-01-01".to_string(),
            end_date: "2021-01-02".to_string(),
        }
    }
}

/// Request body for `POST /events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    /// Owning competition identifier.
    pub competition_id: String,
    /// Participating athlete identifier.
    pub athlete_id: String,
    /// Event name.
    pub name: String,
    /// Start time, RFC 3339.
    pub date_time: String,
}

impl ResourceRequest for EventRequest {
    const KIND: ResourceKind = ResourceKind::Event;

    fn sample() -> Self {
        Self {
            competition_id: Uuid::new_v4().to_string(),
            athlete_id: Uuid::new_v4().to_string(),
            name: "test_name".to_string(),
            date_time: "2022-12-19T16:39:57-08:00".to_string(),
        }
    }
}

/// Request body for `POST /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRequest {
    /// Display name.
    pub username: String,
    /// Identifiers of followed athletes.
    pub athletes_following: Vec<String>,
}

impl ResourceRequest for UserRequest {
    const KIND: ResourceKind = ResourceKind::User;

    fn sample() -> Self {
        Self {
            username: "John Doe".to_string(),
            athletes_following: vec![Uuid::new_v4().to_string(), Uuid::new_v4().to_string()],
        }
    }
}

/// Request body for `POST /athletes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Free-form biography.
    pub bio: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub birthday: String,
}

impl ResourceRequest for AthleteRequest {
    const KIND: ResourceKind = ResourceKind::Athlete;

    fn sample() -> Self {
        Self {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            bio: "Running Bio".to_string(),
            birthday: "1990-01-01".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Payload
// ============================================================================

/// A JSON object request body tagged with the kind it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    kind: ResourceKind,
    fields: Map<String, Value>,
}

impl Payload {
    /// Serializes a typed request into a payload.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidPayload`] when the request does not
    /// serialize to a JSON object.
    pub fn from_request<R: ResourceRequest>(request: &R) -> Result<Self, ContractError> {
        match serde_json::to_value(request) {
            Ok(Value::Object(fields)) => Ok(Self {
                kind: R::KIND,
                fields,
            }),
            Ok(other) => Err(ContractError::InvalidPayload(format!(
                "{} request serialized to non-object: {other}",
                R::KIND
            ))),
            Err(err) => Err(ContractError::InvalidPayload(format!(
                "{} request serialization failed: {err}",
                R::KIND
            ))),
        }
    }

    /// Builds a payload from raw fields.
    #[must_use]
    pub const fn from_fields(kind: ResourceKind, fields: Map<String, Value>) -> Self {
        Self {
            kind,
            fields,
        }
    }

    /// Returns the standard valid payload for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidPayload`] when serialization fails.
    pub fn sample(kind: ResourceKind) -> Result<Self, ContractError> {
        match kind {
            ResourceKind::Competition => Self::from_request(&CompetitionRequest::sample()),
            ResourceKind::Event => Self::from_request(&EventRequest::sample()),
            ResourceKind::User => Self::from_request(&UserRequest::sample()),
            ResourceKind::Athlete => Self::from_request(&AthleteRequest::sample()),
        }
    }

    /// Returns the kind this payload targets.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the payload fields.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns one field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the payload as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Derives a payload whose date/time field no longer parses.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidPayload`] when the kind has no date
    /// field or the field is missing or not a string.
    pub fn with_malformed_date(&self) -> Result<Self, ContractError> {
        let date = self.kind.date_field().ok_or_else(|| {
            ContractError::InvalidPayload(format!("{} has no date field", self.kind))
        })?;
        let current = self.fields.get(date.name).and_then(Value::as_str).ok_or_else(|| {
            ContractError::InvalidPayload(format!(
                "{} payload has no string `{}` field",
                self.kind, date.name
            ))
        })?;
        let mut fields = self.fields.clone();
        fields.insert(date.name.to_string(), Value::String(date.format.malform(current)));
        Ok(Self {
            kind: self.kind,
            fields,
        })
    }

    /// Derives a payload carrying an extra field the kind does not declare.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidPayload`] when `name` is a declared field.
    pub fn with_unknown_field(&self, name: &str, value: Value) -> Result<Self, ContractError> {
        if self.kind.declares(name) {
            return Err(ContractError::InvalidPayload(format!(
                "`{name}` is a declared {} field",
                self.kind
            )));
        }
        let mut fields = self.fields.clone();
        fields.insert(name.to_string(), value);
        Ok(Self {
            kind: self.kind,
            fields,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
