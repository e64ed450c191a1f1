// crates/podium-contract/src/verifier.rs
// ============================================================================
// Module: Resource Contract Verifier
// Description: Scenario drivers for the Podium resource CRUD contract.
// Purpose: Verify lifecycle, validation, and unknown-field behavior end to end.
// Dependencies: serde, serde_json, tracing, uuid
// ============================================================================

//! ## Overview
//! [`ContractVerifier`] runs independent scenarios against one
//! [`ResourceClient`]. Each scenario issues its requests in order and returns
//! the first [`ContractError`] it observes.
//! Invariants:
//! - Only identifiers returned by the scenario's own POST are read back.
//! - Expected read statuses come from the [`Lifecycle`] tracker.
//! - Nothing is retried.
//! - A resource created by a failing scenario is deleted before the failure
//!   is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use crate::catalog::ResourceKind;
use crate::client::ApiResponse;
use crate::client::ResourceClient;
use crate::error::ContractError;
use crate::lifecycle::Lifecycle;
use crate::payload::Payload;
use crate::payload::UNKNOWN_FIELD_NAME;
use crate::status::StatusClass;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Server-generated resource identifier, treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Wraps a non-empty identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() { None } else { Some(Self(raw)) }
    }

    /// Reads the `id` member of a response object.
    ///
    /// String and integer ids are accepted; anything else is absent.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        match body.get("id")? {
            Value::String(raw) => Self::new(raw.as_str()),
            Value::Number(number) => Self::new(number.to_string()),
            _ => None,
        }
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Named scenarios the verifier can run for a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Create, read back, delete, read again.
    CreateAndFetch,
    /// Created id appears in the collection listing.
    ListContains,
    /// Malformed date/time is rejected with 422.
    RejectInvalidDate,
    /// Undeclared fields are accepted.
    AcceptUnknownField,
    /// A user can follow an athlete.
    FollowAthlete,
}

impl Scenario {
    /// All scenarios, in run order.
    pub const ALL: [Self; 5] = [
        Self::CreateAndFetch,
        Self::ListContains,
        Self::RejectInvalidDate,
        Self::AcceptUnknownField,
        Self::FollowAthlete,
    ];

    /// Returns a stable label for reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateAndFetch => "create_and_fetch",
            Self::ListContains => "list_contains",
            Self::RejectInvalidDate => "reject_invalid_date",
            Self::AcceptUnknownField => "accept_unknown_field",
            Self::FollowAthlete => "follow_athlete",
        }
    }

    /// Returns true when the scenario is meaningful for `kind`.
    #[must_use]
    pub const fn applies_to(self, kind: ResourceKind) -> bool {
        match self {
            Self::CreateAndFetch | Self::AcceptUnknownField => true,
            Self::ListContains => kind.has_listing(),
            Self::RejectInvalidDate => kind.date_field().is_some(),
            Self::FollowAthlete => matches!(kind, ResourceKind::User),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// Resource kind exercised.
    pub kind: ResourceKind,
    /// Scenario run.
    pub scenario: Scenario,
    /// Failure message, `None` when the scenario passed.
    pub failure: Option<String>,
}

impl ScenarioOutcome {
    /// Returns true when the scenario passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Drives contract scenarios against the resource API.
#[derive(Clone)]
pub struct ContractVerifier {
    /// Client issuing every request.
    client: ResourceClient,
}

impl ContractVerifier {
    /// Creates a verifier over `client`.
    #[must_use]
    pub const fn new(client: ResourceClient) -> Self {
        Self {
            client,
        }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &ResourceClient {
        &self.client
    }

    /// POSTs `payload` and returns the created id.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on a non-2xx status, a non-JSON body, or a
    /// body without `id`.
    pub async fn create(&self, payload: &Payload) -> Result<ResourceId, ContractError> {
        let kind = payload.kind();
        let response = self
            .client
            .post(&[kind.segment()], &payload.to_value())
            .await?
            .expect(StatusClass::Success)?;
        let body = response.json()?;
        ResourceId::from_body(&body).ok_or_else(|| ContractError::MissingId {
            path: kind.path().to_string(),
        })
    }

    /// GETs one item and checks the status against `expected`.
    async fn read(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        expected: StatusClass,
    ) -> Result<ApiResponse, ContractError> {
        self.client.get(&[kind.segment(), id.as_str()]).await?.expect(expected)
    }

    /// DELETEs one item and requires success.
    async fn remove(&self, kind: ResourceKind, id: &ResourceId) -> Result<(), ContractError> {
        self.client.delete(&[kind.segment(), id.as_str()]).await?.expect(StatusClass::Success)?;
        Ok(())
    }

    /// Deletes a resource left behind by a failed step and hands back `cause`.
    ///
    /// A failing delete is logged, never reported in place of `cause`.
    async fn discard(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        cause: ContractError,
    ) -> ContractError {
        if let Err(err) = self.remove(kind, id).await {
            warn!(%kind, %id, error = %err, "stray resource not deleted");
        }
        cause
    }

    /// Reads `id` back and compares it with the payload that created it.
    async fn fetch_matching(
        &self,
        payload: &Payload,
        id: &ResourceId,
        expected: StatusClass,
    ) -> Result<(), ContractError> {
        let fetched = self.read(payload.kind(), id, expected).await?;
        compare_round_trip(payload, &fetched.json()?, fetched.path())
    }

    /// Create → read → delete → read(not-found) for one payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`ContractError`] observed.
    pub async fn create_and_fetch(&self, payload: &Payload) -> Result<ResourceId, ContractError> {
        let kind = payload.kind();
        let mut lifecycle = Lifecycle::new();

        let id = self.create(payload).await?;
        lifecycle.create()?;

        if let Err(err) = self.fetch_matching(payload, &id, lifecycle.expected_read()).await {
            return Err(self.discard(kind, &id, err).await);
        }

        self.remove(kind, &id).await?;
        lifecycle.delete()?;

        self.read(kind, &id, lifecycle.expected_read()).await?;
        Ok(id)
    }

    /// POSTs a payload carrying a malformed date and requires 422.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::UnexpectedStatus`] when the service does not
    /// reject the payload with a validation error. A resource the service
    /// created anyway is deleted first.
    pub async fn reject_invalid_date(&self, payload: &Payload) -> Result<(), ContractError> {
        let kind = payload.kind();
        let response = self.client.post(&[kind.segment()], &payload.to_value()).await?;
        let stray = if response.class() == StatusClass::Success {
            response.json().ok().and_then(|body| ResourceId::from_body(&body))
        } else {
            None
        };
        match (response.expect(StatusClass::ValidationError), stray) {
            (Ok(_), _) => Ok(()),
            (Err(err), Some(id)) => Err(self.discard(kind, &id, err).await),
            (Err(err), None) => Err(err),
        }
    }

    /// POSTs a payload carrying an undeclared field and requires success.
    ///
    /// When the response carries an id, the created resource is deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when the service rejects the payload or the
    /// follow-up delete fails.
    pub async fn accept_unknown_field(
        &self,
        payload: &Payload,
    ) -> Result<Option<ResourceId>, ContractError> {
        let kind = payload.kind();
        let response = self
            .client
            .post(&[kind.segment()], &payload.to_value())
            .await?
            .expect(StatusClass::Success)?;
        let id = response.json().ok().and_then(|body| ResourceId::from_body(&body));
        if let Some(id) = &id {
            self.remove(kind, id).await?;
        }
        Ok(id)
    }

    /// Lists the ids in a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on a non-2xx status or when the body is not
    /// an array of objects carrying `id`, and
    /// [`ContractError::InvalidPayload`] without a request when the
    /// collection has no listing.
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceId>, ContractError> {
        if !kind.has_listing() {
            return Err(ContractError::InvalidPayload(format!("{kind} has no collection listing")));
        }
        let response = self.client.get(&[kind.segment()]).await?.expect(StatusClass::Success)?;
        let body = response.json()?;
        let invalid = |reason: String| ContractError::InvalidBody {
            method: reqwest::Method::GET,
            path: kind.path().to_string(),
            reason,
        };
        let Value::Array(items) = body else {
            return Err(invalid("expected a json array".to_string()));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                ResourceId::from_body(item)
                    .ok_or_else(|| invalid(format!("item {index} has no usable `id`")))
            })
            .collect()
    }

    /// Creates a resource and requires its id in the collection listing.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::MissingFromListing`] when the id is absent.
    pub async fn list_contains(&self, payload: &Payload) -> Result<ResourceId, ContractError> {
        let kind = payload.kind();
        let id = self.create(payload).await?;
        let listed = match self.list(kind).await {
            Ok(ids) => ids.contains(&id),
            Err(err) => return Err(self.discard(kind, &id, err).await),
        };
        if !listed {
            let missing = ContractError::MissingFromListing {
                path: kind.path().to_string(),
                id: id.to_string(),
            };
            return Err(self.discard(kind, &id, missing).await);
        }
        self.remove(kind, &id).await?;
        Ok(id)
    }

    /// Deletes every resource in a collection and returns how many were removed.
    ///
    /// Kinds without a collection listing are skipped and report zero.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when listing or any delete fails.
    pub async fn cleanup(&self, kind: ResourceKind) -> Result<usize, ContractError> {
        if !kind.has_listing() {
            info!(%kind, "no collection listing; cleanup skipped");
            return Ok(0);
        }
        let ids = self.list(kind).await?;
        for id in &ids {
            self.remove(kind, id).await?;
        }
        info!(%kind, removed = ids.len(), "collection cleaned up");
        Ok(ids.len())
    }

    /// POSTs `/users/{user}/follow/{athlete}` and requires success.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on a non-2xx status.
    pub async fn follow_athlete(
        &self,
        user: &ResourceId,
        athlete: &str,
    ) -> Result<(), ContractError> {
        self.client
            .post_empty(&[ResourceKind::User.segment(), user.as_str(), "follow", athlete])
            .await?
            .expect(StatusClass::Success)?;
        Ok(())
    }

    /// Runs one named scenario with the standard sample payload for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on the first violation, or
    /// [`ContractError::InvalidPayload`] when the scenario does not apply.
    pub async fn run_scenario(
        &self,
        kind: ResourceKind,
        scenario: Scenario,
    ) -> Result<(), ContractError> {
        if !scenario.applies_to(kind) {
            return Err(ContractError::InvalidPayload(format!(
                "scenario {scenario} does not apply to {kind}"
            )));
        }
        let payload = Payload::sample(kind)?;
        match scenario {
            Scenario::CreateAndFetch => self.create_and_fetch(&payload).await.map(drop),
            Scenario::ListContains => self.list_contains(&payload).await.map(drop),
            Scenario::RejectInvalidDate => {
                self.reject_invalid_date(&payload.with_malformed_date()?).await
            }
            Scenario::AcceptUnknownField => {
                let extended =
                    payload.with_unknown_field(UNKNOWN_FIELD_NAME, json!(UNKNOWN_FIELD_NAME))?;
                self.accept_unknown_field(&extended).await.map(drop)
            }
            Scenario::FollowAthlete => {
                let user = self.create(&payload).await?;
                if let Err(err) = self.follow_athlete(&user, &Uuid::new_v4().to_string()).await {
                    return Err(self.discard(kind, &user, err).await);
                }
                self.remove(kind, &user).await
            }
        }
    }

    /// Runs every applicable scenario for `kind`, continuing past failures.
    pub async fn run_all(&self, kind: ResourceKind) -> Vec<ScenarioOutcome> {
        let mut outcomes = Vec::new();
        for scenario in Scenario::ALL.into_iter().filter(|scenario| scenario.applies_to(kind)) {
            let failure = match self.run_scenario(kind, scenario).await {
                Ok(()) => {
                    info!(%kind, %scenario, "scenario passed");
                    None
                }
                Err(err) => {
                    warn!(%kind, %scenario, error = %err, "scenario failed");
                    Some(err.to_string())
                }
            };
            outcomes.push(ScenarioOutcome {
                kind,
                scenario,
                failure,
            });
        }
        outcomes
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Requires every round-trip field of `payload` to appear unchanged in `body`.
fn compare_round_trip(payload: &Payload, body: &Value, path: &str) -> Result<(), ContractError> {
    for field in payload.kind().round_trip_fields() {
        let Some(expected) = payload.get(field) else {
            continue;
        };
        let actual = body.get(*field);
        if actual != Some(expected) {
            return Err(ContractError::FieldMismatch {
                path: path.to_string(),
                field: (*field).to_string(),
                expected: expected.to_string(),
                actual: actual.map_or_else(|| "<missing>".to_string(), Value::to_string),
            });
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
