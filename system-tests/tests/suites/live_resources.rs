// system-tests/tests/suites/live_resources.rs
// ============================================================================
// Module: Live Resource Tests
// Description: Contract scenarios against the configured Podium service.
// Purpose: Verify each resource collection of a running deployment.
// Dependencies: system-tests helpers, podium-contract
// ============================================================================

//! ## Overview
//! Contract scenarios against the configured Podium service.
//! Purpose: Verify each resource collection of a running deployment.
//! Invariants:
//! - Only ids created by these tests are read back.
//! - Collections are emptied first only when cleanup is configured.

use podium_contract::ContractVerifier;
use podium_contract::Payload;
use podium_contract::ResourceKind;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use helpers::artifacts::TestReporter;
use helpers::harness::live_verifier;

use crate::helpers;

async fn prepare(kind: ResourceKind) -> Result<(ContractVerifier, Vec<String>), String> {
    let (config, verifier) = live_verifier().await?;
    let mut notes = vec![format!("base url: {}", config.base_url)];
    if config.cleanup && kind.has_listing() {
        let removed = verifier.cleanup(kind).await.map_err(|err| err.to_string())?;
        notes.push(format!("cleanup removed {removed} {kind} item(s)"));
    }
    Ok((verifier, notes))
}

async fn run_resource_suite(
    kind: ResourceKind,
    test_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new(test_name)?;
    let (verifier, mut notes) = prepare(kind).await?;

    let outcomes = verifier.run_all(kind).await;
    reporter.record_outcomes(&outcomes);
    let failures: Vec<String> = outcomes
        .iter()
        .filter_map(|outcome| {
            outcome.failure.as_ref().map(|failure| format!("{}: {failure}", outcome.scenario))
        })
        .collect();
    notes.push(format!("{} scenario(s), {} failed", outcomes.len(), failures.len()));

    let transcript = reporter.write_transcript(verifier.client())?;
    let status = if failures.is_empty() { "pass" } else { "fail" };
    reporter.finish(
        status,
        notes,
        vec!["summary.json".to_string(), "summary.md".to_string(), transcript],
    )?;
    if failures.is_empty() { Ok(()) } else { Err(failures.join("; ").into()) }
}

#[tokio::test(flavor = "multi_thread")]
async fn live_competitions() -> Result<(), Box<dyn std::error::Error>> {
    run_resource_suite(ResourceKind::Competition, "live_competitions").await
}

#[tokio::test(flavor = "multi_thread")]
async fn live_events() -> Result<(), Box<dyn std::error::Error>> {
    run_resource_suite(ResourceKind::Event, "live_events").await
}

#[tokio::test(flavor = "multi_thread")]
async fn live_users() -> Result<(), Box<dyn std::error::Error>> {
    run_resource_suite(ResourceKind::User, "live_users").await
}

#[tokio::test(flavor = "multi_thread")]
async fn live_athletes() -> Result<(), Box<dyn std::error::Error>> {
    run_resource_suite(ResourceKind::Athlete, "live_athletes").await
}

#[tokio::test(flavor = "multi_thread")]
async fn live_reference_payloads() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("live_reference_payloads")?;
    let (_config, verifier) = live_verifier().await?;

    let mut competition = Map::new();
    competition.insert("name".to_string(), json!("test_name"));
    competition.insert("location".to_string(), json!("test_location"));
    competition.insert("start_date".to_string(), json!("2021-01-01"));
    competition.insert("end_date".to_string(), json!("2020-01-022"));
    verifier
        .reject_invalid_date(&Payload::from_fields(ResourceKind::Competition, competition))
        .await?;

    let mut event = match Payload::sample(ResourceKind::Event)?.to_value() {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    event.insert("date_time".to_string(), json!("2022-12-19T16:39:57-08:"));
    verifier.reject_invalid_date(&Payload::from_fields(ResourceKind::Event, event)).await?;

    let extended = Payload::sample(ResourceKind::Competition)?
        .with_unknown_field("bad_data", json!("bad_data"))?;
    verifier.accept_unknown_field(&extended).await?;

    let transcript = reporter.write_transcript(verifier.client())?;
    reporter.finish(
        "pass",
        vec!["reference malformed dates yielded 422; bad_data accepted".to_string()],
        vec!["summary.json".to_string(), "summary.md".to_string(), transcript],
    )?;
    Ok(())
}
