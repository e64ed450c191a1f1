// system-tests/src/lib.rs
// ============================================================================
// Module: Podium System Tests Library
// Description: Shared configuration for the Podium contract system tests.
// Purpose: Provide env-backed settings to the system-test binaries.
// Dependencies: std, url
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the Podium system-tests
//! binaries in `system-tests/tests`: the stub-backed harness self-tests and the
//! live suites that run against an external service.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
