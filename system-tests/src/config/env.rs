// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for Podium system tests.
// Purpose: Locate the service under test and the artifact root.
// Dependencies: std, url
// ============================================================================

//! ## Overview
//! Each [`SystemTestEnv`] key reads its own variable. Unset keys fall back to
//! defaults; a key that is set must be UTF-8, non-blank, and parse, otherwise
//! loading fails with a message naming the variable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

// ============================================================================
// SECTION: Environment Keys
// ============================================================================

/// Base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Base URL of the Podium service, including any path prefix.
    BaseUrl,
    /// Per-request timeout in whole seconds.
    TimeoutSeconds,
    /// Directory receiving per-test artifacts.
    RunRoot,
    /// Empty live collections before suites run.
    Cleanup,
}

impl SystemTestEnv {
    /// Every key, in load order.
    pub const ALL: [Self; 4] = [Self::BaseUrl, Self::TimeoutSeconds, Self::RunRoot, Self::Cleanup];

    /// Returns the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "PODIUM_SYSTEM_TEST_BASE_URL",
            Self::TimeoutSeconds => "PODIUM_SYSTEM_TEST_TIMEOUT_SEC",
            Self::RunRoot => "PODIUM_SYSTEM_TEST_RUN_ROOT",
            Self::Cleanup => "PODIUM_SYSTEM_TEST_CLEANUP",
        }
    }

    /// Reads the raw value; unset is `None`, blank or non-UTF-8 is an error.
    fn read(self) -> Result<Option<String>, String> {
        let Some(raw) = std::env::var_os(self.as_str()) else {
            return Ok(None);
        };
        let name = self.as_str();
        let value = raw.into_string().map_err(|_| format!("{name} must be valid UTF-8"))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("{name} must not be empty"));
        }
        Ok(Some(value.to_string()))
    }

    /// Reads and parses the value, prefixing parse failures with the name.
    fn parse<T>(self, parse: impl FnOnce(&str) -> Result<T, String>) -> Result<Option<T>, String> {
        self.read()?
            .map(|value| parse(&value).map_err(|reason| format!("{}: {reason}", self.as_str())))
            .transpose()
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Where the live suites find the service and how they treat its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTestConfig {
    /// Absolute http(s) base URL.
    pub base_url: String,
    /// Request timeout; `None` keeps the client default.
    pub timeout: Option<Duration>,
    /// Artifact root override.
    pub run_root: Option<PathBuf>,
    /// Empty live collections before suites run.
    pub cleanup: bool,
}

impl Default for SystemTestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            run_root: None,
            cleanup: false,
        }
    }
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns the first key that is set but blank, not UTF-8, or unparsable.
    pub fn load() -> Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            base_url: SystemTestEnv::BaseUrl.parse(service_url)?.unwrap_or(defaults.base_url),
            timeout: SystemTestEnv::TimeoutSeconds.parse(whole_seconds)?,
            run_root: SystemTestEnv::RunRoot.read()?.map(PathBuf::from),
            cleanup: SystemTestEnv::Cleanup.parse(switch)?.unwrap_or(defaults.cleanup),
        })
    }
}

// ============================================================================
// SECTION: Value Parsers
// ============================================================================

fn service_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|err| format!("not a url ({err})"))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err("expected an absolute http or https url".to_string());
    }
    Ok(raw.to_string())
}

fn whole_seconds(raw: &str) -> Result<Duration, String> {
    match raw.parse::<u64>() {
        Ok(0) => Err("timeout must be greater than zero".to_string()),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(format!("`{raw}` is not a whole number of seconds")),
    }
}

fn switch(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(format!("`{raw}` is not one of 1, 0, true, false")),
    }
}
