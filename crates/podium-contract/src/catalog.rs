// crates/podium-contract/src/catalog.rs
// ============================================================================
// Module: Resource Catalog
// Description: Closed set of resource kinds exposed by the Podium API.
// Purpose: Map each kind to its collection path, fields, and date format.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Every resource the harness knows about is a [`ResourceKind`] variant. The
//! catalog is the single source of truth for collection paths, the fields a
//! request declares, the fields compared on round-trip, and the date/time
//! field whose format the service validates.
//! Invariants:
//! - Collection paths are stable, lower-case, and begin with `/`.
//! - Round-trip fields are a subset of declared fields.
//! - A kind has at most one validated date/time field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

// ============================================================================
// SECTION: Resource Kinds
// ============================================================================

/// Resource types exposed through CRUD endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Competitions (`/competitions`).
    Competition,
    /// Events within a competition (`/events`).
    Event,
    /// Users following athletes (`/users`).
    User,
    /// Athletes (`/athletes`).
    Athlete,
}

impl ResourceKind {
    /// All kinds, in suite order.
    pub const ALL: [Self; 4] = [Self::Competition, Self::Event, Self::User, Self::Athlete];

    /// Returns the collection path, e.g. `/competitions`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Competition => "/competitions",
            Self::Event => "/events",
            Self::User => "/users",
            Self::Athlete => "/athletes",
        }
    }

    /// Returns the collection path without its leading slash.
    #[must_use]
    pub fn segment(self) -> &'static str {
        self.path().trim_start_matches('/')
    }

    /// Resolves a kind from its collection segment.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.segment() == segment)
    }

    /// Returns a stable singular label for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Competition => "competition",
            Self::Event => "event",
            Self::User => "user",
            Self::Athlete => "athlete",
        }
    }

    /// Returns the fields a well-formed request carries.
    #[must_use]
    pub const fn declared_fields(self) -> &'static [&'static str] {
        match self {
            Self::Competition => &["name", "location", "start_date", "end_date"],
            Self::Event => &["competition_id", "athlete_id", "name", "date_time"],
            Self::User => &["username", "athletes_following"],
            Self::Athlete => &["first_name", "last_name", "bio", "birthday"],
        }
    }

    /// Returns the fields asserted equal after a create-then-read.
    ///
    /// Date fields are excluded because the service may normalize them.
    #[must_use]
    pub const fn round_trip_fields(self) -> &'static [&'static str] {
        match self {
            Self::Competition => &["name", "location"],
            Self::Event => &["name"],
            Self::User => &["username"],
            Self::Athlete => &["first_name", "last_name"],
        }
    }

    /// Returns the date/time field the service validates, if any.
    #[must_use]
    pub const fn date_field(self) -> Option<DateField> {
        match self {
            Self::Competition => Some(DateField {
                name: "end_date",
                format: DateFormat::CalendarDate,
            }),
            Self::Event => Some(DateField {
                name: "date_time",
                format: DateFormat::DateTime,
            }),
            Self::User => None,
            Self::Athlete => Some(DateField {
                name: "birthday",
                format: DateFormat::CalendarDate,
            }),
        }
    }

    /// Returns true when the service answers `GET` on the collection path.
    ///
    /// Users are only reachable by id.
    #[must_use]
    pub const fn has_listing(self) -> bool {
        !matches!(self, Self::User)
    }

    /// Returns true when `field` is part of the declared request shape.
    #[must_use]
    pub fn declares(self, field: &str) -> bool {
        self.declared_fields().contains(&field)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Date Fields
// ============================================================================

/// A validated date/time field on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateField {
    /// Field name in the request body.
    pub name: &'static str,
    /// Format the service enforces.
    pub format: DateFormat,
}

/// Wire formats for date/time fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    CalendarDate,
    /// RFC 3339 date-time with offset, `YYYY-MM-DDThh:mm:ss±hh:mm`.
    DateTime,
}

/// Value used when truncation cannot produce an invalid date.
const MALFORMED_FALLBACK: &str = "not-a-date";

impl DateFormat {
    /// Returns true when `raw` parses in this format.
    #[must_use]
    pub fn accepts(self, raw: &str) -> bool {
        match self {
            Self::CalendarDate => {
                Date::parse(raw, format_description!("[year]-[month]-[day]")).is_ok()
            }
            Self::DateTime => OffsetDateTime::parse(raw, &Rfc3339).is_ok(),
        }
    }

    /// Derives a value from `valid` that this format rejects.
    ///
    /// Calendar dates gain a trailing digit (`2021-01-02` becomes
    /// `2021-01-022`); date-times lose the last two characters of their
    /// offset (`-08:00` becomes `-08:`).
    #[must_use]
    pub fn malform(self, valid: &str) -> String {
        let candidate = match self {
            Self::CalendarDate => format!("{valid}2"),
            Self::DateTime => {
                let cut = valid.char_indices().rev().nth(1).map_or(0, |(index, _)| index);
                valid[..cut].to_string()
            }
        };
        if candidate.is_empty() || self.accepts(&candidate) {
            MALFORMED_FALLBACK.to_string()
        } else {
            candidate
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
