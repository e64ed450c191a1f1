// crates/podium-contract/src/lifecycle.rs
// ============================================================================
// Module: Resource Lifecycle
// Description: Externally observed state machine for one resource instance.
// Purpose: Derive the expected status of each request from prior requests.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A resource instance moves `absent → created → deleted`, where `deleted`
//! behaves as `absent` for reads. POST creates, GET never transitions, DELETE
//! removes. [`Lifecycle`] tracks the state and tells the verifier which
//! [`StatusClass`] the next read must return.

use std::fmt;

use serde::Serialize;

use crate::error::LifecycleError;
use crate::status::StatusClass;

/// Observed state of a resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// Never created.
    Absent,
    /// Created and readable.
    Created,
    /// Deleted; reads yield not-found.
    Deleted,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Absent => "absent",
            Self::Created => "created",
            Self::Deleted => "deleted",
        })
    }
}

/// Requests that move the state machine. GET never transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// POST to the collection.
    Create,
    /// DELETE of the item.
    Delete,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Delete => "delete",
        })
    }
}

/// Lifecycle tracker for one resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    state: ResourceState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Starts a tracker in the `absent` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ResourceState::Absent,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ResourceState {
        self.state
    }

    /// Records a successful create.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] unless the resource is `absent`.
    pub fn create(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            ResourceState::Absent => {
                self.state = ResourceState::Created;
                Ok(())
            }
            state => Err(LifecycleError::InvalidTransition {
                state,
                transition: Transition::Create,
            }),
        }
    }

    /// Returns the status class a read must produce in the current state.
    #[must_use]
    pub const fn expected_read(&self) -> StatusClass {
        match self.state {
            ResourceState::Created => StatusClass::Success,
            ResourceState::Absent | ResourceState::Deleted => StatusClass::NotFound,
        }
    }

    /// Records a successful delete.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] unless the resource is `created`.
    pub fn delete(&mut self) -> Result<(), LifecycleError> {
        match self.state {
            ResourceState::Created => {
                self.state = ResourceState::Deleted;
                Ok(())
            }
            state => Err(LifecycleError::InvalidTransition {
                state,
                transition: Transition::Delete,
            }),
        }
    }
}
