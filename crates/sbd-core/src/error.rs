// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Workspace-wide error taxonomy.
///
/// Parameter and input validation errors are raised at the entry of the
/// offending stage and are fatal to that stage; join-key misses that signal
/// data corruption surface as [`SbdError::DataConsistency`].
#[derive(Debug, Error)]
pub enum SbdError {
    /// A configuration value is outside its domain (e.g. `jump = 0`).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A mandatory input is malformed or empty where at least one element is
    /// required.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A computation produced a non-finite value where a finite one is
    /// required.
    #[error("numerical issue: {0}")]
    NumericalIssue(String),

    /// A join key that must exist is missing; indicates corrupted inputs.
    #[error("data consistency violation: {0}")]
    DataConsistency(String),

    /// A configured time or work budget was exceeded.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// The run was cancelled through a [`crate::CancelToken`].
    #[error("cancelled")]
    Cancelled,
}

impl SbdError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn numerical_issue(message: impl Into<String>) -> Self {
        Self::NumericalIssue(message.into())
    }

    pub fn data_consistency(message: impl Into<String>) -> Self {
        Self::DataConsistency(message.into())
    }

    pub fn resource_limit(message: impl Into<String>) -> Self {
        Self::ResourceLimit(message.into())
    }

    pub fn cancelled() -> Self {
        Self::Cancelled
    }
}
