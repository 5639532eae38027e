// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};

/// Behavior when a configured budget is exceeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetMode {
    /// Fail the run with [`crate::SbdError::ResourceLimit`].
    HardFail,
    /// Keep running and report the exceeded status to the caller.
    SoftDegrade,
}

/// Budget check outcome reported by the execution context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetStatus {
    WithinBudget,
    ExceededSoftDegrade,
}

/// Thread-safe cooperative cancellation flag.
///
/// A token is shared by reference with the execution context; calling
/// [`CancelToken::cancel`] makes the next cancellation poll inside a running
/// detector fail with [`crate::SbdError::Cancelled`].
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
