// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::SbdError;
use crate::execution_context::ExecutionContext;
use crate::results::ChangePointResult;

/// Offline detector contract: full series in, full result out.
///
/// Each call is independent and deterministic for identical inputs; repeated
/// runs (e.g. a penalty sweep) share no mutable state.
pub trait OfflineDetector {
    fn detect(
        &self,
        x: &[f64],
        ctx: &ExecutionContext<'_>,
    ) -> Result<ChangePointResult, SbdError>;
}
