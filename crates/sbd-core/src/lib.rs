// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Core shared types for the structural-break detection workspace.
//!
//! Everything the detection, cost, and attribution crates share lives here:
//! the error taxonomy, the validated price series, search constraints,
//! cancellation and budget control, the execution context threaded through
//! detector calls, and the detection result with its diagnostics.

pub mod constraints;
pub mod control;
pub mod detectors;
pub mod diagnostics;
pub mod error;
pub mod execution_context;
pub mod numeric;
pub mod observability;
pub mod repro;
pub mod results;
pub mod series;

pub use constraints::{Constraints, ValidatedConstraints, validate_constraints};
pub use control::{BudgetMode, BudgetStatus, CancelToken};
pub use detectors::OfflineDetector;
pub use diagnostics::{Diagnostics, PruningStats};
pub use error::SbdError;
pub use execution_context::ExecutionContext;
pub use numeric::{prefix_sum_squares, prefix_sum_squares_kahan, prefix_sums, prefix_sums_kahan};
pub use observability::{ProgressSink, TelemetrySink};
pub use repro::ReproMode;
pub use results::{ChangePointResult, validate_breakpoints};
pub use series::{PricePoint, PriceSeries};
