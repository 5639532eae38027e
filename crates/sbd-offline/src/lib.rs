// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Offline change-point detection: the PELT search and the penalty sweep.

pub mod pelt;
pub mod sweep;

pub use pelt::{Pelt, PeltConfig};
pub use sweep::{PenaltyRun, sweep_penalties};
