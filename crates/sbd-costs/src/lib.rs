// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Segment cost models for offline change-point search.

pub mod model;
pub mod normal;

pub use model::CostModel;
pub use normal::{CostNormalMeanVar, NormalCache};
