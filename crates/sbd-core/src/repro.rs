// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Reproducibility/accuracy trade-off for numeric kernels.
///
/// `Strict` switches prefix-statistic accumulation to Kahan compensated
/// summation so results are bit-stable across runs and platforms; `Fast` and
/// `Balanced` use plain accumulation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReproMode {
    Fast,
    #[default]
    Balanced,
    Strict,
}
