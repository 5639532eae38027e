// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Prefix-statistic helpers shared by segment cost models.
//!
//! Every function returns a vector of length `values.len() + 1` with a
//! leading zero, so the statistic over the half-open segment `[start, end)`
//! is `prefix[end] - prefix[start]`.

/// Plain running sums.
pub fn prefix_sums(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    let mut acc = 0.0;
    out.push(acc);
    for &v in values {
        acc += v;
        out.push(acc);
    }
    out
}

/// Running sums with Kahan compensation.
pub fn prefix_sums_kahan(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    let mut acc = 0.0;
    let mut compensation = 0.0;
    out.push(acc);
    for &v in values {
        let y = v - compensation;
        let t = acc + y;
        compensation = (t - acc) - y;
        acc = t;
        out.push(acc);
    }
    out
}

/// Plain running sums of squares.
pub fn prefix_sum_squares(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    let mut acc = 0.0;
    out.push(acc);
    for &v in values {
        acc += v * v;
        out.push(acc);
    }
    out
}

/// Running sums of squares with Kahan compensation.
pub fn prefix_sum_squares_kahan(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    let mut acc = 0.0;
    let mut compensation = 0.0;
    out.push(acc);
    for &v in values {
        let y = v * v - compensation;
        let t = acc + y;
        compensation = (t - acc) - y;
        acc = t;
        out.push(acc);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{prefix_sum_squares, prefix_sum_squares_kahan, prefix_sums, prefix_sums_kahan};

    #[test]
    fn prefix_sums_have_leading_zero_and_segment_differences() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let sums = prefix_sums(&values);
        assert_eq!(sums, vec![0.0, 1.0, 3.0, 6.0, 10.0]);
        assert_eq!(sums[3] - sums[1], 5.0); // segment [1, 3)
    }

    #[test]
    fn prefix_sum_squares_matches_manual_expansion() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(prefix_sum_squares(&values), vec![0.0, 1.0, 5.0, 14.0]);
    }

    #[test]
    fn kahan_variants_agree_with_plain_on_small_inputs() {
        let values = [0.5, -1.25, 2.75, 0.125];
        assert_eq!(prefix_sums(&values), prefix_sums_kahan(&values));
        assert_eq!(prefix_sum_squares(&values), prefix_sum_squares_kahan(&values));
    }

    #[test]
    fn empty_input_yields_single_zero() {
        assert_eq!(prefix_sums(&[]), vec![0.0]);
        assert_eq!(prefix_sums_kahan(&[]), vec![0.0]);
        assert_eq!(prefix_sum_squares(&[]), vec![0.0]);
        assert_eq!(prefix_sum_squares_kahan(&[]), vec![0.0]);
    }
}
