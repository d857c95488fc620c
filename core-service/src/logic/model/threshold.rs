//! Contamination Threshold
//!
//! Turns the contamination fraction into a score cut: the value that exactly
//! `contamination` of the training scores exceed.

use serde::{Deserialize, Serialize};

/// Linear-interpolated percentile of an ascending slice, `q` in [0, 100]
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !q.is_finite() {
        return None;
    }

    let q = q.clamp(0.0, 100.0);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Score threshold for the given training scores
pub fn calibrate(scores: &[f64], contamination: f64) -> Option<f64> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile(&sorted, 100.0 * (1.0 - contamination))
}

/// Summary of how a threshold splits the training scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdStats {
    pub threshold: f64,
    pub contamination: f64,
    pub flagged: usize,
    pub sample_count: usize,
}

impl ThresholdStats {
    pub fn from_scores(scores: &[f64], threshold: f64, contamination: f64) -> Self {
        Self {
            threshold,
            contamination,
            flagged: scores.iter().filter(|&&s| s > threshold).count(),
            sample_count: scores.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.0), Some(1.0));
        assert_eq!(percentile(&sorted, 50.0), Some(3.0));
        assert_eq!(percentile(&sorted, 100.0), Some(5.0));
        assert_eq!(percentile(&sorted, 87.5), Some(4.5));
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[0.3], 98.0), Some(0.3));
        assert_eq!(percentile(&[1.0, 2.0], f64::NAN), None);
    }

    #[test]
    fn test_calibrate_flags_contamination_fraction() {
        let scores: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let threshold = calibrate(&scores, 0.1).unwrap();

        let stats = ThresholdStats::from_scores(&scores, threshold, 0.1);
        assert_eq!(stats.flagged, 10);
        assert_eq!(stats.sample_count, 100);
    }

    #[test]
    fn test_calibrate_unsorted_input() {
        let scores = [0.9, 0.1, 0.5, 0.3, 0.7];
        assert_eq!(calibrate(&scores, 0.5), Some(0.5));
    }
}
