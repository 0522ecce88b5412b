pub mod binner;
pub mod signals;

pub use binner::build_speed_series;
pub use signals::{
    generate_signals, CoachingSignal, SignalEvidence, SignalKind, SignalThresholds,
};

use serde::Serialize;

const MIN_BIN_SECONDS: f64 = 1e-6;

/// One fixed-width time slice with the words spoken inside it.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedBin {
    pub start_sec: f64,
    pub end_sec: f64,
    pub word_count: usize,
}

impl SpeedBin {
    /// Local speaking rate in words per minute.
    pub fn wpm(&self) -> f64 {
        let seconds = (self.end_sec - self.start_sec).max(MIN_BIN_SECONDS);
        self.word_count as f64 / seconds * 60.0
    }
}

/// A per-bin speaking-rate series over one recording.
#[derive(Debug, Clone, Serialize)]
pub struct SpeedSeries {
    pub bin_seconds: f64,
    pub bins: Vec<SpeedBin>,
}

impl SpeedSeries {
    pub fn empty(bin_seconds: f64) -> Self {
        Self {
            bin_seconds,
            bins: Vec::new(),
        }
    }

    pub fn wpm_values(&self) -> Vec<f64> {
        self.bins.iter().map(SpeedBin::wpm).collect()
    }

    /// Overall rate: total words over total covered seconds.
    pub fn average_wpm(&self) -> f64 {
        let total_seconds: f64 = self
            .bins
            .iter()
            .map(|b| b.end_sec - b.start_sec)
            .sum();
        if total_seconds <= 0.0 {
            return 0.0;
        }
        let total_words: usize = self.bins.iter().map(|b| b.word_count).sum();
        total_words as f64 / total_seconds * 60.0
    }

    /// Sample standard deviation of per-bin wpm; 0 below 2 bins.
    pub fn variability(&self) -> f64 {
        let values = self.wpm_values();
        sample_std_dev(&values)
    }

    pub fn max_wpm(&self) -> f64 {
        self.wpm_values().into_iter().fold(0.0, f64::max)
    }

    pub fn min_wpm(&self) -> f64 {
        if self.bins.is_empty() {
            return 0.0;
        }
        self.wpm_values().into_iter().fold(f64::INFINITY, f64::min)
    }
}

/// Sample standard deviation; 0 for fewer than 2 values.
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(start: f64, end: f64, words: usize) -> SpeedBin {
        SpeedBin {
            start_sec: start,
            end_sec: end,
            word_count: words,
        }
    }

    #[test]
    fn test_bin_wpm() {
        let b = bin(0.0, 5.0, 10);
        assert!((b.wpm() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_bin_is_valid_silence() {
        let b = bin(5.0, 10.0, 0);
        assert_eq!(b.wpm(), 0.0);
    }

    #[test]
    fn test_average_wpm() {
        let series = SpeedSeries {
            bin_seconds: 5.0,
            bins: vec![bin(0.0, 5.0, 10), bin(5.0, 10.0, 20)],
        };
        // 30 words over 10 seconds.
        assert!((series.average_wpm() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_wpm_empty_series() {
        assert_eq!(SpeedSeries::empty(5.0).average_wpm(), 0.0);
    }

    #[test]
    fn test_variability_single_bin_is_zero() {
        let series = SpeedSeries {
            bin_seconds: 5.0,
            bins: vec![bin(0.0, 5.0, 10)],
        };
        assert_eq!(series.variability(), 0.0);
    }

    #[test]
    fn test_variability_constant_series_is_zero() {
        let series = SpeedSeries {
            bin_seconds: 5.0,
            bins: vec![bin(0.0, 5.0, 10), bin(5.0, 10.0, 10)],
        };
        assert!(series.variability().abs() < 1e-9);
    }

    #[test]
    fn test_sample_std_dev() {
        // Values 2, 4, 4, 4, 5, 5, 7, 9: sample std dev ≈ 2.138.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_std_dev(&values) - 2.13809).abs() < 1e-4);
    }

    #[test]
    fn test_max_min_wpm() {
        let series = SpeedSeries {
            bin_seconds: 5.0,
            bins: vec![bin(0.0, 5.0, 5), bin(5.0, 10.0, 15)],
        };
        assert!((series.max_wpm() - 180.0).abs() < 1e-9);
        assert!((series.min_wpm() - 60.0).abs() < 1e-9);
    }
}
