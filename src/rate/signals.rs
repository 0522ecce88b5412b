use serde::Serialize;
use tracing::debug;

use crate::highlight::Severity;

use super::{sample_std_dev, SpeedSeries};

/// Named rule that fired against the rate series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    PaceTooSlowOverall,
    PaceTooFastOverall,
    PaceUnstable,
    PaceSpiky,
}

impl SignalKind {
    pub fn id(&self) -> &'static str {
        match self {
            SignalKind::PaceTooSlowOverall => "pace-too-slow-overall",
            SignalKind::PaceTooFastOverall => "pace-too-fast-overall",
            SignalKind::PaceUnstable => "pace-unstable",
            SignalKind::PaceSpiky => "pace-spiky",
        }
    }
}

/// Thresholds the generator evaluates the series against.
#[derive(Debug, Clone, Serialize)]
pub struct SignalThresholds {
    pub slow_wpm: f64,
    pub fast_wpm: f64,
    pub variability_cv: f64,
    pub spike_delta_wpm: f64,
    pub spike_count_threshold: usize,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            slow_wpm: 120.0,
            fast_wpm: 180.0,
            variability_cv: 0.25,
            spike_delta_wpm: 40.0,
            spike_count_threshold: 3,
        }
    }
}

/// The numbers that made a signal fire.
///
/// Enough context is retained to reconstruct the decision downstream; a bare
/// verdict is not auditable.
#[derive(Debug, Clone, Serialize)]
pub struct SignalEvidence {
    pub avg_wpm: f64,
    pub median_wpm: f64,
    pub p10_wpm: f64,
    pub p90_wpm: f64,
    pub variability_cv: f64,
    pub spike_count: usize,
    pub bin_seconds: f64,
    pub bin_count: usize,
    pub thresholds: SignalThresholds,
}

/// One coaching signal with its full numeric evidence.
#[derive(Debug, Clone, Serialize)]
pub struct CoachingSignal {
    pub id: &'static str,
    pub kind: SignalKind,
    pub severity: Severity,
    pub evidence: SignalEvidence,
}

/// Evaluate the rate series against the thresholds.
///
/// Fewer than two bins returns an empty set; there is not enough data for
/// any of the rules to be meaningful.
pub fn generate_signals(
    series: &SpeedSeries,
    thresholds: &SignalThresholds,
) -> Vec<CoachingSignal> {
    if series.bins.len() < 2 {
        return Vec::new();
    }

    let values = series.wpm_values();
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let median = percentile(&values, 50.0);
    let p10 = percentile(&values, 10.0);
    let p90 = percentile(&values, 90.0);
    let cv = if avg > 0.0 {
        sample_std_dev(&values) / avg
    } else {
        0.0
    };
    let spike_count = count_spikes(&values, thresholds.spike_delta_wpm);

    let evidence = SignalEvidence {
        avg_wpm: avg,
        median_wpm: median,
        p10_wpm: p10,
        p90_wpm: p90,
        variability_cv: cv,
        spike_count,
        bin_seconds: series.bin_seconds,
        bin_count: series.bins.len(),
        thresholds: thresholds.clone(),
    };

    let mut signals = Vec::new();

    if avg < thresholds.slow_wpm {
        signals.push(make_signal(
            SignalKind::PaceTooSlowOverall,
            distance_severity(thresholds.slow_wpm - avg),
            &evidence,
        ));
    } else if avg > thresholds.fast_wpm {
        signals.push(make_signal(
            SignalKind::PaceTooFastOverall,
            distance_severity(avg - thresholds.fast_wpm),
            &evidence,
        ));
    }

    if cv >= thresholds.variability_cv {
        let severity = if cv >= thresholds.variability_cv * 1.5 {
            Severity::High
        } else {
            Severity::Medium
        };
        signals.push(make_signal(SignalKind::PaceUnstable, severity, &evidence));
    }

    if spike_count >= thresholds.spike_count_threshold {
        let severity = if spike_count >= thresholds.spike_count_threshold * 2 {
            Severity::High
        } else {
            Severity::Medium
        };
        signals.push(make_signal(SignalKind::PaceSpiky, severity, &evidence));
    }

    debug!("Generated {} coaching signals", signals.len());
    signals
}

fn make_signal(kind: SignalKind, severity: Severity, evidence: &SignalEvidence) -> CoachingSignal {
    CoachingSignal {
        id: kind.id(),
        kind,
        severity,
        evidence: evidence.clone(),
    }
}

/// Severity from the distance between the average and its threshold.
fn distance_severity(diff_wpm: f64) -> Severity {
    if diff_wpm >= 40.0 {
        Severity::High
    } else if diff_wpm >= 20.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Nearest-rank percentile over the values.
fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Count adjacent-bin wpm jumps at or above `delta_wpm`.
fn count_spikes(values: &[f64], delta_wpm: f64) -> usize {
    values
        .windows(2)
        .filter(|pair| (pair[1] - pair[0]).abs() >= delta_wpm)
        .count()
}
