use serde::Serialize;
use tracing::debug;

use crate::rate::SpeedSeries;
use crate::transcript::{extract_gaps, sorted_by_start, TranscriptSegment};

/// How strongly a finding deserves attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// What a highlight is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightCategory {
    Pause,
    Pace,
    Confidence,
}

/// A review-worthy span of the recording.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechHighlight {
    pub title: String,
    pub detail: String,
    pub start_sec: f64,
    pub end_sec: f64,
    pub reason_code: &'static str,
    pub category: HighlightCategory,
    pub severity: Severity,
}

const MAX_HIGHLIGHTS: usize = 3;
const MIN_SPAN_SEC: f64 = 0.5;

const PAUSE_FLOOR_SEC: f64 = 1.2;
const PAUSE_MEDIUM_SEC: f64 = 1.8;
const PAUSE_HIGH_SEC: f64 = 2.5;

const RATE_FLOOR_WPM: f64 = 170.0;
const RATE_MEDIUM_WPM: f64 = 185.0;
const RATE_HIGH_WPM: f64 = 200.0;

const CONFIDENCE_MEDIUM: f64 = 0.70;
const CONFIDENCE_HIGH: f64 = 0.55;

/// Pick up to three non-overlapping highlight spans for review.
///
/// Candidates are generated in fixed priority order (longest pause, fastest
/// rate bin, lowest-confidence segment) and inserted with overlap resolution:
/// the higher severity wins an overlapping region. The result keeps
/// generation order, not time order.
pub fn extract_highlights(
    duration_sec: f64,
    segments: &[TranscriptSegment],
    series: &SpeedSeries,
) -> Vec<SpeechHighlight> {
    let mut highlights: Vec<SpeechHighlight> = Vec::new();

    if let Some(candidate) = longest_pause_candidate(duration_sec, segments) {
        upsert(&mut highlights, candidate, duration_sec);
    }
    if let Some(candidate) = fastest_bin_candidate(series) {
        upsert(&mut highlights, candidate, duration_sec);
    }
    if let Some(candidate) = lowest_confidence_candidate(segments) {
        upsert(&mut highlights, candidate, duration_sec);
    }

    highlights.truncate(MAX_HIGHLIGHTS);
    debug!("Extracted {} highlights", highlights.len());
    highlights
}

fn longest_pause_candidate(
    duration_sec: f64,
    segments: &[TranscriptSegment],
) -> Option<SpeechHighlight> {
    let gaps = extract_gaps(segments, duration_sec);
    let longest = gaps.into_iter().max_by(|a, b| {
        a.duration_sec()
            .partial_cmp(&b.duration_sec())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;

    let length = longest.duration_sec();
    if length < PAUSE_FLOOR_SEC {
        return None;
    }

    let severity = if length >= PAUSE_HIGH_SEC {
        Severity::High
    } else if length >= PAUSE_MEDIUM_SEC {
        Severity::Medium
    } else {
        Severity::Low
    };

    Some(SpeechHighlight {
        title: "Longest pause".to_string(),
        detail: format!("{:.1}s of silence", length),
        start_sec: longest.start_sec,
        end_sec: longest.end_sec,
        reason_code: "long-pause",
        category: HighlightCategory::Pause,
        severity,
    })
}

fn fastest_bin_candidate(series: &SpeedSeries) -> Option<SpeechHighlight> {
    let fastest = series.bins.iter().max_by(|a, b| {
        a.wpm()
            .partial_cmp(&b.wpm())
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;

    let wpm = fastest.wpm();
    if wpm < RATE_FLOOR_WPM {
        return None;
    }

    let severity = if wpm >= RATE_HIGH_WPM {
        Severity::High
    } else if wpm >= RATE_MEDIUM_WPM {
        Severity::Medium
    } else {
        Severity::Low
    };

    Some(SpeechHighlight {
        title: "Fastest stretch".to_string(),
        detail: format!("{:.0} wpm in this span", wpm),
        start_sec: fastest.start_sec,
        end_sec: fastest.end_sec,
        reason_code: "rate-spike",
        category: HighlightCategory::Pace,
        severity,
    })
}

fn lowest_confidence_candidate(segments: &[TranscriptSegment]) -> Option<SpeechHighlight> {
    let sorted = sorted_by_start(segments);
    let lowest = sorted
        .iter()
        .filter_map(|s| s.confidence.map(|c| (s, c)))
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

    let (segment, confidence) = lowest;
    let severity = if confidence <= CONFIDENCE_HIGH {
        Severity::High
    } else if confidence <= CONFIDENCE_MEDIUM {
        Severity::Medium
    } else {
        Severity::Low
    };

    Some(SpeechHighlight {
        title: "Least clear delivery".to_string(),
        detail: format!("recognition confidence {:.0}%", confidence * 100.0),
        start_sec: segment.start_offset_sec,
        end_sec: segment.end_sec(),
        reason_code: "low-confidence",
        category: HighlightCategory::Confidence,
        severity,
    })
}

/// Insert a candidate, resolving overlaps by severity.
///
/// The span is clamped to the recording and dropped if shorter than 0.5s.
/// Where a candidate strictly overlaps an accepted highlight, the higher
/// severity survives; equal severity keeps the earlier (higher-priority) one.
fn upsert(highlights: &mut Vec<SpeechHighlight>, mut candidate: SpeechHighlight, duration_sec: f64) {
    candidate.start_sec = candidate.start_sec.clamp(0.0, duration_sec);
    candidate.end_sec = candidate.end_sec.clamp(0.0, duration_sec);
    if candidate.end_sec - candidate.start_sec < MIN_SPAN_SEC {
        return;
    }

    let overlapping = highlights.iter().position(|existing| {
        candidate.start_sec.max(existing.start_sec) < candidate.end_sec.min(existing.end_sec)
    });

    match overlapping {
        Some(i) => {
            if candidate.severity > highlights[i].severity {
                highlights[i] = candidate;
            }
        }
        None => highlights.push(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::build_speed_series;

    fn segment(start: f64, duration: f64, text: &str, confidence: Option<f64>) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start_offset_sec: start,
            duration_sec: duration,
            confidence,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_longest_pause_highlight() {
        let segments = vec![
            segment(0.0, 1.0, "시작 합니다", Some(0.9)),
            segment(4.0, 1.0, "계속 이어서", Some(0.9)),
        ];
        let series = build_speed_series(10.0, "", &segments, 5.0);

        let highlights = extract_highlights(10.0, &segments, &series);

        let pause = highlights
            .iter()
            .find(|h| h.reason_code == "long-pause")
            .expect("pause highlight");
        // 3.0s pause is High severity.
        assert_eq!(pause.severity, Severity::High);
        assert!((pause.start_sec - 1.0).abs() < 1e-9);
        assert!((pause.end_sec - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_pause_not_highlighted() {
        let segments = vec![
            segment(0.0, 1.0, "하나", Some(0.9)),
            segment(2.0, 1.0, "둘", Some(0.9)),
        ];
        let series = SpeedSeries::empty(5.0);

        let highlights = extract_highlights(10.0, &segments, &series);
        assert!(highlights.iter().all(|h| h.reason_code != "long-pause"));
    }

    #[test]
    fn test_fast_bin_highlight() {
        // 16 words in a 5s bin = 192 wpm → Medium.
        let words = vec!["말"; 16].join(" ");
        let segments = vec![segment(0.0, 4.5, &words, Some(0.9))];
        let series = build_speed_series(5.0, "", &segments, 5.0);

        let highlights = extract_highlights(5.0, &segments, &series);

        let spike = highlights
            .iter()
            .find(|h| h.reason_code == "rate-spike")
            .expect("rate highlight");
        assert_eq!(spike.severity, Severity::Medium);
    }

    #[test]
    fn test_lowest_confidence_highlight() {
        let segments = vec![
            segment(0.0, 1.0, "또렷한 발음", Some(0.95)),
            segment(5.0, 1.0, "웅얼웅얼", Some(0.50)),
        ];
        let series = SpeedSeries::empty(5.0);

        let highlights = extract_highlights(10.0, &segments, &series);

        let low = highlights
            .iter()
            .find(|h| h.reason_code == "low-confidence")
            .expect("confidence highlight");
        assert_eq!(low.severity, Severity::High);
        assert!((low.start_sec - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_keeps_higher_severity() {
        let mut highlights = Vec::new();
        let make = |severity, reason| SpeechHighlight {
            title: String::new(),
            detail: String::new(),
            start_sec: 1.0,
            end_sec: 3.0,
            reason_code: reason,
            category: HighlightCategory::Pause,
            severity,
        };

        upsert(&mut highlights, make(Severity::Low, "a"), 10.0);
        upsert(&mut highlights, make(Severity::High, "b"), 10.0);
        upsert(&mut highlights, make(Severity::Medium, "c"), 10.0);

        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].reason_code, "b");
        assert_eq!(highlights[0].severity, Severity::High);
    }

    #[test]
    fn test_upsert_drops_tiny_span() {
        let mut highlights = Vec::new();
        let candidate = SpeechHighlight {
            title: String::new(),
            detail: String::new(),
            start_sec: 1.0,
            end_sec: 1.3,
            reason_code: "a",
            category: HighlightCategory::Pause,
            severity: Severity::High,
        };

        upsert(&mut highlights, candidate, 10.0);
        assert!(highlights.is_empty());
    }

    #[test]
    fn test_upsert_clamps_to_duration() {
        let mut highlights = Vec::new();
        let candidate = SpeechHighlight {
            title: String::new(),
            detail: String::new(),
            start_sec: 8.0,
            end_sec: 14.0,
            reason_code: "a",
            category: HighlightCategory::Pause,
            severity: Severity::Low,
        };

        upsert(&mut highlights, candidate, 10.0);

        assert_eq!(highlights.len(), 1);
        assert!((highlights[0].end_sec - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_at_three() {
        let words = vec!["말"; 20].join(" ");
        let segments = vec![
            segment(0.0, 1.0, "처음", Some(0.9)),
            segment(4.0, 4.5, &words, Some(0.4)),
            segment(12.0, 1.0, "끝", Some(0.9)),
        ];
        let series = build_speed_series(15.0, "", &segments, 5.0);

        let highlights = extract_highlights(15.0, &segments, &series);
        assert!(highlights.len() <= 3);
    }

    #[test]
    fn test_empty_input_yields_no_highlights() {
        let series = SpeedSeries::empty(5.0);
        assert!(extract_highlights(10.0, &[], &series).is_empty());
    }
}
