use serde::Serialize;
use tracing::debug;

use super::{sorted_by_start, TranscriptSegment};

/// What kind of disfluency a hesitation event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HesitationKind {
    /// A short silence between segments.
    Gap,
    /// A short, low-confidence fragment inside speech.
    Stumble,
}

/// One merged hesitation event on the recording timeline.
#[derive(Debug, Clone, Serialize)]
pub struct HesitationEvent {
    pub start_sec: f64,
    pub end_sec: f64,
    pub kind: HesitationKind,
}

/// Tuning for hesitation detection.
#[derive(Debug, Clone)]
pub struct HesitationConfig {
    /// Shortest inter-segment silence counted as a hesitation.
    pub min_gap_sec: f64,
    /// Longest inter-segment silence counted as a hesitation.
    pub max_gap_sec: f64,
    /// Silences at or above this length are long pauses, not hesitations.
    pub long_gap_sec: f64,
    /// Gaps flanked only by segments shorter than this are transcription
    /// artifacts and are rejected.
    pub min_neighbor_segment_sec: f64,
    /// Minimum segment duration for a stumble candidate.
    pub stumble_min_duration_sec: f64,
    /// Maximum segment duration for a stumble candidate.
    pub stumble_max_duration_sec: f64,
    /// Maximum recognition confidence for a stumble candidate.
    pub stumble_max_confidence: f64,
    /// Maximum trimmed text length (chars) for a stumble candidate.
    pub stumble_max_text_chars: usize,
    /// Stumbles this close to the previous accepted stumble collapse into it.
    pub stumble_burst_window_sec: f64,
    /// Candidate events closer than this are merged into one.
    pub merge_event_gap_sec: f64,
}

impl Default for HesitationConfig {
    fn default() -> Self {
        Self {
            min_gap_sec: 0.38,
            max_gap_sec: 1.20,
            long_gap_sec: 0.90,
            min_neighbor_segment_sec: 0.22,
            stumble_min_duration_sec: 0.18,
            stumble_max_duration_sec: 0.40,
            stumble_max_confidence: 0.50,
            stumble_max_text_chars: 2,
            stumble_burst_window_sec: 0.60,
            merge_event_gap_sec: 0.25,
        }
    }
}

/// Detect hesitation events in a segment stream.
///
/// Gap candidates and stumble candidates are collected in one pass over the
/// sorted segments, then merged into an ordered, non-overlapping event list.
pub fn detect_hesitations(
    segments: &[TranscriptSegment],
    config: &HesitationConfig,
) -> Vec<HesitationEvent> {
    let sorted = sorted_by_start(segments);

    let mut candidates = gap_candidates(&sorted, config);
    candidates.extend(stumble_candidates(&sorted, config));

    let merged = merge_events(candidates, config.merge_event_gap_sec);

    debug!("Detected {} hesitation events", merged.len());
    merged
}

fn gap_candidates(
    sorted: &[TranscriptSegment],
    config: &HesitationConfig,
) -> Vec<HesitationEvent> {
    let mut events = Vec::new();

    for pair in sorted.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let gap = right.start_offset_sec - left.end_sec();

        if gap < config.min_gap_sec || gap > config.max_gap_sec {
            continue;
        }
        // Long silences belong to the pause/highlight path.
        if gap >= config.long_gap_sec {
            continue;
        }
        // Both neighbors tiny: over-segmented transcription, not hesitation.
        if left.duration_sec < config.min_neighbor_segment_sec
            && right.duration_sec < config.min_neighbor_segment_sec
        {
            continue;
        }

        events.push(HesitationEvent {
            start_sec: left.end_sec(),
            end_sec: right.start_offset_sec,
            kind: HesitationKind::Gap,
        });
    }

    events
}

fn stumble_candidates(
    sorted: &[TranscriptSegment],
    config: &HesitationConfig,
) -> Vec<HesitationEvent> {
    let mut events: Vec<HesitationEvent> = Vec::new();

    for segment in sorted {
        if segment.duration_sec < config.stumble_min_duration_sec
            || segment.duration_sec > config.stumble_max_duration_sec
        {
            continue;
        }
        // A segment with no confidence score is not evidence of a stumble.
        let confident = match segment.confidence {
            Some(c) => c <= config.stumble_max_confidence,
            None => false,
        };
        if !confident {
            continue;
        }
        if segment.text.trim().chars().count() > config.stumble_max_text_chars {
            continue;
        }
        // Burst suppression: a run of stumbles counts once.
        if let Some(last) = events.last() {
            if segment.start_offset_sec - last.end_sec <= config.stumble_burst_window_sec {
                continue;
            }
        }

        events.push(HesitationEvent {
            start_sec: segment.start_offset_sec,
            end_sec: segment.end_sec(),
            kind: HesitationKind::Stumble,
        });
    }

    events
}

/// Coalesce candidate events whose gap is within `merge_gap_sec`.
///
/// The merged event spans the union; `Stumble` wins over `Gap` when the two
/// kinds differ.
fn merge_events(mut events: Vec<HesitationEvent>, merge_gap_sec: f64) -> Vec<HesitationEvent> {
    events.sort_by(|a, b| {
        a.start_sec
            .partial_cmp(&b.start_sec)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut merged: Vec<HesitationEvent> = Vec::new();

    for event in events {
        if let Some(last) = merged.last_mut() {
            if event.start_sec - last.end_sec <= merge_gap_sec {
                last.end_sec = last.end_sec.max(event.end_sec);
                if event.kind == HesitationKind::Stumble {
                    last.kind = HesitationKind::Stumble;
                }
                continue;
            }
        }
        merged.push(event);
    }

    merged
}
