pub mod lexicon;

pub use lexicon::DeliveryLexicon;

use serde::Serialize;

use crate::audio::{FillerEvent, FillerKind};
use crate::rate::SpeedSeries;
use crate::transcript::{PauseGap, TranscriptSegment};

const SLOW_WPM_CUTOFF: f64 = 120.0;
const FAST_WPM_CUTOFF: f64 = 170.0;

const STABLE_STD_DEV: f64 = 12.0;
const MIXED_STD_DEV: f64 = 25.0;

const LONG_PAUSE_SEC: f64 = 1.0;
const VERY_LONG_PAUSE_SEC: f64 = 2.0;
const CHOPPY_LONG_PER_MIN: f64 = 1.5;
const THINKING_VERY_LONG_PER_MIN: f64 = 0.6;

const CONFIDENT_MEAN: f64 = 0.70;
const NEUTRAL_MEAN: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceType {
    Slow,
    Comfortable,
    Fast,
}

impl std::fmt::Display for PaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaceType::Slow => write!(f, "slow"),
            PaceType::Comfortable => write!(f, "comfortable"),
            PaceType::Fast => write!(f, "fast"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityType {
    Stable,
    Mixed,
    Unstable,
}

impl std::fmt::Display for StabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StabilityType::Stable => write!(f, "steady"),
            StabilityType::Mixed => write!(f, "uneven"),
            StabilityType::Unstable => write!(f, "erratic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseStyle {
    Smooth,
    ThinkingPause,
    Choppy,
}

impl std::fmt::Display for PauseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PauseStyle::Smooth => write!(f, "smooth"),
            PauseStyle::ThinkingPause => write!(f, "deliberate"),
            PauseStyle::Choppy => write!(f, "choppy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    Clear,
    Partial,
    Unclear,
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureType::Clear => write!(f, "clear"),
            StructureType::Partial => write!(f, "partial"),
            StructureType::Unclear => write!(f, "unclear"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceType {
    Confident,
    Neutral,
    Hesitant,
}

impl std::fmt::Display for ConfidenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceType::Confident => write!(f, "confident"),
            ConfidenceType::Neutral => write!(f, "neutral"),
            ConfidenceType::Hesitant => write!(f, "hesitant"),
        }
    }
}

/// Categorical summary of one delivery, a pure function of its inputs.
#[derive(Debug, Clone, Serialize)]
pub struct DeliverySummary {
    pub pace: PaceType,
    pub stability: StabilityType,
    pub pause_style: PauseStyle,
    pub structure: StructureType,
    pub confidence: ConfidenceType,
}

impl DeliverySummary {
    /// One-sentence rendering of the five labels.
    pub fn summary_line(&self) -> String {
        format!(
            "Delivery was {} and {}, with {} pausing, {} structure, and a {} tone.",
            self.pace, self.stability, self.pause_style, self.structure, self.confidence
        )
    }
}

/// Classify all five delivery dimensions at once.
pub fn summarize_delivery(
    series: &SpeedSeries,
    gaps: &[PauseGap],
    segments: &[TranscriptSegment],
    duration_sec: f64,
    lexicon: &DeliveryLexicon,
) -> DeliverySummary {
    DeliverySummary {
        pace: classify_pace(series.average_wpm()),
        stability: classify_stability(series),
        pause_style: classify_pause_style(gaps, duration_sec),
        structure: classify_structure(segments, lexicon),
        confidence: classify_confidence(segments),
    }
}

/// Canonical pace buckets: slow below 120 wpm, fast above 170.
pub fn classify_pace(avg_wpm: f64) -> PaceType {
    if avg_wpm < SLOW_WPM_CUTOFF {
        PaceType::Slow
    } else if avg_wpm <= FAST_WPM_CUTOFF {
        PaceType::Comfortable
    } else {
        PaceType::Fast
    }
}

/// Stability from the spread of per-bin rates.
///
/// Fewer than three bins is too little evidence either way and reads as
/// Mixed.
pub fn classify_stability(series: &SpeedSeries) -> StabilityType {
    if series.bins.len() < 3 {
        return StabilityType::Mixed;
    }
    let std_dev = series.variability();
    if std_dev < STABLE_STD_DEV {
        StabilityType::Stable
    } else if std_dev < MIXED_STD_DEV {
        StabilityType::Mixed
    } else {
        StabilityType::Unstable
    }
}

/// Pause style from long-pause frequency per minute of speech.
pub fn classify_pause_style(gaps: &[PauseGap], duration_sec: f64) -> PauseStyle {
    if duration_sec <= 0.0 {
        return PauseStyle::Smooth;
    }
    let minutes = duration_sec / 60.0;

    let long = gaps
        .iter()
        .filter(|g| g.duration_sec() >= LONG_PAUSE_SEC)
        .count() as f64;
    let very_long = gaps
        .iter()
        .filter(|g| g.duration_sec() >= VERY_LONG_PAUSE_SEC)
        .count() as f64;

    if very_long / minutes >= THINKING_VERY_LONG_PER_MIN {
        PauseStyle::ThinkingPause
    } else if long / minutes >= CHOPPY_LONG_PER_MIN {
        PauseStyle::Choppy
    } else {
        PauseStyle::Smooth
    }
}

/// Structure from intro/closing keyword presence across the full transcript.
pub fn classify_structure(
    segments: &[TranscriptSegment],
    lexicon: &DeliveryLexicon,
) -> StructureType {
    let has_intro = segments.iter().any(|s| lexicon.contains_intro(&s.text));
    let has_closing = segments.iter().any(|s| lexicon.contains_closing(&s.text));

    match (has_intro, has_closing) {
        (true, true) => StructureType::Clear,
        (false, false) => StructureType::Unclear,
        _ => StructureType::Partial,
    }
}

/// Confidence from the mean of available recognition scores.
pub fn classify_confidence(segments: &[TranscriptSegment]) -> ConfidenceType {
    let scores: Vec<f64> = segments.iter().filter_map(|s| s.confidence).collect();
    if scores.is_empty() {
        return ConfidenceType::Neutral;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;

    if mean >= CONFIDENT_MEAN {
        ConfidenceType::Confident
    } else if mean >= NEUTRAL_MEAN {
        ConfidenceType::Neutral
    } else {
        ConfidenceType::Hesitant
    }
}

/// Match whole-segment filler tokens against the lexicon.
///
/// This is the text-domain complement of the audio detector: a dictionary
/// lookup, with the segment's own recognition score carried as confidence.
pub fn match_text_fillers(
    segments: &[TranscriptSegment],
    lexicon: &DeliveryLexicon,
) -> Vec<FillerEvent> {
    segments
        .iter()
        .filter(|s| lexicon.is_filler_token(&s.text))
        .map(|s| FillerEvent {
            start_sec: s.start_offset_sec,
            end_sec: s.end_sec(),
            kind: FillerKind::TextToken,
            confidence: s.confidence.unwrap_or(1.0) as f32,
        })
        .collect()
}
