pub mod gaps;
pub mod hesitation;

pub use gaps::{extract_gaps, PauseGap};
pub use hesitation::{detect_hesitations, HesitationConfig, HesitationEvent, HesitationKind};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeechlensError};

/// One time-aligned segment produced by an external transcription provider.
///
/// The engine never trusts input ordering; anything consuming segments sorts
/// them by start offset first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_offset_sec: f64,
    pub duration_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl TranscriptSegment {
    pub fn end_sec(&self) -> f64 {
        self.start_offset_sec + self.duration_sec
    }
}

/// Input document for one analysis run: the recording duration, an optional
/// flat transcript, and the timed segments (may be empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDocument {
    pub duration_sec: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl TranscriptDocument {
    /// Read a transcript document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SpeechlensError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let document = serde_json::from_str(&contents)?;
        Ok(document)
    }
}

/// Return a copy of `segments` ordered by start offset.
pub fn sorted_by_start(segments: &[TranscriptSegment]) -> Vec<TranscriptSegment> {
    let mut sorted = segments.to_vec();
    sorted.sort_by(|a, b| {
        a.start_offset_sec
            .partial_cmp(&b.start_offset_sec)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

/// Count whitespace-separated tokens in a text fragment.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
