use serde::Serialize;

use super::{sorted_by_start, TranscriptSegment};

/// A stretch of silence between two adjacent transcript segments.
#[derive(Debug, Clone, Serialize)]
pub struct PauseGap {
    pub start_sec: f64,
    pub end_sec: f64,
}

impl PauseGap {
    pub fn duration_sec(&self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// Compute silence gaps between consecutive segments.
///
/// Segments are sorted by start offset first; a gap exists wherever the left
/// segment ends before the right one starts. Gap ends are clamped to the
/// recording duration, and zero or negative gaps are omitted. Fewer than two
/// segments yields an empty list.
pub fn extract_gaps(segments: &[TranscriptSegment], duration_sec: f64) -> Vec<PauseGap> {
    if segments.len() < 2 {
        return Vec::new();
    }

    let sorted = sorted_by_start(segments);
    let mut gaps = Vec::new();

    for pair in sorted.windows(2) {
        let left_end = pair[0].end_sec();
        let right_start = pair[1].start_offset_sec.min(duration_sec);

        if left_end < right_start {
            gaps.push(PauseGap {
                start_sec: left_end,
                end_sec: right_start,
            });
        }
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, duration: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: "말".to_string(),
            start_offset_sec: start,
            duration_sec: duration,
            confidence: None,
        }
    }

    #[test]
    fn test_gaps_between_segments() {
        let segments = vec![segment(0.0, 1.0), segment(3.0, 1.0), segment(4.5, 1.0)];

        let gaps = extract_gaps(&segments, 6.0);

        assert_eq!(gaps.len(), 2);
        assert!((gaps[0].start_sec - 1.0).abs() < 1e-9);
        assert!((gaps[0].end_sec - 3.0).abs() < 1e-9);
        assert!((gaps[1].start_sec - 4.0).abs() < 1e-9);
        assert!((gaps[1].end_sec - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let segments = vec![segment(3.0, 1.0), segment(0.0, 1.0)];

        let gaps = extract_gaps(&segments, 6.0);

        assert_eq!(gaps.len(), 1);
        assert!((gaps[0].start_sec - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_segments_produce_no_gap() {
        let segments = vec![segment(0.0, 2.0), segment(2.0, 1.0)];
        assert!(extract_gaps(&segments, 6.0).is_empty());
    }

    #[test]
    fn test_overlapping_segments_produce_no_gap() {
        let segments = vec![segment(0.0, 3.0), segment(2.0, 1.0)];
        assert!(extract_gaps(&segments, 6.0).is_empty());
    }

    #[test]
    fn test_gap_end_clamped_to_duration() {
        let segments = vec![segment(0.0, 1.0), segment(10.0, 1.0)];

        let gaps = extract_gaps(&segments, 6.0);

        assert_eq!(gaps.len(), 1);
        assert!((gaps[0].end_sec - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_segment_yields_nothing() {
        let segments = vec![segment(0.0, 1.0)];
        assert!(extract_gaps(&segments, 6.0).is_empty());
    }
}
