use tracing::debug;

use crate::transcript::{sorted_by_start, word_count, TranscriptSegment};

use super::{SpeedBin, SpeedSeries};

/// Default bin width in seconds.
pub const DEFAULT_BIN_SECONDS: f64 = 5.0;

/// Build a per-bin speaking-rate series for one recording.
///
/// With segments present, each segment's word count lands in the bin its
/// start offset falls into; segments starting at or after the recording end
/// are dropped. Without segments, the flat transcript's tokens are spread
/// evenly across the bins (no per-bin timing signal exists in that mode).
///
/// A non-positive duration or bin width yields an empty series.
pub fn build_speed_series(
    duration_sec: f64,
    transcript: &str,
    segments: &[TranscriptSegment],
    bin_seconds: f64,
) -> SpeedSeries {
    if duration_sec <= 0.0 || bin_seconds <= 0.0 {
        return SpeedSeries::empty(bin_seconds);
    }

    let bin_count = (duration_sec / bin_seconds).ceil() as usize;
    let mut bins: Vec<SpeedBin> = (0..bin_count)
        .map(|i| {
            let start = i as f64 * bin_seconds;
            SpeedBin {
                start_sec: start,
                end_sec: (start + bin_seconds).min(duration_sec),
                word_count: 0,
            }
        })
        .collect();

    if segments.is_empty() {
        distribute_flat_text(transcript, &mut bins);
    } else {
        for segment in sorted_by_start(segments) {
            if segment.start_offset_sec >= duration_sec || segment.start_offset_sec < 0.0 {
                continue;
            }
            let index =
                ((segment.start_offset_sec / bin_seconds).floor() as usize).min(bin_count - 1);
            bins[index].word_count += word_count(&segment.text);
        }
    }

    debug!(
        "Built speed series: {} bins of {:.1}s over {:.1}s",
        bins.len(),
        bin_seconds,
        duration_sec
    );

    SpeedSeries { bin_seconds, bins }
}

/// Fallback distribution when no timed segments exist: spread the flat
/// transcript's tokens evenly, preserving the total word count.
fn distribute_flat_text(transcript: &str, bins: &mut [SpeedBin]) {
    let total = word_count(transcript);
    if total == 0 || bins.is_empty() {
        return;
    }

    let bin_count = bins.len();
    for (i, bin) in bins.iter_mut().enumerate() {
        let up_to_here = ((i + 1) as f64 * total as f64 / bin_count as f64).round() as usize;
        let before = (i as f64 * total as f64 / bin_count as f64).round() as usize;
        bin.word_count = up_to_here - before;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, duration: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start_offset_sec: start,
            duration_sec: duration,
            confidence: Some(0.9),
        }
    }

    #[test]
    fn test_scenario_three_bins() {
        let segments = vec![
            segment(1.0, 0.8, "안녕하세요 여러분"),
            segment(6.0, 1.0, "오늘 주제는 테스트 입니다"),
        ];

        let series = build_speed_series(12.0, "", &segments, 5.0);

        let counts: Vec<usize> = series.bins.iter().map(|b| b.word_count).collect();
        assert_eq!(counts, vec![2, 4, 0]);
        assert!((series.bins[2].end_sec - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_conservation_with_segments() {
        let segments = vec![
            segment(0.0, 1.0, "하나 둘 셋"),
            segment(7.3, 1.0, "넷 다섯"),
            segment(20.0, 1.0, "버려지는 단어들"), // past the end
        ];

        let series = build_speed_series(10.0, "", &segments, 5.0);

        let total: usize = series.bins.iter().map(|b| b.word_count).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_zero_duration_yields_empty_series() {
        assert!(build_speed_series(0.0, "말 말", &[], 5.0).bins.is_empty());
    }

    #[test]
    fn test_zero_bin_width_yields_empty_series() {
        assert!(build_speed_series(10.0, "말 말", &[], 0.0).bins.is_empty());
    }

    #[test]
    fn test_flat_text_fallback_conserves_words() {
        let series = build_speed_series(30.0, "a b c d e f g", &[], 5.0);

        assert_eq!(series.bins.len(), 6);
        let total: usize = series.bins.iter().map(|b| b.word_count).sum();
        assert_eq!(total, 7);
    }

    #[test]
    fn test_flat_text_fallback_even_spread() {
        let series = build_speed_series(20.0, "a b c d e f g h", &[], 5.0);

        let counts: Vec<usize> = series.bins.iter().map(|b| b.word_count).collect();
        assert_eq!(counts, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_silent_bins_are_kept() {
        let segments = vec![segment(0.0, 1.0, "시작")];

        let series = build_speed_series(15.0, "", &segments, 5.0);

        assert_eq!(series.bins.len(), 3);
        assert_eq!(series.bins[1].word_count, 0);
        assert_eq!(series.bins[2].word_count, 0);
    }

    #[test]
    fn test_segment_on_bin_boundary() {
        let segments = vec![segment(5.0, 1.0, "경계")];

        let series = build_speed_series(10.0, "", &segments, 5.0);

        assert_eq!(series.bins[0].word_count, 0);
        assert_eq!(series.bins[1].word_count, 1);
    }
}
