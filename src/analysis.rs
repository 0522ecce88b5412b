use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::audio::{detect_filled_pauses, AudioBuffer, FilledPauseConfig, FillerEvent};
use crate::delivery::{match_text_fillers, summarize_delivery, DeliveryLexicon, DeliverySummary};
use crate::highlight::{extract_highlights, SpeechHighlight};
use crate::rate::{
    build_speed_series, generate_signals, CoachingSignal, SignalThresholds, SpeedSeries,
};
use crate::transcript::{
    detect_hesitations, extract_gaps, HesitationConfig, HesitationEvent, PauseGap,
    TranscriptSegment,
};

/// Everything one analysis pass consumes.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub duration_sec: f64,
    /// Flat transcript, used only when no timed segments exist.
    pub text: String,
    pub segments: Vec<TranscriptSegment>,
    /// Decoded audio; filled-pause detection is skipped when absent.
    pub audio: Option<AudioBuffer>,
}

/// Tuning for one analysis pass.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub bin_seconds: f64,
    pub hesitation: HesitationConfig,
    pub filled_pause: FilledPauseConfig,
    pub signal_thresholds: SignalThresholds,
    pub lexicon: DeliveryLexicon,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bin_seconds: crate::rate::binner::DEFAULT_BIN_SECONDS,
            hesitation: HesitationConfig::default(),
            filled_pause: FilledPauseConfig::default(),
            signal_thresholds: SignalThresholds::default(),
            lexicon: DeliveryLexicon::default(),
        }
    }
}

/// Simple counts describing one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStats {
    pub duration_sec: f64,
    pub segment_count: usize,
    pub bin_count: usize,
    pub hesitation_count: usize,
    pub filler_count: usize,
    pub highlight_count: usize,
    pub signal_count: usize,
    pub elapsed_ms: u64,
}

/// The full coaching report for one recording.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub speed_series: SpeedSeries,
    pub average_wpm: f64,
    pub variability_wpm: f64,
    pub gaps: Vec<PauseGap>,
    pub hesitations: Vec<HesitationEvent>,
    pub fillers: Vec<FillerEvent>,
    pub delivery: DeliverySummary,
    pub summary_line: String,
    pub highlights: Vec<SpeechHighlight>,
    pub signals: Vec<CoachingSignal>,
    pub stats: AnalysisStats,
}

/// Run one full analysis pass over a recording.
///
/// Pure and stateless: the same input always yields the same report, and
/// concurrent calls on different inputs need no coordination. Degenerate
/// input produces empty series and event lists, never an error.
pub fn analyze(input: &AnalysisInput, options: &AnalysisOptions) -> AnalysisReport {
    let started = Instant::now();

    info!(
        "Analyzing {:.1}s recording, {} segments, audio {}",
        input.duration_sec,
        input.segments.len(),
        if input.audio.is_some() { "present" } else { "absent" }
    );

    let speed_series = build_speed_series(
        input.duration_sec,
        &input.text,
        &input.segments,
        options.bin_seconds,
    );
    let gaps = extract_gaps(&input.segments, input.duration_sec);
    let hesitations = detect_hesitations(&input.segments, &options.hesitation);

    let mut fillers = match_text_fillers(&input.segments, &options.lexicon);
    if let Some(audio) = &input.audio {
        if audio.samples.is_empty() {
            warn!("Audio buffer is empty; skipping filled-pause detection");
        }
        fillers.extend(detect_filled_pauses(audio, &options.filled_pause));
    }

    let delivery = summarize_delivery(
        &speed_series,
        &gaps,
        &input.segments,
        input.duration_sec,
        &options.lexicon,
    );
    let highlights = extract_highlights(input.duration_sec, &input.segments, &speed_series);
    let signals = generate_signals(&speed_series, &options.signal_thresholds);

    let stats = AnalysisStats {
        duration_sec: input.duration_sec,
        segment_count: input.segments.len(),
        bin_count: speed_series.bins.len(),
        hesitation_count: hesitations.len(),
        filler_count: fillers.len(),
        highlight_count: highlights.len(),
        signal_count: signals.len(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    };

    info!(
        "Analysis complete: {} bins, {} hesitations, {} fillers, {} highlights, {} signals",
        stats.bin_count,
        stats.hesitation_count,
        stats.filler_count,
        stats.highlight_count,
        stats.signal_count
    );

    AnalysisReport {
        average_wpm: speed_series.average_wpm(),
        variability_wpm: speed_series.variability(),
        summary_line: delivery.summary_line(),
        speed_series,
        gaps,
        hesitations,
        fillers,
        delivery,
        highlights,
        signals,
        stats,
    }
}

/// Print a console summary of the report.
pub fn print_summary(report: &AnalysisReport) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                      Speech Analysis Complete                  ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Duration:     {:.1}s", report.stats.duration_sec);
    println!("  Average rate: {:.0} wpm", report.average_wpm);
    println!("  Summary:      {}", report.summary_line);
    println!();
    println!("  Hesitations:  {}", report.stats.hesitation_count);
    println!("  Fillers:      {}", report.stats.filler_count);
    println!();
    if report.highlights.is_empty() {
        println!("  No highlights flagged for review.");
    } else {
        println!("  Highlights:");
        for highlight in &report.highlights {
            println!(
                "    [{:?}] {:.1}s-{:.1}s  {} ({})",
                highlight.severity,
                highlight.start_sec,
                highlight.end_sec,
                highlight.title,
                highlight.detail
            );
        }
    }
    if !report.signals.is_empty() {
        println!();
        println!("  Signals:");
        for signal in &report.signals {
            println!("    [{:?}] {}", signal.severity, signal.id);
        }
    }
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, duration: f64, text: &str, confidence: Option<f64>) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start_offset_sec: start,
            duration_sec: duration,
            confidence,
        }
    }

    fn scenario_input() -> AnalysisInput {
        AnalysisInput {
            duration_sec: 12.0,
            text: String::new(),
            segments: vec![
                segment(1.0, 0.8, "안녕하세요 여러분", Some(0.9)),
                segment(6.0, 1.0, "오늘 주제는 테스트 입니다", Some(0.9)),
            ],
            audio: None,
        }
    }

    #[test]
    fn test_scenario_report() {
        let report = analyze(&scenario_input(), &AnalysisOptions::default());

        let counts: Vec<usize> = report
            .speed_series
            .bins
            .iter()
            .map(|b| b.word_count)
            .collect();
        assert_eq!(counts, vec![2, 4, 0]);
        assert_eq!(report.stats.segment_count, 2);
        assert_eq!(report.stats.bin_count, 3);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let input = scenario_input();
        let options = AnalysisOptions::default();

        let a = serde_json::to_string(&{
            let mut r = analyze(&input, &options);
            r.stats.elapsed_ms = 0;
            r
        })
        .unwrap();
        let b = serde_json::to_string(&{
            let mut r = analyze(&input, &options);
            r.stats.elapsed_ms = 0;
            r
        })
        .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let input = AnalysisInput {
            duration_sec: 0.0,
            text: String::new(),
            segments: Vec::new(),
            audio: None,
        };

        let report = analyze(&input, &AnalysisOptions::default());

        assert!(report.speed_series.bins.is_empty());
        assert!(report.gaps.is_empty());
        assert!(report.hesitations.is_empty());
        assert!(report.fillers.is_empty());
        assert!(report.highlights.is_empty());
        assert!(report.signals.is_empty());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = analyze(&scenario_input(), &AnalysisOptions::default());
        let json = serde_json::to_string_pretty(&report).unwrap();

        assert!(json.contains("\"speed_series\""));
        assert!(json.contains("\"delivery\""));
        assert!(json.contains("\"signals\""));
    }
}
