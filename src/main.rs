use anyhow::{Context, Result};
use clap::Parser;
use speechlens::analysis::{analyze, print_summary, AnalysisInput, AnalysisOptions};
use speechlens::audio::load_wav_mono;
use speechlens::config::{Config, OutputFormat};
use speechlens::transcript::TranscriptDocument;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "speechlens")]
#[command(version, about = "Delivery coaching analysis for recorded speech")]
#[command(
    long_about = "Analyze a transcribed recording (and optionally its audio) into speaking-rate series, hesitation events, review highlights, and coaching signals."
)]
struct Cli {
    /// Transcript JSON file ({ duration_sec, text?, segments: [...] })
    input: PathBuf,

    /// WAV recording for audio-domain filled-pause detection
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Output report file (defaults to input name with report extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json, text
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Speaking-rate bin width in seconds
    #[arg(short, long)]
    bin_seconds: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn derive_output_path(input: &Path, format: &OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!(
        "{}.report.{}",
        stem.to_string_lossy(),
        format.extension()
    ));
    output
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(bin_seconds) = cli.bin_seconds {
        config.bin_seconds = bin_seconds;
    }
    config.validate().context("Configuration validation failed")?;

    let output = cli
        .output
        .unwrap_or_else(|| derive_output_path(&cli.input, &format));

    info!("Input:  {}", cli.input.display());
    info!("Output: {}", output.display());
    info!("Format: {}", format);

    let document = TranscriptDocument::load(&cli.input)
        .with_context(|| format!("Failed to load transcript {}", cli.input.display()))?;

    // Filled-pause detection is best-effort: a recording that fails to
    // decode downgrades to a transcript-only analysis.
    let audio = match &cli.audio {
        Some(path) => match load_wav_mono(path) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                warn!("Skipping audio analysis: {e}");
                None
            }
        },
        None => None,
    };

    let input = AnalysisInput {
        duration_sec: document.duration_sec,
        text: document.text.unwrap_or_default(),
        segments: document.segments,
        audio,
    };
    let options = AnalysisOptions {
        bin_seconds: config.bin_seconds,
        ..Default::default()
    };

    let report = analyze(&input, &options);

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render_text(&report),
    };
    std::fs::write(&output, rendered)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote report to {}", output.display());
    print_summary(&report);

    Ok(())
}

fn render_text(report: &speechlens::analysis::AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("duration_sec: {:.1}\n", report.stats.duration_sec));
    out.push_str(&format!("average_wpm: {:.1}\n", report.average_wpm));
    out.push_str(&format!("summary: {}\n", report.summary_line));
    out.push_str(&format!("hesitations: {}\n", report.stats.hesitation_count));
    out.push_str(&format!("fillers: {}\n", report.stats.filler_count));
    for highlight in &report.highlights {
        out.push_str(&format!(
            "highlight: {:.1}-{:.1} {} [{:?}]\n",
            highlight.start_sec, highlight.end_sec, highlight.reason_code, highlight.severity
        ));
    }
    for signal in &report.signals {
        out.push_str(&format!("signal: {} [{:?}]\n", signal.id, signal.severity));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path() {
        let input = PathBuf::from("/path/to/talk.json");

        let json_output = derive_output_path(&input, &OutputFormat::Json);
        assert_eq!(json_output, PathBuf::from("/path/to/talk.report.json"));

        let text_output = derive_output_path(&input, &OutputFormat::Text);
        assert_eq!(text_output, PathBuf::from("/path/to/talk.report.txt"));
    }
}
