use serde::Serialize;
use tracing::debug;

use super::AudioBuffer;

/// Where a filler event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillerKind {
    /// Matched against a text filler lexicon.
    TextToken,
    /// Found by the audio-domain detector.
    FilledPauseAudio,
}

/// One detected filler sound or token.
#[derive(Debug, Clone, Serialize)]
pub struct FillerEvent {
    pub start_sec: f64,
    pub end_sec: f64,
    pub kind: FillerKind,
    pub confidence: f32,
}

/// Tuning for the audio-domain filled-pause detector.
#[derive(Debug, Clone)]
pub struct FilledPauseConfig {
    /// Analysis frame size in samples.
    pub frame_size: usize,
    /// Hop between frames in samples.
    pub hop_size: usize,
    /// Percentile of frame energy used as the noise floor.
    pub noise_floor_percentile: f64,
    /// Speech threshold offset above the noise floor, in dB.
    pub speech_db_offset: f64,
    /// Active regions separated by at most this much silence are merged.
    pub region_merge_gap_sec: f64,
    /// Shortest region accepted as a filler sound.
    pub min_duration_sec: f64,
    /// Longest region accepted as a filler sound.
    pub max_duration_sec: f64,
    /// Regions with mean ZCR above this are unvoiced, not fillers.
    pub max_zcr_for_voiced: f64,
    /// Neighbor frames this far above the speech threshold mark the region
    /// as part of ordinary speech.
    pub strong_offset_db: f64,
    /// How far to look for strong neighbors on each side.
    pub strong_neighbor_window_sec: f64,
    /// Minimum score for an event to be kept.
    pub min_confidence: f32,
    /// Events closer than this are merged, keeping the max confidence.
    pub merge_event_gap_sec: f64,
}

impl Default for FilledPauseConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            hop_size: 512,
            noise_floor_percentile: 20.0,
            speech_db_offset: 12.0,
            region_merge_gap_sec: 0.08,
            min_duration_sec: 0.22,
            max_duration_sec: 0.85,
            max_zcr_for_voiced: 0.10,
            strong_offset_db: 10.0,
            strong_neighbor_window_sec: 0.20,
            min_confidence: 0.60,
            merge_event_gap_sec: 0.25,
        }
    }
}

const DB_FLOOR_EPSILON: f32 = 1e-10;

#[derive(Debug, Clone, Copy)]
struct FrameFeatures {
    db: f64,
    zcr: f64,
}

#[derive(Debug, Clone, Copy)]
struct Region {
    start_frame: usize,
    /// Exclusive.
    end_frame: usize,
}

#[derive(Debug, Clone, Copy)]
struct RegionStats {
    start_sec: f64,
    end_sec: f64,
    mean_db: f64,
    mean_zcr: f64,
}

/// Intermediate terms of the filler confidence score.
///
/// Kept explicit so the scoring rule can be tested term by term instead of
/// through one opaque number.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FillerScore {
    pub duration_bonus: f32,
    pub zcr_bonus: f32,
    pub energy_bonus: f32,
    pub proximity_bonus: f32,
}

impl FillerScore {
    const BASE: f32 = 0.20;

    pub fn total(&self) -> f32 {
        (Self::BASE + self.duration_bonus + self.zcr_bonus + self.energy_bonus
            + self.proximity_bonus)
            .clamp(0.0, 1.0)
    }
}

/// Detect vocalized filler sounds in raw audio.
///
/// Best-effort: degenerate input (no samples, zero sample rate, zero frame
/// or hop size) yields an empty list rather than an error, so a missing or
/// unreadable recording never blocks the rest of the analysis.
pub fn detect_filled_pauses(audio: &AudioBuffer, config: &FilledPauseConfig) -> Vec<FillerEvent> {
    if audio.samples.is_empty()
        || audio.sample_rate == 0
        || config.frame_size == 0
        || config.hop_size == 0
    {
        return Vec::new();
    }

    let frames = compute_frames(&audio.samples, config.frame_size, config.hop_size);
    if frames.is_empty() {
        return Vec::new();
    }

    let hop_sec = config.hop_size as f64 / audio.sample_rate as f64;

    let db_values: Vec<f64> = frames.iter().map(|f| f.db).collect();
    let noise_floor = percentile(&db_values, config.noise_floor_percentile);
    let speech_threshold = noise_floor + config.speech_db_offset;
    debug!(
        "Noise floor {:.1} dB, speech threshold {:.1} dB over {} frames",
        noise_floor,
        speech_threshold,
        frames.len()
    );

    let regions = find_active_regions(&frames, speech_threshold);
    let regions = merge_regions(regions, config.region_merge_gap_sec, hop_sec);

    let mut events: Vec<FillerEvent> = Vec::new();
    for region in regions {
        let stats = region_stats(&frames, &region, hop_sec);

        let duration = stats.end_sec - stats.start_sec;
        if duration < config.min_duration_sec || duration > config.max_duration_sec {
            continue;
        }
        if stats.mean_zcr > config.max_zcr_for_voiced {
            continue;
        }
        if has_strong_neighbor(&frames, &region, speech_threshold, config, hop_sec) {
            continue;
        }

        let score = score_region(&stats, speech_threshold, config);
        let confidence = score.total();
        if confidence < config.min_confidence {
            continue;
        }

        events.push(FillerEvent {
            start_sec: stats.start_sec,
            end_sec: stats.end_sec,
            kind: FillerKind::FilledPauseAudio,
            confidence,
        });
    }

    let merged = merge_filler_events(events, config.merge_event_gap_sec);
    debug!("Detected {} filled-pause events", merged.len());
    merged
}

fn compute_frames(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<FrameFeatures> {
    let mut frames = Vec::new();
    let mut pos = 0;

    while pos + frame_size <= samples.len() {
        let window = &samples[pos..pos + frame_size];
        frames.push(FrameFeatures {
            db: rms_db(window),
            zcr: zero_crossing_rate(window),
        });
        pos += hop_size;
    }

    frames
}

fn rms_db(window: &[f32]) -> f64 {
    let sum_squares: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_squares / window.len() as f64).sqrt() as f32;
    20.0 * (rms.max(DB_FLOOR_EPSILON) as f64).log10()
}

/// Fraction of adjacent-sample sign changes in the window.
fn zero_crossing_rate(window: &[f32]) -> f64 {
    if window.len() < 2 {
        return 0.0;
    }
    let crossings = window
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f64 / (window.len() - 1) as f64
}

fn find_active_regions(frames: &[FrameFeatures], threshold_db: f64) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;

    for (i, frame) in frames.iter().enumerate() {
        let active = frame.db >= threshold_db;
        match (active, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                regions.push(Region {
                    start_frame: s,
                    end_frame: i,
                });
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        regions.push(Region {
            start_frame: s,
            end_frame: frames.len(),
        });
    }

    regions
}

fn merge_regions(regions: Vec<Region>, merge_gap_sec: f64, hop_sec: f64) -> Vec<Region> {
    let mut merged: Vec<Region> = Vec::new();

    for region in regions {
        if let Some(last) = merged.last_mut() {
            let gap_sec = (region.start_frame - last.end_frame) as f64 * hop_sec;
            if gap_sec <= merge_gap_sec {
                last.end_frame = region.end_frame;
                continue;
            }
        }
        merged.push(region);
    }

    merged
}

fn region_stats(frames: &[FrameFeatures], region: &Region, hop_sec: f64) -> RegionStats {
    let slice = &frames[region.start_frame..region.end_frame];
    let count = slice.len().max(1) as f64;
    RegionStats {
        start_sec: region.start_frame as f64 * hop_sec,
        end_sec: region.end_frame as f64 * hop_sec,
        mean_db: slice.iter().map(|f| f.db).sum::<f64>() / count,
        mean_zcr: slice.iter().map(|f| f.zcr).sum::<f64>() / count,
    }
}

/// Whether frames just outside the region carry strong-speech energy.
///
/// A candidate flanked by loud speech is a breath inside a sentence, not an
/// isolated filler sound.
fn has_strong_neighbor(
    frames: &[FrameFeatures],
    region: &Region,
    speech_threshold: f64,
    config: &FilledPauseConfig,
    hop_sec: f64,
) -> bool {
    let window_frames = (config.strong_neighbor_window_sec / hop_sec) as usize;
    if window_frames == 0 {
        return false;
    }
    let strong_db = speech_threshold + config.strong_offset_db;

    let before_start = region.start_frame.saturating_sub(window_frames);
    let before = &frames[before_start..region.start_frame];

    let after_end = (region.end_frame + window_frames).min(frames.len());
    let after = &frames[region.end_frame..after_end];

    let mean = |slice: &[FrameFeatures]| -> Option<f64> {
        if slice.is_empty() {
            None
        } else {
            Some(slice.iter().map(|f| f.db).sum::<f64>() / slice.len() as f64)
        }
    };

    matches!(mean(before), Some(db) if db >= strong_db)
        || matches!(mean(after), Some(db) if db >= strong_db)
}

/// Additive rule-based confidence for one candidate region.
fn score_region(
    stats: &RegionStats,
    speech_threshold: f64,
    config: &FilledPauseConfig,
) -> FillerScore {
    let duration = stats.end_sec - stats.start_sec;

    // Typical filler sounds sit in a 0.3-0.6s sweet spot.
    let duration_bonus = if (0.30..=0.60).contains(&duration) {
        0.25
    } else {
        0.15
    };

    let zcr_headroom = ((config.max_zcr_for_voiced - stats.mean_zcr)
        / config.max_zcr_for_voiced)
        .clamp(0.0, 1.0);
    let zcr_bonus = (zcr_headroom * 0.25) as f32;

    let energy_bonus = if stats.mean_db < speech_threshold + 6.0 {
        0.20
    } else {
        0.10
    };

    let proximity_bonus = if stats.mean_db - speech_threshold < 3.0 {
        0.20
    } else {
        0.10
    };

    FillerScore {
        duration_bonus,
        zcr_bonus,
        energy_bonus,
        proximity_bonus,
    }
}

fn merge_filler_events(events: Vec<FillerEvent>, merge_gap_sec: f64) -> Vec<FillerEvent> {
    let mut merged: Vec<FillerEvent> = Vec::new();

    for event in events {
        if let Some(last) = merged.last_mut() {
            if event.start_sec - last.end_sec <= merge_gap_sec {
                last.end_sec = last.end_sec.max(event.end_sec);
                last.confidence = last.confidence.max(event.confidence);
                continue;
            }
        }
        merged.push(event);
    }

    merged
}

/// Nearest-rank percentile of the values.
fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
