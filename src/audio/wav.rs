use std::path::Path;

use hound::WavReader;
use tracing::info;

use crate::error::{Result, SpeechlensError};

use super::AudioBuffer;

/// Load a WAV file as mono f32 samples.
///
/// Int and Float sample formats are both accepted; multi-channel audio is
/// downmixed by averaging the channels of each frame.
pub fn load_wav_mono(path: &Path) -> Result<AudioBuffer> {
    let reader = WavReader::open(path)
        .map_err(|e| SpeechlensError::Audio(format!("Failed to open WAV file: {e}")))?;

    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    info!(
        "Loading audio: {} Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.unwrap_or(0) as f32 / scale)
                .collect()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.unwrap_or(0.0))
            .collect(),
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok(AudioBuffer {
        samples,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_audio_error() {
        let result = load_wav_mono(Path::new("/nonexistent/input.wav"));
        assert!(matches!(result, Err(SpeechlensError::Audio(_))));
    }
}
