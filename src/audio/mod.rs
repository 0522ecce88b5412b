pub mod filled_pause;
pub mod wav;

pub use filled_pause::{
    detect_filled_pauses, FilledPauseConfig, FillerEvent, FillerKind,
};
pub use wav::load_wav_mono;

/// Decoded mono audio handed to the analysis core.
///
/// The core never opens files; an external decode step (the CLI's WAV loader
/// here) supplies samples at a known rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer {
            samples: vec![0.0; 16000],
            sample_rate: 16000,
        };
        assert!((buffer.duration_sec() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_duration() {
        let buffer = AudioBuffer {
            samples: vec![0.0; 100],
            sample_rate: 0,
        };
        assert_eq!(buffer.duration_sec(), 0.0);
    }
}
