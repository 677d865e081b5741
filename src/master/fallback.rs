//! Substitute buffers for failed decodes and failed masters.

use crate::audio::buffer::AudioBuffer;
use crate::encode::{ExportSettings, Tags};

pub const FALLBACK_SAMPLE_RATE: u32 = 44100;
pub const FALLBACK_CHANNELS: u16 = 2;

/// Stand-in for input that could not be decoded or decoded to nothing.
pub const SILENCE_MS: u32 = 1000;

pub const TONE_MS: u32 = 500;
pub const TONE_HZ: f32 = 440.0;
pub const TONE_PEAK_DBFS: f32 = -6.0;
pub const TONE_BITRATE: &str = "128k";
pub const TONE_TITLE: &str = "Error Recovery";

pub fn silence() -> AudioBuffer {
    AudioBuffer::silence(SILENCE_MS, FALLBACK_SAMPLE_RATE, FALLBACK_CHANNELS)
}

/// Short audible tone exported when mastering or export fails outright.
pub fn emergency_tone() -> AudioBuffer {
    AudioBuffer::tone(
        TONE_HZ,
        TONE_MS,
        FALLBACK_SAMPLE_RATE,
        FALLBACK_CHANNELS,
        TONE_PEAK_DBFS,
    )
}

pub fn emergency_settings() -> ExportSettings {
    ExportSettings {
        bitrate: TONE_BITRATE.into(),
        tags: Tags::new(TONE_TITLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_is_half_a_second_and_audible() {
        let tone = emergency_tone();
        assert!((tone.duration_secs() - 0.5).abs() < 1e-6);
        assert_eq!(tone.channels(), 2);
        assert!(tone.rms_dbfs() > -40.0);
    }

    #[test]
    fn silence_is_one_second() {
        let s = silence();
        assert_eq!(s.frame_count(), 44100);
        assert_eq!(s.rms_dbfs(), f32::NEG_INFINITY);
    }
}
