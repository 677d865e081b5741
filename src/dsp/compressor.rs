//! Dynamics stage
//!
//! Two strategies, chosen per preset:
//! - `MakeupGain`: one flat gain of `|threshold| / (ratio * 2)` dB. Cheap and
//!   deterministic, and does not pull short buffers down to nothing.
//! - `PerSample`: frame-linked gain reduction. Each frame whose loudest
//!   channel exceeds the threshold is scaled by
//!   `(threshold + (level - threshold) / ratio) / level`.
//!
//! Attack and release are carried on the preset but neither strategy smooths
//! over time; the per-sample form reacts instantly.

use super::utils::{db_to_gain, ensure_finite};
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::{StageError, StageResult};
use crate::presets::{Compression, CompressionMode};

#[derive(Clone, Debug)]
pub struct Compressor {
    pub settings: Compression,
}

impl Compressor {
    pub fn new(settings: Compression) -> Self {
        Self { settings }
    }

    pub fn makeup_gain_db(&self) -> f32 {
        self.settings.threshold_db.abs() / (self.settings.ratio * 2.0)
    }

    fn per_sample(&self, input: &AudioBuffer) -> AudioBuffer {
        let threshold = db_to_gain(self.settings.threshold_db);
        let ratio = self.settings.ratio;
        let channels = input.channels() as usize;
        let mut data = input.to_float();

        for frame in data.chunks_exact_mut(channels) {
            let level = frame.iter().fold(0.0f32, |m, s| m.max(s.abs()));
            if level > threshold {
                let reduction = (threshold + (level - threshold) / ratio) / level;
                for sample in frame.iter_mut() {
                    *sample *= reduction;
                }
            }
        }
        input.with_float(&data)
    }
}

impl Stage for Compressor {
    fn name(&self) -> &'static str {
        "compression"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        ensure_finite("threshold_db", self.settings.threshold_db)?;
        let ratio = self.settings.ratio;
        if !(ratio.is_finite() && ratio >= 1.0) {
            return Err(StageError::InvalidParameter {
                name: "ratio",
                value: ratio,
            });
        }

        match self.settings.mode {
            CompressionMode::MakeupGain => {
                let db = self.makeup_gain_db();
                log::debug!("Compression (makeup): {:+.2} dB", db);
                Ok(input.apply_gain_db(db))
            }
            CompressionMode::PerSample => {
                log::debug!(
                    "Compression (per-sample): threshold {} dB, ratio {}:1",
                    self.settings.threshold_db,
                    ratio
                );
                Ok(self.per_sample(input))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: CompressionMode, threshold_db: f32, ratio: f32) -> Compression {
        Compression {
            threshold_db,
            ratio,
            attack_ms: 5.0,
            release_ms: 50.0,
            mode,
        }
    }

    #[test]
    fn makeup_strategy_applies_flat_gain() {
        let comp = Compressor::new(settings(CompressionMode::MakeupGain, -28.0, 1.2));
        assert!((comp.makeup_gain_db() - 11.6667).abs() < 1e-3);
        let input = AudioBuffer::tone(440.0, 100, 44100, 2, -20.0);
        let out = comp.process(&input).unwrap();
        assert!((out.peak_dbfs() - (-20.0 + 11.6667)).abs() < 0.02);
    }

    #[test]
    fn per_sample_strategy_reduces_peaks_only() {
        let comp = Compressor::new(settings(CompressionMode::PerSample, -20.0, 4.0));
        let input = AudioBuffer::tone(441.0, 100, 44100, 1, -6.0);
        let out = comp.process(&input).unwrap();
        assert!((out.peak_dbfs() + 13.97).abs() < 0.05);
        let threshold = db_to_gain(-20.0) * 32768.0;
        for (&a, &b) in input.samples().iter().zip(out.samples()) {
            if (a as f32).abs() <= threshold {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn per_sample_links_channels() {
        let samples = vec![20000, 100, -20000, -100];
        let input = AudioBuffer::new(2, 44100, samples).unwrap();
        let comp = Compressor::new(settings(CompressionMode::PerSample, -20.0, 4.0));
        let out = comp.process(&input).unwrap();
        // quiet channel follows the loud one's reduction
        assert!(out.samples()[1] < 100);
        assert!(out.samples()[3] > -100);
    }

    #[test]
    fn ratio_below_one_fails() {
        let comp = Compressor::new(settings(CompressionMode::MakeupGain, -20.0, 0.5));
        let input = AudioBuffer::silence(10, 44100, 2);
        assert!(matches!(
            comp.process(&input),
            Err(StageError::InvalidParameter { name: "ratio", .. })
        ));
    }
}
