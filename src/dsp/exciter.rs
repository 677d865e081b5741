//! Harmonic exciter
//!
//! Adds scaled sample-to-sample differences at a few short lags on top of a
//! copy of the signal, then blends that copy back under the original. Short
//! lags favour treble detail; the bass-focused set uses longer lags and backs
//! off wherever the transient envelope is high so kicks stay clean.

use super::transient::{self, TransientEnvelope};
use super::utils::ensure_finite;
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::StageResult;

pub const MAX_AMOUNT: f32 = 0.5;

/// (lag in samples, weight)
const BASS_WINDOWS: [(usize, f32); 3] = [(5, 0.3), (8, 0.8), (12, 0.4)];
const TREBLE_WINDOWS: [(usize, f32); 3] = [(2, 0.8), (4, 0.7), (6, 0.3)];

const TRANSIENT_WINDOW: usize = 5;
const TRANSIENT_DAMPING: f32 = 0.8;

/// (dry, harmonics)
const BASS_BLEND: (f32, f32) = (0.8, 0.2);
const TREBLE_BLEND: (f32, f32) = (0.7, 0.3);

#[derive(Clone, Debug)]
pub struct HarmonicExciter {
    pub amount: f32,
    /// Set for presets that also run bass processing
    pub focus_bass: bool,
}

impl HarmonicExciter {
    pub fn new(amount: f32, focus_bass: bool) -> Self {
        Self { amount, focus_bass }
    }

    fn windows(&self) -> &'static [(usize, f32); 3] {
        if self.focus_bass {
            &BASS_WINDOWS
        } else {
            &TREBLE_WINDOWS
        }
    }

    fn blend(&self) -> (f32, f32) {
        if self.focus_bass {
            BASS_BLEND
        } else {
            TREBLE_BLEND
        }
    }

    /// Signal plus its weighted lag differences, before blending.
    fn harmonics(
        &self,
        dry: &[f32],
        channels: usize,
        amount: f32,
        envelope: Option<&TransientEnvelope>,
    ) -> Vec<f32> {
        let frames = dry.len() / channels;
        let mut wet = dry.to_vec();
        for &(lag, weight) in self.windows() {
            let scale = weight * amount;
            for i in lag..frames {
                for ch in 0..channels {
                    let delta = dry[i * channels + ch] - dry[(i - lag) * channels + ch];
                    let damping = envelope.map_or(1.0, |env| 1.0 - TRANSIENT_DAMPING * env.at(i, ch));
                    wet[i * channels + ch] += delta * scale * damping;
                }
            }
        }
        wet
    }
}

impl Stage for HarmonicExciter {
    fn name(&self) -> &'static str {
        "harmonic_exciter"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        let amount = ensure_finite("exciter_amount", self.amount)?.clamp(0.0, MAX_AMOUNT);
        let channels = input.channels() as usize;
        let dry = input.to_float();

        let envelope = self
            .focus_bass
            .then(|| transient::detect(input, TRANSIENT_WINDOW, true));
        let wet = self.harmonics(&dry, channels, amount, envelope.as_ref());

        let (dry_mix, wet_mix) = self.blend();
        let out: Vec<f32> = dry
            .iter()
            .zip(&wet)
            .map(|(&d, &w)| d * dry_mix + w * wet_mix)
            .collect();
        Ok(input.with_float(&out))
    }
}
