//! Band-gain equaliser
//!
//! Per-band gains are collapsed into their arithmetic mean and applied as one
//! uniform gain over the whole buffer. Label parsing still happens so that
//! malformed bands are reported, and so other stages can reason about band
//! frequencies.

use super::utils::{ensure_finite, parse_band_frequency};
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::StageResult;

/// Below this total absolute gain the equaliser does nothing.
pub const MIN_TOTAL_GAIN_DB: f32 = 0.1;

#[derive(Clone, Debug, Default)]
pub struct Equalizer {
    pub bands: Vec<(&'static str, f32)>,
}

impl Equalizer {
    pub fn new(bands: &[(&'static str, f32)]) -> Self {
        Self {
            bands: bands.to_vec(),
        }
    }

    /// The single gain the band set collapses to, or `None` for a no-op.
    pub fn effective_gain_db(&self) -> Option<f32> {
        let total: f32 = self.bands.iter().map(|(_, g)| g.abs()).sum();
        if self.bands.is_empty() || total < MIN_TOTAL_GAIN_DB {
            return None;
        }
        Some(self.bands.iter().map(|(_, g)| g).sum::<f32>() / self.bands.len() as f32)
    }

    /// Bands with a parseable frequency, in declaration order.
    pub fn band_frequencies(&self) -> Vec<(u32, f32)> {
        self.bands
            .iter()
            .filter_map(|&(label, gain)| parse_band_frequency(label).map(|f| (f, gain)))
            .collect()
    }
}

impl Stage for Equalizer {
    fn name(&self) -> &'static str {
        "eq"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        for &(label, gain) in &self.bands {
            ensure_finite("eq_band_gain", gain)?;
            if parse_band_frequency(label).is_none() {
                log::debug!("EQ band '{}' has no frequency digits", label);
            }
        }
        match self.effective_gain_db() {
            Some(db) => {
                log::debug!("EQ: {} bands -> {:+.2} dB uniform", self.bands.len(), db);
                Ok(input.apply_gain_db(db))
            }
            None => Ok(input.clone()),
        }
    }
}
