use super::utils::ensure_finite;
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::StageResult;

/// Smallest gain the chain's gain stage will apply, in dB.
pub const MIN_CHAIN_GAIN_DB: f32 = 1.0;

/// Peak normalisation to a fixed dBFS target.
#[derive(Clone, Debug)]
pub struct Normalize {
    pub target_dbfs: f32,
}

impl Stage for Normalize {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        let target = ensure_finite("target_dbfs", self.target_dbfs)?;
        Ok(input.normalize(target))
    }
}

/// Uniform gain in dB.
#[derive(Clone, Debug)]
pub struct Gain {
    pub db: f32,
}

impl Gain {
    /// Preset gain raised to at least [`MIN_CHAIN_GAIN_DB`].
    pub fn at_least_min(db: f32) -> Self {
        Self {
            db: db.max(MIN_CHAIN_GAIN_DB),
        }
    }
}

impl Stage for Gain {
    fn name(&self) -> &'static str {
        "gain"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        let db = ensure_finite("gain_db", self.db)?;
        Ok(input.apply_gain_db(db))
    }
}
