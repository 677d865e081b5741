use super::utils::{db_to_gain, ensure_finite};
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::StageResult;

/// Widths inside this band (as a ratio) leave the image untouched.
const NEUTRAL_WIDTH: std::ops::RangeInclusive<f32> = 0.95..=1.05;
const MIN_WIDTH: f32 = 0.5;
const MAX_WIDTH: f32 = 1.5;
/// dB of level per unit of width above 1.0.
const WIDEN_DB_PER_UNIT: f32 = 3.0;
const CROSSFEED_TRIM_DB: f32 = -6.0;

const MIN_SPACE: f32 = 0.1;
const MAX_SPACE: f32 = 0.7;
const SPACE_DB_PER_UNIT: f32 = 0.5;

/// Stereo width control.
///
/// Widening raises both channels together as a stand-in for side gain;
/// narrowing bleeds a trimmed copy of each channel into the other.
#[derive(Clone, Debug)]
pub struct StereoImager {
    /// Percent, 100 = unchanged
    pub width_percent: f32,
}

impl StereoImager {
    pub fn new(width_percent: f32) -> Self {
        Self { width_percent }
    }
}

impl Stage for StereoImager {
    fn name(&self) -> &'static str {
        "stereo_width"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        let width = ensure_finite("stereo_width", self.width_percent)? / 100.0;
        if input.channels() != 2 || NEUTRAL_WIDTH.contains(&width) {
            return Ok(input.clone());
        }
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);

        if width > 1.0 {
            let db = (width - 1.0) * WIDEN_DB_PER_UNIT;
            let (left, right) = input.split_channels()?;
            let gain = db_to_gain(db);
            let left: Vec<f32> = left.iter().map(|s| s * gain).collect();
            let right: Vec<f32> = right.iter().map(|s| s * gain).collect();
            return input.from_channels(&left, &right);
        }

        let bleed = (1.0 - width) * 0.5 * db_to_gain(CROSSFEED_TRIM_DB);
        let (left, right) = input.split_channels()?;
        let new_left: Vec<f32> = left.iter().zip(&right).map(|(l, r)| l + r * bleed).collect();
        let new_right: Vec<f32> = right.iter().zip(&left).map(|(r, l)| r + l * bleed).collect();
        input.from_channels(&new_left, &new_right)
    }
}

/// Per-channel micro gain for a slightly wider impression.
///
/// Anything that is not a non-empty stereo buffer comes back unchanged.
#[derive(Clone, Debug)]
pub struct SpatialEnhancer {
    pub amount: f32,
}

impl SpatialEnhancer {
    pub fn new(amount: f32) -> Self {
        Self { amount }
    }
}

impl Stage for SpatialEnhancer {
    fn name(&self) -> &'static str {
        "spatial_enhancement"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        if input.is_empty() || input.channels() != 2 {
            return Ok(input.clone());
        }
        let amount = ensure_finite("space_amount", self.amount)?.clamp(MIN_SPACE, MAX_SPACE);
        let gain = db_to_gain(amount * SPACE_DB_PER_UNIT);

        let (left, right) = input.split_channels()?;
        let left: Vec<f32> = left.iter().map(|s| s * gain).collect();
        let right: Vec<f32> = right.iter().map(|s| s * gain).collect();
        input.from_channels(&left, &right)
    }
}
