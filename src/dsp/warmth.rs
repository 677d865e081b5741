use super::eq::Equalizer;
use super::utils::ensure_finite;
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::StageResult;

const MIN_AMOUNT: f32 = 0.1;
const MAX_AMOUNT: f32 = 0.7;
const DRIVE_PER_UNIT: f32 = 0.3;
const LOW_BOOST_PER_UNIT: f32 = 2.0;

/// Low-band labels and their share of the warmth boost.
const WARMTH_BANDS: [(&str, f32); 3] = [("60Hz", 1.0), ("120Hz", 0.7), ("250Hz", 0.3)];

/// tanh soft saturation followed by a low-end lift.
#[derive(Clone, Debug)]
pub struct AnalogWarmth {
    pub amount: f32,
}

impl AnalogWarmth {
    pub fn new(amount: f32) -> Self {
        Self { amount }
    }

    /// Unity at full scale, gently lifts everything below it.
    pub fn saturate(x: f32, drive: f32) -> f32 {
        (x * (1.0 + drive)).tanh() / (1.0 + drive).tanh()
    }

    fn low_boost(amount: f32) -> Equalizer {
        let scale = amount * LOW_BOOST_PER_UNIT;
        Equalizer {
            bands: WARMTH_BANDS
                .iter()
                .map(|&(label, weight)| (label, weight * scale))
                .collect(),
        }
    }
}

impl Stage for AnalogWarmth {
    fn name(&self) -> &'static str {
        "analog_warmth"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        let amount = ensure_finite("warmth_amount", self.amount)?.clamp(MIN_AMOUNT, MAX_AMOUNT);
        let drive = amount * DRIVE_PER_UNIT;

        let saturated: Vec<f32> = input
            .to_float()
            .into_iter()
            .map(|x| Self::saturate(x, drive))
            .collect();

        Self::low_boost(amount).process(&input.with_float(&saturated))
    }
}
