//! Output ceiling
//!
//! A multi-pass peak normaliser rather than a look-ahead limiter:
//! 1. pre-attenuate hot material,
//! 2. normalise just under the ceiling,
//! 3. nudge quiet results up by at most 1 dB,
//! 4. normalise exactly to the ceiling,
//! 5. trim again if the result still sits at full scale.
//!
//! The later passes catch what rounding in the earlier ones lets through.

use super::utils::ensure_finite;
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::StageResult;

const HOT_PEAK_DBFS: f32 = -3.0;
const MIN_PRE_ATTENUATION_DB: f32 = 6.0;
const CEILING_HEADROOM_DB: f32 = 0.3;
const QUIET_LEVEL_DBFS: f32 = -3.0;
const MAX_CORRECTIVE_BOOST_DB: f32 = 1.0;
const FULL_SCALE_GUARD_DBFS: f32 = -0.1;
const SAFETY_TRIM_DB: f32 = -0.5;

#[derive(Clone, Debug)]
pub struct Limiter {
    pub ceiling_db: f32,
}

impl Limiter {
    pub fn new(ceiling_db: f32) -> Self {
        Self { ceiling_db }
    }
}

impl Stage for Limiter {
    fn name(&self) -> &'static str {
        "limiter"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        let ceiling = ensure_finite("ceiling_db", self.ceiling_db)?;

        let peak = input.peak_dbfs();
        let mut out = if peak > HOT_PEAK_DBFS {
            input.apply_gain_db(-MIN_PRE_ATTENUATION_DB.max(peak - 3.0))
        } else {
            input.clone()
        };

        out = out.normalize(ceiling - CEILING_HEADROOM_DB);

        let level = out.rms_dbfs();
        if level < QUIET_LEVEL_DBFS {
            let boost = (QUIET_LEVEL_DBFS - level).min(MAX_CORRECTIVE_BOOST_DB);
            out = out.apply_gain_db(boost);
        }

        out = out.normalize(ceiling);

        if out.peak_dbfs() > FULL_SCALE_GUARD_DBFS {
            out = out.apply_gain_db(SAFETY_TRIM_DB);
        }

        log::debug!(
            "Limiter: ceiling {} dB, peak {:.2} -> {:.2} dBFS",
            ceiling,
            peak,
            out.peak_dbfs()
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(amplitude: i16, channels: u16) -> AudioBuffer {
        let samples = (0..4410)
            .flat_map(|i| {
                let v = if (i / 50) % 2 == 0 { amplitude } else { -amplitude };
                std::iter::repeat(v).take(channels as usize)
            })
            .collect();
        AudioBuffer::new(channels, 44100, samples).unwrap()
    }

    #[test]
    fn peak_never_exceeds_ceiling() {
        let inputs = [
            square(32767, 2),
            square(500, 1),
            AudioBuffer::tone(440.0, 200, 44100, 2, -0.01),
            AudioBuffer::tone(60.0, 200, 48000, 1, -40.0),
        ];
        for ceiling in [-3.0, -1.5, -0.5, -0.3, 0.0, 1.0] {
            for input in &inputs {
                let out = Limiter::new(ceiling).process(input).unwrap();
                assert!(
                    out.peak_dbfs() <= ceiling + 0.05,
                    "ceiling {ceiling}: peak {}",
                    out.peak_dbfs()
                );
            }
        }
    }

    #[test]
    fn lands_on_ceiling() {
        let input = AudioBuffer::tone(440.0, 200, 44100, 2, -12.0);
        let out = Limiter::new(-1.5).process(&input).unwrap();
        assert!((out.peak_dbfs() + 1.5).abs() < 0.01);
    }

    #[test]
    fn full_scale_ceiling_gets_trimmed() {
        let input = AudioBuffer::tone(440.0, 200, 44100, 2, -12.0);
        let out = Limiter::new(0.0).process(&input).unwrap();
        assert!((out.peak_dbfs() + 0.5).abs() < 0.01);
    }

    /// Two peaks followed by silence, so the corrective boost kicks in.
    fn two_peaks() -> AudioBuffer {
        let mut samples = vec![32000, 30200];
        samples.extend(std::iter::repeat(0).take(1000));
        AudioBuffer::new(1, 44100, samples).unwrap()
    }

    fn peak_ratio(out: &AudioBuffer) -> f32 {
        out.samples()[0] as f32 / out.samples()[1] as f32
    }

    #[test]
    fn boost_saturates_under_hot_ceilings() {
        // each pass lands on i16, so the 1 dB boost clips before the final
        // normalise when the ceiling sits above -0.7 dB
        let out = Limiter::new(-0.3).process(&two_peaks()).unwrap();
        assert!(out.peak_dbfs() <= -0.3 + 0.05);
        assert!(peak_ratio(&out) < 1.02, "ratio {}", peak_ratio(&out));

        let out = Limiter::new(-1.5).process(&two_peaks()).unwrap();
        assert!((peak_ratio(&out) - 32000.0 / 30200.0).abs() < 0.01);
    }

    #[test]
    fn silence_is_untouched() {
        let input = AudioBuffer::silence(100, 44100, 2);
        assert_eq!(Limiter::new(-1.0).process(&input).unwrap(), input);
    }
}
