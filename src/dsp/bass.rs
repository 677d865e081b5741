//! Low-end processing
//!
//! Splits the signal at the preset's split frequency, compresses the bass
//! band with a soft knee that backs off on kick transients, then mixes the
//! bass band back over a high-passed copy of the original.
//!
//! Mono input is processed as dual mono and folded back before returning.

use super::eq::Equalizer;
use super::filter;
use super::transient::{self, TransientEnvelope};
use super::utils::{db_to_gain, ensure_finite, parse_band_frequency};
use super::Stage;
use crate::audio::buffer::AudioBuffer;
use crate::error::{StageError, StageResult};
use crate::presets::BassParams;

/// Envelope window for kick detection, in samples.
pub const KICK_WINDOW: usize = 10;
/// Share of compression removed at full transient activity.
pub const KICK_RELIEF: f32 = 0.9;
/// Weight of the reduced gain against pass-through.
pub const KNEE_BLEND: f32 = 0.8;
/// Fraction of the preset makeup actually applied.
pub const MAKEUP_SCALE: f32 = 0.9;
pub const BASS_CLIP: f32 = 0.95;

pub const BASS_TRIM_DB: f32 = -2.0;
pub const HIGH_TRIM_DB: f32 = -0.7;
/// 0.45 base plus 0.12 headroom.
pub const BASS_MIX_WEIGHT: f32 = 0.45 + 0.12;
pub const OUTPUT_PEAK_DBFS: f32 = -1.4;

/// Sub-bass labels and their share of the boost.
const SUB_BOOST_BANDS: &[(&str, f32)] = &[("30Hz", 1.0), ("40Hz", 0.8), ("60Hz", 0.5)];
const SUB_BOOST_MAX_DB: f32 = 3.0;

/// Soft-knee gain for one sample.
///
/// `activity` is the transient envelope at that sample; full activity pulls
/// the ratio down by [`KICK_RELIEF`], never below `ratio / 8` or unity.
pub fn soft_knee_gain(level: f32, threshold: f32, ratio: f32, activity: f32) -> f32 {
    if level <= threshold || level <= 0.0 {
        return 1.0;
    }
    let floor = (ratio / 8.0).max(1.0);
    let effective = (ratio * (1.0 - KICK_RELIEF * activity.clamp(0.0, 1.0))).max(floor);
    let reduction = (threshold + (level - threshold) / effective) / level;
    KNEE_BLEND * reduction + (1.0 - KNEE_BLEND)
}

#[derive(Clone, Debug)]
pub struct BassProcessor {
    pub params: BassParams,
}

impl BassProcessor {
    pub fn new(params: BassParams) -> Self {
        Self { params }
    }

    fn validate(&self, input: &AudioBuffer) -> StageResult<()> {
        let p = &self.params;
        ensure_finite("bass_threshold_db", p.threshold_db)?;
        ensure_finite("bass_makeup_db", p.makeup_db)?;
        if !(p.ratio.is_finite() && p.ratio >= 1.0) {
            return Err(StageError::InvalidParameter {
                name: "bass_ratio",
                value: p.ratio,
            });
        }
        let nyquist = input.sample_rate() as f32 / 2.0;
        if !(p.split_hz > 0.0 && p.split_hz < nyquist) {
            return Err(StageError::InvalidParameter {
                name: "bass_split_freq",
                value: p.split_hz,
            });
        }
        Ok(())
    }

    /// Graduated boost at the sub-bass labels below the split.
    fn sub_boost(&self) -> Equalizer {
        let amount = self.params.sub_enhance.clamp(0.0, 1.0);
        if amount <= 0.0 {
            return Equalizer::default();
        }
        let bands = SUB_BOOST_BANDS
            .iter()
            .filter(|(label, _)| {
                parse_band_frequency(label).is_some_and(|f| (f as f32) < self.params.split_hz)
            })
            .map(|&(label, weight)| (label, weight * amount * SUB_BOOST_MAX_DB))
            .collect();
        Equalizer { bands }
    }

    /// Bass-only copy of a stereo buffer, sub boost included.
    pub fn isolate_bass(&self, stereo: &AudioBuffer) -> StageResult<AudioBuffer> {
        let low = filter::isolate_low(stereo, self.params.split_hz);
        self.sub_boost().process(&stereo.with_float(&low))
    }

    fn compress(&self, data: &mut [f32], channels: usize, envelope: Option<&TransientEnvelope>) {
        let threshold = db_to_gain(self.params.threshold_db);
        for (frame_idx, frame) in data.chunks_exact_mut(channels).enumerate() {
            for (ch, sample) in frame.iter_mut().enumerate() {
                let activity = envelope.map_or(0.0, |env| env.at(frame_idx, ch));
                *sample *= soft_knee_gain(sample.abs(), threshold, self.params.ratio, activity);
            }
        }
    }
}

impl Stage for BassProcessor {
    fn name(&self) -> &'static str {
        "bass_processing"
    }

    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
        self.validate(input)?;
        if input.is_empty() {
            return Ok(input.clone());
        }

        log::debug!(
            "Bass split at {} Hz: {:?}",
            self.params.split_hz,
            filter::isolation_table(self.params.split_hz)
        );

        let work = input.to_stereo();
        let channels = work.channels() as usize;

        let bass_only = self.isolate_bass(&work)?;
        let envelope = self
            .params
            .kick_preservation
            .then(|| transient::detect(&bass_only, KICK_WINDOW, true));

        let mut bass = bass_only.to_float();
        self.compress(&mut bass, channels, envelope.as_ref());

        let makeup = db_to_gain(MAKEUP_SCALE * self.params.makeup_db);
        for sample in bass.iter_mut() {
            *sample = (*sample * makeup).clamp(-BASS_CLIP, BASS_CLIP);
        }

        let high = filter::isolate_high(&work, self.params.split_hz);
        if high.len() != bass.len() {
            return Err(StageError::ShapeMismatch {
                expected: bass.len(),
                actual: high.len(),
            });
        }

        let bass_gain = db_to_gain(BASS_TRIM_DB) * BASS_MIX_WEIGHT;
        let high_gain = db_to_gain(HIGH_TRIM_DB);
        let mixed: Vec<f32> = bass
            .iter()
            .zip(&high)
            .map(|(&b, &h)| h * high_gain + b * bass_gain)
            .collect();

        let mut out = work.with_float(&mixed);
        if input.channels() == 1 {
            out = out.to_mono();
        }
        Ok(out.normalize(OUTPUT_PEAK_DBFS))
    }
}
