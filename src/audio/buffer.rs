use crate::dsp::utils::{db_to_gain, gain_to_db, to_f32, to_i16, FULL_SCALE};
use crate::error::{StageError, StageResult};

/// Interleaved signed 16-bit PCM with 1 or 2 channels.
///
/// Stages never mutate a buffer they were handed; they build a new one with
/// the same frame count and sample rate.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    channels: u16,
    sample_rate: u32,
    samples: Vec<i16>,
}

impl AudioBuffer {
    pub fn new(channels: u16, sample_rate: u32, samples: Vec<i16>) -> StageResult<Self> {
        if channels != 1 && channels != 2 {
            return Err(StageError::UnsupportedChannels(channels));
        }
        if sample_rate == 0 {
            return Err(StageError::InvalidSampleRate(sample_rate));
        }
        if samples.len() % channels as usize != 0 {
            let expected = samples.len() - samples.len() % channels as usize;
            return Err(StageError::ShapeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            channels,
            sample_rate,
            samples,
        })
    }

    pub fn silence(duration_ms: u32, sample_rate: u32, channels: u16) -> Self {
        let frames = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
        Self {
            channels: channels.clamp(1, 2),
            sample_rate,
            samples: vec![0; frames * channels.clamp(1, 2) as usize],
        }
    }

    /// Sine tone with its peak at `peak_dbfs`, identical on every channel.
    pub fn tone(freq_hz: f32, duration_ms: u32, sample_rate: u32, channels: u16, peak_dbfs: f32) -> Self {
        let channels = channels.clamp(1, 2);
        let frames = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
        let amplitude = db_to_gain(peak_dbfs);
        let mut samples = Vec::with_capacity(frames * channels as usize);
        for i in 0..frames {
            let phase = 2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32;
            let value = to_i16(amplitude * phase.sin());
            for _ in 0..channels {
                samples.push(value);
            }
        }
        Self {
            channels,
            sample_rate,
            samples,
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.frame_count() as f32 / self.sample_rate as f32
    }

    /// Same format, new sample data. Callers guarantee the length.
    pub(crate) fn with_samples(&self, samples: Vec<i16>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            channels: self.channels,
            sample_rate: self.sample_rate,
            samples,
        }
    }

    pub(crate) fn with_float(&self, samples: &[f32]) -> Self {
        self.with_samples(samples.iter().map(|&s| to_i16(s)).collect())
    }

    /// Samples scaled to [-1, 1).
    pub fn to_float(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| to_f32(s)).collect()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .map(|&s| (s as i32).unsigned_abs())
            .max()
            .unwrap_or(0) as f32
    }

    /// Peak level in dBFS; negative infinity for silence.
    pub fn peak_dbfs(&self) -> f32 {
        gain_to_db(self.peak() / FULL_SCALE)
    }

    /// RMS level in dBFS; negative infinity for silence.
    pub fn rms_dbfs(&self) -> f32 {
        if self.samples.is_empty() {
            return f32::NEG_INFINITY;
        }
        let sum: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        let rms = (sum / self.samples.len() as f64).sqrt() as f32;
        gain_to_db(rms / FULL_SCALE)
    }

    pub fn apply_gain_db(&self, db: f32) -> Self {
        let gain = db_to_gain(db);
        self.with_samples(
            self.samples
                .iter()
                .map(|&s| to_i16(to_f32(s) * gain))
                .collect(),
        )
    }

    /// Scale so the peak sits at `target_dbfs`. Silence is returned as is.
    pub fn normalize(&self, target_dbfs: f32) -> Self {
        let peak = self.peak();
        if peak == 0.0 {
            return self.clone();
        }
        let target = FULL_SCALE * db_to_gain(target_dbfs);
        self.apply_gain_db(gain_to_db(target / peak))
    }

    /// Duplicate a mono buffer into two identical channels.
    pub fn to_stereo(&self) -> Self {
        if self.channels == 2 {
            return self.clone();
        }
        Self {
            channels: 2,
            sample_rate: self.sample_rate,
            samples: self.samples.iter().flat_map(|&s| [s, s]).collect(),
        }
    }

    /// Average the two channels of a stereo buffer.
    pub fn to_mono(&self) -> Self {
        if self.channels == 1 {
            return self.clone();
        }
        Self {
            channels: 1,
            sample_rate: self.sample_rate,
            samples: self
                .samples
                .chunks_exact(2)
                .map(|f| ((f[0] as i32 + f[1] as i32) / 2) as i16)
                .collect(),
        }
    }

    /// Left and right as separate float vectors. Stereo only.
    pub fn split_channels(&self) -> StageResult<(Vec<f32>, Vec<f32>)> {
        if self.channels != 2 {
            return Err(StageError::UnsupportedChannels(self.channels));
        }
        Ok(self
            .samples
            .chunks_exact(2)
            .map(|f| (to_f32(f[0]), to_f32(f[1])))
            .unzip())
    }

    pub(crate) fn from_channels(&self, left: &[f32], right: &[f32]) -> StageResult<Self> {
        let frames = self.frame_count();
        if self.channels != 2 {
            return Err(StageError::UnsupportedChannels(self.channels));
        }
        if left.len() != frames || right.len() != frames {
            return Err(StageError::ShapeMismatch {
                expected: frames,
                actual: left.len().min(right.len()),
            });
        }
        let samples = left
            .iter()
            .zip(right)
            .flat_map(|(&l, &r)| [to_i16(l), to_i16(r)])
            .collect();
        Ok(self.with_samples(samples))
    }
}
