//! Transient activity detection
//!
//! For each sample the detector takes the mean absolute difference between
//! that sample and the `window` samples before it, per channel. The result is
//! scaled by the channel's own maximum, so a value of 1.0 marks the sharpest
//! onset in that channel.

use crate::audio::buffer::AudioBuffer;
use crate::dsp::utils::to_f32;

/// Fraction of the channel maximum below which activity is discarded.
pub const NOISE_FLOOR: f32 = 0.15;

/// Per-sample activity in [0, 1], interleaved like the buffer it came from.
#[derive(Clone, Debug)]
pub struct TransientEnvelope {
    channels: usize,
    values: Vec<f32>,
}

impl TransientEnvelope {
    /// Envelope value for `frame` on `channel`; zero when out of range.
    #[inline]
    pub fn at(&self, frame: usize, channel: usize) -> f32 {
        self.values
            .get(frame * self.channels + channel)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

pub fn detect(buffer: &AudioBuffer, window: usize, noise_floor: bool) -> TransientEnvelope {
    let channels = buffer.channels() as usize;
    let frames = buffer.frame_count();
    let samples = buffer.samples();
    let mut values = vec![0.0f32; samples.len()];

    if window == 0 {
        return TransientEnvelope { channels, values };
    }

    for ch in 0..channels {
        let mut max = 0.0f32;
        for i in window..frames {
            let current = to_f32(samples[i * channels + ch]);
            let mut sum = 0.0f32;
            for k in 1..=window {
                sum += (current - to_f32(samples[(i - k) * channels + ch])).abs();
            }
            let activity = sum / window as f32;
            values[i * channels + ch] = activity;
            max = max.max(activity);
        }

        if max > 0.0 {
            let floor = if noise_floor { NOISE_FLOOR } else { 0.0 };
            for i in 0..frames {
                let v = values[i * channels + ch] / max;
                values[i * channels + ch] = if v < floor { 0.0 } else { v };
            }
        }
    }

    TransientEnvelope { channels, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_train(channels: u16) -> AudioBuffer {
        let mut mono = vec![200i16; 2000];
        mono[1000] = 20000;
        let samples = mono
            .iter()
            .flat_map(|&s| std::iter::repeat(s).take(channels as usize))
            .collect();
        AudioBuffer::new(channels, 44100, samples).unwrap()
    }

    #[test]
    fn onset_peaks_at_one() {
        let env = detect(&impulse_train(1), 5, true);
        assert_eq!(env.len(), 2000);
        assert!((env.at(1000, 0) - 1.0).abs() < 1e-6);
        assert!(env.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn leading_window_is_zero() {
        let env = detect(&impulse_train(2), 5, false);
        for i in 0..5 {
            assert_eq!(env.at(i, 0), 0.0);
            assert_eq!(env.at(i, 1), 0.0);
        }
    }

    #[test]
    fn silence_stays_zero() {
        let env = detect(&AudioBuffer::silence(50, 44100, 2), 5, true);
        assert!(env.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn noise_floor_zeroes_weak_activity() {
        let mut mono: Vec<i16> = (0..2000).map(|i| if i % 2 == 0 { 300 } else { -300 }).collect();
        mono[1000] = 30000;
        let buf = AudioBuffer::new(1, 44100, mono).unwrap();
        let with_floor = detect(&buf, 5, true);
        let without = detect(&buf, 5, false);
        assert!(without.at(500, 0) > 0.0);
        assert_eq!(with_floor.at(500, 0), 0.0);
        assert!(with_floor.at(1000, 0) > 0.9);
    }

    #[test]
    fn channels_are_independent() {
        let mut samples = vec![0i16; 4000];
        samples[2 * 1000] = 20000;
        let buf = AudioBuffer::new(2, 44100, samples).unwrap();
        let env = detect(&buf, 5, true);
        assert!(env.at(1000, 0) > 0.9);
        assert!(env.values().iter().skip(1).step_by(2).all(|&v| v == 0.0));
    }
}
