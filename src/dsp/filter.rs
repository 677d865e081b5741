//! One-pole RC sections and the band-isolation curve built from them.
//!
//! These are the crude time-domain filters used for band splitting. They
//! are deliberately not a crossover: the low and high branches do not sum
//! back to the input.

use crate::audio::buffer::AudioBuffer;
use crate::dsp::utils::parse_band_frequency;

/// Attenuation one octave above the split frequency.
pub const OCTAVE_ATTENUATION_DB: f32 = -30.0;
/// Deepest attenuation of the isolation curve.
pub const FLOOR_ATTENUATION_DB: f32 = -60.0;
/// Frequency by which the isolation curve reaches its floor.
pub const MID_RANGE_HZ: f32 = 1000.0;

pub const LOWPASS_SECTIONS: usize = 8;
pub const HIGHPASS_SECTIONS: usize = 2;

/// Labels at which the isolation curve is tabulated for logging.
pub const ISOLATION_BANDS: &[&str] = &[
    "30Hz", "40Hz", "60Hz", "80Hz", "120Hz", "160Hz", "240Hz", "320Hz", "500Hz", "1000Hz",
    "2000Hz", "5000Hz",
];

/// Target attenuation of the bass isolation at `freq_hz`.
///
/// Flat up to the split, falls linearly in octaves to -30 dB at twice the
/// split, then on to -60 dB at mid-range.
pub fn isolation_db(freq_hz: f32, split_hz: f32) -> f32 {
    if freq_hz <= split_hz {
        return 0.0;
    }
    let octave = 2.0 * split_hz;
    if freq_hz <= octave {
        return OCTAVE_ATTENUATION_DB * (freq_hz / split_hz).log2();
    }
    if MID_RANGE_HZ <= octave {
        return FLOOR_ATTENUATION_DB;
    }
    let span = (MID_RANGE_HZ / octave).log2();
    let progress = ((freq_hz / octave).log2() / span).min(1.0);
    OCTAVE_ATTENUATION_DB + (FLOOR_ATTENUATION_DB - OCTAVE_ATTENUATION_DB) * progress
}

/// The isolation curve evaluated at every label in [`ISOLATION_BANDS`].
pub fn isolation_table(split_hz: f32) -> Vec<(&'static str, f32)> {
    ISOLATION_BANDS
        .iter()
        .filter_map(|&label| {
            parse_band_frequency(label).map(|f| (label, isolation_db(f as f32, split_hz)))
        })
        .collect()
}

/// Cutoff of each low-pass section such that the cascade lands on
/// [`OCTAVE_ATTENUATION_DB`] one octave above the split.
pub fn cascade_cutoff(split_hz: f32, sections: usize) -> f32 {
    let per_section = 10.0f32.powf(-OCTAVE_ATTENUATION_DB / (10.0 * sections as f32));
    let ratio = (per_section - 1.0).sqrt();
    2.0 * split_hz / ratio
}

fn rc_terms(cutoff_hz: f32, sample_rate: u32) -> (f32, f32) {
    let rc = 1.0 / (cutoff_hz * 2.0 * std::f32::consts::PI);
    let dt = 1.0 / sample_rate as f32;
    (rc, dt)
}

/// Single-pole low-pass over one channel of an interleaved float slice.
fn low_pass_channel(data: &mut [f32], channels: usize, ch: usize, alpha: f32) {
    let mut prev: Option<f32> = None;
    for frame in data.chunks_exact_mut(channels) {
        let x = frame[ch];
        let y = match prev {
            Some(p) => p + alpha * (x - p),
            None => x,
        };
        frame[ch] = y;
        prev = Some(y);
    }
}

fn high_pass_channel(data: &mut [f32], channels: usize, ch: usize, alpha: f32) {
    let mut prev: Option<(f32, f32)> = None;
    for frame in data.chunks_exact_mut(channels) {
        let x = frame[ch];
        let y = match prev {
            Some((px, py)) => alpha * (py + x - px),
            None => x,
        };
        frame[ch] = y;
        prev = Some((x, y));
    }
}

pub fn low_pass(data: &mut [f32], channels: usize, sample_rate: u32, cutoff_hz: f32, sections: usize) {
    let (rc, dt) = rc_terms(cutoff_hz, sample_rate);
    let alpha = dt / (rc + dt);
    for _ in 0..sections {
        for ch in 0..channels {
            low_pass_channel(data, channels, ch, alpha);
        }
    }
}

pub fn high_pass(data: &mut [f32], channels: usize, sample_rate: u32, cutoff_hz: f32, sections: usize) {
    let (rc, dt) = rc_terms(cutoff_hz, sample_rate);
    let alpha = rc / (rc + dt);
    for _ in 0..sections {
        for ch in 0..channels {
            high_pass_channel(data, channels, ch, alpha);
        }
    }
}

/// Low band of `buffer` following [`isolation_db`], as floats.
pub fn isolate_low(buffer: &AudioBuffer, split_hz: f32) -> Vec<f32> {
    let mut data = buffer.to_float();
    let cutoff = cascade_cutoff(split_hz, LOWPASS_SECTIONS);
    low_pass(
        &mut data,
        buffer.channels() as usize,
        buffer.sample_rate(),
        cutoff,
        LOWPASS_SECTIONS,
    );
    data
}

/// Everything above the split, deep bass suppressed, as floats.
pub fn isolate_high(buffer: &AudioBuffer, split_hz: f32) -> Vec<f32> {
    let mut data = buffer.to_float();
    high_pass(
        &mut data,
        buffer.channels() as usize,
        buffer.sample_rate(),
        split_hz,
        HIGHPASS_SECTIONS,
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Steady-state gain in dB, measured over the second half.
    fn response_db(input: &AudioBuffer, output: &[f32]) -> f32 {
        let half = input.samples().len() / 2;
        let rms = |xs: &[f32]| (xs.iter().map(|x| x * x).sum::<f32>() / xs.len() as f32).sqrt();
        let before = rms(&input.to_float()[half..]);
        let after = rms(&output[half..]);
        20.0 * (after / before).log10()
    }

    #[test]
    fn curve_shape() {
        assert_eq!(isolation_db(40.0, 120.0), 0.0);
        assert_eq!(isolation_db(120.0, 120.0), 0.0);
        assert!((isolation_db(240.0, 120.0) + 30.0).abs() < 1e-4);
        assert!((isolation_db(1000.0, 120.0) + 60.0).abs() < 1e-4);
        assert_eq!(isolation_db(5000.0, 120.0), -60.0);
        assert_eq!(isolation_db(5000.0, 600.0), -60.0);
    }

    #[test]
    fn table_follows_labels() {
        let table = isolation_table(120.0);
        assert_eq!(table.len(), ISOLATION_BANDS.len());
        assert_eq!(table[1], ("40Hz", 0.0));
        assert!((table[6].1 + 30.0).abs() < 1e-4);
    }

    #[test]
    fn low_isolation_passes_sub_and_cuts_octave() {
        let sub = AudioBuffer::tone(40.0, 2000, 44100, 2, -6.0);
        let low_mid = AudioBuffer::tone(240.0, 2000, 44100, 2, -6.0);
        let sub_db = response_db(&sub, &isolate_low(&sub, 120.0));
        let mid_db = response_db(&low_mid, &isolate_low(&low_mid, 120.0));
        assert!(sub_db > -2.0, "40 Hz response {sub_db}");
        assert!((mid_db + 30.0).abs() < 3.0, "240 Hz response {mid_db}");
    }

    #[test]
    fn high_isolation_suppresses_deep_bass() {
        let sub = AudioBuffer::tone(40.0, 2000, 44100, 1, -6.0);
        let mid = AudioBuffer::tone(2000.0, 2000, 44100, 1, -6.0);
        assert!(response_db(&sub, &isolate_high(&sub, 120.0)) < -15.0);
        assert!(response_db(&mid, &isolate_high(&mid, 120.0)) > -1.0);
    }
}
