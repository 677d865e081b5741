use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::buffer::AudioBuffer;

const FFT_SIZE: usize = 2048;
const HOP_SIZE: usize = 1024;

const BASS_LIMIT_HZ: f32 = 250.0;
const MID_LIMIT_HZ: f32 = 2000.0;
/// Peak-to-RMS ratio under which material counts as already squashed.
const COMPRESSED_CREST: f32 = 3.0;

/// Summed spectral magnitude per coarse band, plus crest factor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpectralProfile {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub crest_factor: f32,
}

pub fn profile(buffer: &AudioBuffer) -> SpectralProfile {
    let mono: Vec<f32> = buffer.to_mono().to_float();
    let peak = mono.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if mono.is_empty() || peak == 0.0 {
        return SpectralProfile::default();
    }
    let samples: Vec<f32> = mono.iter().map(|s| s / peak).collect();

    let rms = (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt();
    let crest_factor = if rms > 0.0 { 1.0 / rms } else { 1.0 };

    let freq_resolution = buffer.sample_rate() as f32 / FFT_SIZE as f32;
    let hann = hann_window(FFT_SIZE);

    let starts: Vec<usize> = if samples.len() <= FFT_SIZE {
        vec![0]
    } else {
        (0..=samples.len() - FFT_SIZE).step_by(HOP_SIZE).collect()
    };

    let (bass, mid, high) = starts
        .into_par_iter()
        .map(|start| {
            let end = (start + FFT_SIZE).min(samples.len());
            let mut fft_input = vec![Complex::new(0.0f32, 0.0); FFT_SIZE];
            for i in 0..(end - start) {
                fft_input[i] = Complex::new(samples[start + i] * hann[i], 0.0);
            }

            // Per-thread FFT planner (rayon-safe)
            let mut planner = FftPlanner::<f32>::new();
            let fft = planner.plan_fft_forward(FFT_SIZE);
            fft.process(&mut fft_input);

            let mut bands = (0.0f32, 0.0f32, 0.0f32);
            for (bin, c) in fft_input[..FFT_SIZE / 2].iter().enumerate() {
                let freq = bin as f32 * freq_resolution;
                let mag = c.norm();
                if freq < BASS_LIMIT_HZ {
                    bands.0 += mag;
                } else if freq < MID_LIMIT_HZ {
                    bands.1 += mag;
                } else {
                    bands.2 += mag;
                }
            }
            bands
        })
        .reduce(
            || (0.0, 0.0, 0.0),
            |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2),
        );

    SpectralProfile {
        bass,
        mid,
        high,
        crest_factor,
    }
}

/// Pick a catalog preset from coarse spectral balance and dynamics.
pub fn suggest_preset(buffer: &AudioBuffer) -> &'static str {
    let p = profile(buffer);
    if p == SpectralProfile::default() {
        return "clean";
    }

    let choice = if p.crest_factor < COMPRESSED_CREST {
        if p.bass > p.high {
            "trap"
        } else {
            "lofi"
        }
    } else if p.bass > p.mid && p.bass > p.high {
        "warm"
    } else if p.high > p.bass {
        "bright"
    } else {
        "clean"
    };

    log::info!(
        "Spectral profile: bass={:.1}, mid={:.1}, high={:.1}, crest={:.2} -> {}",
        p.bass,
        p.mid,
        p.high,
        p.crest_factor,
        choice
    );
    choice
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}
