//! Display waveform digest
//!
//! A finished buffer is folded to mono and cut into equal chunks; each chunk
//! yields its peak magnitude scaled to [0, 1]. The digest is produced lazily
//! and keeps no link to the buffer it came from.

use anyhow::Result;
use std::path::Path;

use super::buffer::AudioBuffer;
use crate::dsp::utils::FULL_SCALE;

pub const DEFAULT_POINTS: usize = 1000;

/// One-shot iterator over digest points.
#[derive(Debug)]
pub struct WaveformDigest {
    mono: Vec<f32>,
    chunk: usize,
    pos: usize,
}

impl Iterator for WaveformDigest {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.mono.len() {
            return None;
        }
        let end = (self.pos + self.chunk).min(self.mono.len());
        let peak = self.mono[self.pos..end]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        self.pos = end;
        Some((peak / FULL_SCALE).clamp(0.0, 1.0))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.mono.len() - self.pos).div_ceil(self.chunk);
        (left, Some(left))
    }
}

impl ExactSizeIterator for WaveformDigest {}

/// Digest of at most `num_points` values.
pub fn digest(buffer: &AudioBuffer, num_points: usize) -> WaveformDigest {
    let mono: Vec<f32> = if num_points == 0 {
        Vec::new()
    } else if buffer.channels() == 2 {
        buffer
            .samples()
            .chunks_exact(2)
            .map(|f| (f[0] as f32 + f[1] as f32) / 2.0)
            .collect()
    } else {
        buffer.samples().iter().map(|&s| s as f32).collect()
    };
    let chunk = mono.len().div_ceil(num_points.max(1)).max(1);
    WaveformDigest {
        mono,
        chunk,
        pos: 0,
    }
}

/// Decode a finished file and digest it.
pub fn digest_file(path: &Path, num_points: usize) -> Result<Vec<f32>> {
    let buffer = super::decode::decode_audio(path)?;
    Ok(digest(&buffer, num_points).collect())
}
