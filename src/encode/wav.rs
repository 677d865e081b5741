use anyhow::{Context, Result};
use std::path::Path;

use super::{ExportSettings, Exporter};
use crate::audio::buffer::AudioBuffer;

/// 16-bit PCM WAV. Bitrate and tags do not apply to this container.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavExporter;

impl Exporter for WavExporter {
    fn export(&self, buffer: &AudioBuffer, path: &Path, settings: &ExportSettings) -> Result<()> {
        let spec = hound::WavSpec {
            channels: buffer.channels(),
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
        for &s in buffer.samples() {
            writer.write_sample(s).context("Failed to write WAV sample")?;
        }
        writer.finalize().context("Failed to finalize WAV file")?;

        log::debug!(
            "Wrote {} ({} frames, tags not stored for '{}')",
            path.display(),
            buffer.frame_count(),
            settings.tags.title
        );
        Ok(())
    }
}
