use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use super::{ExportSettings, Exporter};
use crate::audio::buffer::AudioBuffer;

/// Raw s16le PCM piped into an ffmpeg child process.
pub struct FfmpegEncoder {
    child: Child,
}

impl FfmpegEncoder {
    pub fn new(
        program: &str,
        output_path: &Path,
        sample_rate: u32,
        channels: u16,
        settings: &ExportSettings,
    ) -> Result<Self> {
        let args = encoder_args(output_path, sample_rate, channels, settings);

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}. Is ffmpeg installed?", program))?;

        log::info!(
            "FFmpeg encoder started: {}Hz, {} ch, {} -> {}",
            sample_rate,
            channels,
            settings.bitrate,
            output_path.display()
        );

        Ok(Self { child })
    }

    pub fn write_samples(&mut self, samples: &[i16]) -> Result<()> {
        let stdin = self.child.stdin.as_mut().context("FFmpeg stdin not available")?;
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        stdin.write_all(&bytes).context("Failed to write samples to ffmpeg")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        // Close stdin to signal EOF
        drop(self.child.stdin.take());

        let output = self.child.wait_with_output().context("Failed to wait for ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("FFmpeg exited with error:\n{}", stderr);
        }

        log::info!("FFmpeg encoding complete");
        Ok(())
    }
}

fn encoder_args(
    output_path: &Path,
    sample_rate: u32,
    channels: u16,
    settings: &ExportSettings,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-loglevel".into(), "error".into(),
        "-f".into(), "s16le".into(),
        "-ar".into(), sample_rate.to_string().into(),
        "-ac".into(), channels.to_string().into(),
        "-i".into(), "pipe:0".into(),
        "-b:a".into(), settings.bitrate.clone().into(),
    ];

    let tags = &settings.tags;
    for (key, value) in [("album", &tags.album), ("artist", &tags.artist), ("title", &tags.title)] {
        args.push("-metadata".into());
        args.push(format!("{}={}", key, value).into());
    }

    args.push(output_path.into());
    args
}

#[derive(Debug, Clone)]
pub struct FfmpegExporter {
    pub program: String,
}

impl Default for FfmpegExporter {
    fn default() -> Self {
        Self {
            program: "ffmpeg".into(),
        }
    }
}

impl Exporter for FfmpegExporter {
    fn export(&self, buffer: &AudioBuffer, path: &Path, settings: &ExportSettings) -> Result<()> {
        let mut encoder = FfmpegEncoder::new(
            &self.program,
            path,
            buffer.sample_rate(),
            buffer.channels(),
            settings,
        )?;
        encoder.write_samples(buffer.samples())?;
        encoder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Tags;

    fn settings() -> ExportSettings {
        ExportSettings {
            bitrate: "320k".into(),
            tags: Tags::new("Night Drive"),
        }
    }

    #[test]
    fn args_describe_raw_input_and_tags() {
        let args = encoder_args(Path::new("out.mp3"), 48000, 2, &settings());
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-f") + 1], "s16le");
        assert_eq!(args[pos("-ar") + 1], "48000");
        assert_eq!(args[pos("-ac") + 1], "2");
        assert_eq!(args[pos("-b:a") + 1], "320k");
        assert!(args.contains(&"album=Masterify".to_string()));
        assert!(args.contains(&"artist=Masterify Audio".to_string()));
        assert!(args.contains(&"title=Night Drive".to_string()));
        assert_eq!(args.last().unwrap(), "out.mp3");
    }

    #[test]
    fn missing_binary_is_an_error() {
        let exporter = FfmpegExporter {
            program: "definitely-not-ffmpeg-1234".into(),
        };
        let dir = tempfile::tempdir().unwrap();
        let buffer = AudioBuffer::silence(10, 44100, 2);
        assert!(exporter
            .export(&buffer, &dir.path().join("out.mp3"), &settings())
            .is_err());
    }
}
