pub mod ffmpeg;
pub mod wav;

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::audio::buffer::AudioBuffer;

pub const ALBUM: &str = "Masterify";
pub const ARTIST: &str = "Masterify Audio";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tags {
    pub album: String,
    pub artist: String,
    pub title: String,
}

impl Tags {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            album: ALBUM.into(),
            artist: ARTIST.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// ffmpeg bitrate string, e.g. "320k"
    pub bitrate: String,
    pub tags: Tags,
}

/// Writes a finished buffer to a container file.
pub trait Exporter: Send + Sync {
    fn export(&self, buffer: &AudioBuffer, path: &Path, settings: &ExportSettings) -> Result<()>;
}

/// WAV output is written natively, everything else goes through ffmpeg.
pub fn exporter_for(path: &Path) -> Box<dyn Exporter> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    if is_wav {
        Box::new(wav::WavExporter)
    } else {
        Box::new(ffmpeg::FfmpegExporter::default())
    }
}
