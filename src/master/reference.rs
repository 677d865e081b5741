//! Reference-track mode
//!
//! When a usable reference resolves, a [`ReferenceMatcher`] replaces the
//! whole stage chain. Anything short of a successful match falls back to the
//! ordinary chain.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::audio::buffer::AudioBuffer;
use crate::dsp::limiter::Limiter;
use crate::dsp::Stage;
use crate::presets::Preset;

pub const DEFAULT_REFERENCE_DIR: &str = "references";
const REFERENCE_EXTENSIONS: &[&str] = &["mp3", "wav", "flac"];

/// Seam for an external reference-matching engine.
pub trait ReferenceMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn match_reference(
        &self,
        target: &AudioBuffer,
        reference: &AudioBuffer,
        preset: &Preset,
    ) -> Result<AudioBuffer>;
}

/// Matches RMS loudness to the reference, then applies the preset ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelMatcher;

impl ReferenceMatcher for LevelMatcher {
    fn name(&self) -> &'static str {
        "level_match"
    }

    fn match_reference(
        &self,
        target: &AudioBuffer,
        reference: &AudioBuffer,
        preset: &Preset,
    ) -> Result<AudioBuffer> {
        let target_level = target.rms_dbfs();
        let reference_level = reference.rms_dbfs();
        if !target_level.is_finite() || !reference_level.is_finite() {
            anyhow::bail!(
                "Cannot match levels: target {:.1} dBFS, reference {:.1} dBFS",
                target_level,
                reference_level
            );
        }

        let matched = target.apply_gain_db(reference_level - target_level);
        log::info!(
            "Level match: {:.1} -> {:.1} dBFS",
            target_level,
            matched.rms_dbfs()
        );
        Limiter::new(preset.ceiling_db)
            .process(&matched)
            .context("Limiter failed on matched audio")
    }
}

/// System reference path for a preset, if one is present on disk.
pub fn system_reference(preset: &Preset, dir: &Path) -> Option<PathBuf> {
    if !preset.has_reference_track() {
        return None;
    }
    REFERENCE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}_reference.{}", preset.id, ext)))
        .find(|p| p.is_file())
}

/// A user-supplied reference wins over the preset's system reference.
pub fn resolve_reference(user: Option<&Path>, preset: &Preset, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = user {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        log::warn!("Reference not found: {}", path.display());
    }
    system_reference(preset, dir)
}

/// Presets whose system reference is present in `dir`.
pub fn available_references(dir: &Path) -> BTreeMap<&'static str, PathBuf> {
    crate::presets::all()
        .iter()
        .filter_map(|p| system_reference(p, dir).map(|path| (p.id, path)))
        .collect()
}

/// Download configured reference tracks that are not yet present.
///
/// Returns the number of references available afterwards. A failed
/// download is logged and skipped.
pub fn fetch_references(urls: &BTreeMap<String, String>, dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let client = reqwest::blocking::Client::new();
    let mut ready = 0;

    for (preset, url) in urls {
        let destination = dir.join(format!("{}_reference.mp3", preset));
        if destination.exists() {
            log::info!("{} already present, skipping", destination.display());
            ready += 1;
            continue;
        }

        let source = Path::new(url);
        let result = if source.is_file() {
            std::fs::copy(source, &destination)
                .map(|_| ())
                .with_context(|| format!("Failed to copy {}", source.display()))
        } else {
            download(&client, url, &destination)
        };

        match result {
            Ok(()) => {
                log::info!("Reference ready: {}", destination.display());
                ready += 1;
            }
            Err(err) => log::warn!("Reference for {} unavailable: {:#}", preset, err),
        }
    }

    Ok(ready)
}

fn download(client: &reqwest::blocking::Client, url: &str, destination: &Path) -> Result<()> {
    log::info!("Downloading {}", url);
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Request failed: {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP {} for {}", status, url);
    }

    let bytes = response.bytes().context("Failed to read response body")?;
    let mut file = std::fs::File::create(destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;
    file.write_all(&bytes)?;
    Ok(())
}
