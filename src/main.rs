mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cli::Cli;
use masterify::audio::{analysis, decode, waveform};
use masterify::config;
use masterify::encode::exporter_for;
use masterify::master::{self, reference, FinalState, Job, MasterReport, Masterer};
use masterify::presets;
use masterify::MasterError;

#[derive(Serialize)]
struct WaveformFile<'a> {
    source: &'a Path,
    points: usize,
    waveform: Vec<f32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect masterify.toml / global config
    let mut reference_urls = BTreeMap::new();
    let config_path = cli.config.clone().or_else(config::discover);
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.bitrate.is_none() { cli.bitrate = cfg.output.bitrate; }
            if cli.format == "mp3" { cli.format = cfg.output.format; }
            if cli.waveform_points == waveform::DEFAULT_POINTS { cli.waveform_points = cfg.waveform.points; }
            if cli.references_dir == Path::new(reference::DEFAULT_REFERENCE_DIR) {
                cli.references_dir = cfg.references.dir;
            }
            reference_urls = cfg.references.urls;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if cli.list_presets {
        let available = reference::available_references(&cli.references_dir);
        println!("Available presets:");
        for preset in presets::all() {
            let marker = if available.contains_key(preset.id) { " [reference]" } else { "" };
            println!(
                "  {:<14} {:<16} {}{}",
                preset.id, preset.display_name, preset.description, marker
            );
        }
        return Ok(());
    }

    if cli.fetch_references {
        if reference_urls.is_empty() {
            log::warn!("No reference URLs configured under [references.urls]");
        }
        let ready = reference::fetch_references(&reference_urls, &cli.references_dir)?;
        log::info!(
            "{} of {} references ready in {}",
            ready,
            reference_urls.len(),
            cli.references_dir.display()
        );
        return Ok(());
    }

    if cli.inputs.is_empty() {
        anyhow::bail!("At least one input audio file is required");
    }
    for input in &cli.inputs {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
    }

    if cli.suggest {
        for input in &cli.inputs {
            let buffer = decode::decode_audio(input)?;
            println!("{}: {}", input.display(), analysis::suggest_preset(&buffer));
        }
        return Ok(());
    }

    if cli.output.is_some() && cli.inputs.len() > 1 {
        anyhow::bail!("--output can only be used with a single input");
    }

    // Reject unknown presets before touching any audio
    let preset = presets::lookup(&cli.preset)?;

    log::info!("masterify - preset {} ({})", preset.id, preset.display_name);
    log::info!("Inputs: {}", cli.inputs.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.jobs)
        .build()
        .context("Failed to build worker pool")?;

    let pb = ProgressBar::new(cli.inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")?
            .progress_chars("=>-"),
    );

    let results: Vec<(PathBuf, Result<MasterReport, MasterError>)> = pool.install(|| {
        cli.inputs
            .par_iter()
            .map(|input| {
                let output = cli.output.clone().unwrap_or_else(|| {
                    master::default_output(input, preset.id).with_extension(&cli.format)
                });
                let masterer = Masterer::new(exporter_for(&output))
                    .with_bitrate(cli.bitrate.clone())
                    .with_references_dir(cli.references_dir.clone());
                let job = Job {
                    output,
                    preset: preset.id.to_string(),
                    title: cli.title.clone(),
                    reference: cli.reference.clone(),
                };
                let result = masterer.process_file(input, &job);
                pb.inc(1);
                (input.clone(), result)
            })
            .collect()
    });

    pb.finish_with_message("Mastering complete");

    let total = results.len();
    let waveform_points = cli.waveform.then_some(cli.waveform_points);
    let failed = summarize(results, waveform_points);

    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, total);
    }

    log::info!("Done!");
    Ok(())
}

/// Log every result and write waveforms. Returns the number of failed masters.
///
/// A waveform that cannot be written is logged; the master it belongs to
/// was already exported and still counts as done.
fn summarize(
    results: Vec<(PathBuf, Result<MasterReport, MasterError>)>,
    waveform_points: Option<usize>,
) -> usize {
    let mut failed = 0;
    for (input, result) in results {
        match result {
            Ok(report) => {
                log_report(&input, &report);
                if let Some(points) = waveform_points {
                    if let Err(err) = write_waveform(&report.output, points) {
                        log::warn!("Waveform for {} failed: {:#}", report.output.display(), err);
                    }
                }
            }
            Err(err) => {
                log::error!("{}: {}", input.display(), err);
                failed += 1;
            }
        }
    }
    failed
}

fn log_report(input: &Path, report: &MasterReport) {
    match report.final_state {
        FinalState::Exported => log::info!(
            "{} -> {} ({:.1}s, {:.1} dBFS)",
            input.display(),
            report.output.display(),
            report.duration_secs,
            report.level_dbfs
        ),
        FinalState::EmergencyFallback => log::warn!(
            "{} -> {}: emergency fallback ({})",
            input.display(),
            report.output.display(),
            report.failures.join("; ")
        ),
    }
    for failure in &report.failures {
        log::debug!("  {}", failure);
    }
}

fn write_waveform(output: &Path, points: usize) -> Result<()> {
    let digest = waveform::digest_file(output, points)?;
    let path = output.with_extension("waveform.json");
    let file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(
        file,
        &WaveformFile {
            source: output,
            points: digest.len(),
            waveform: digest,
        },
    )?;
    log::info!("Waveform ({} points): {}", points, path.display());
    Ok(())
}
