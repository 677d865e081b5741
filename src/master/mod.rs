//! Mastering orchestrator
//!
//! `Loaded -> (Applied | Skipped) x N -> Exported`, with `EmergencyFallback`
//! reachable from anywhere. Only an unknown preset is returned as an error
//! before work starts; every later failure degrades the output instead of
//! removing it.

pub mod fallback;
pub mod reference;

use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::audio::buffer::AudioBuffer;
use crate::audio::decode::decode_audio;
use crate::dsp::bass::BassProcessor;
use crate::dsp::compressor::Compressor;
use crate::dsp::eq::Equalizer;
use crate::dsp::exciter::HarmonicExciter;
use crate::dsp::level::{Gain, Normalize};
use crate::dsp::limiter::Limiter;
use crate::dsp::stereo::{SpatialEnhancer, StereoImager};
use crate::dsp::warmth::AnalogWarmth;
use crate::dsp::Stage;
use crate::encode::{ExportSettings, Exporter, Tags};
use crate::error::{MasterError, StageError, StageResult};
use crate::presets::{self, Preset};
use reference::{resolve_reference, LevelMatcher, ReferenceMatcher, DEFAULT_REFERENCE_DIR};

/// Input quieter than this is renormalised before the chain.
pub const QUIET_INPUT_DBFS: f32 = -50.0;
/// Output quieter than this is renormalised after the chain.
pub const QUIET_OUTPUT_DBFS: f32 = -40.0;
pub const RESCUE_PEAK_DBFS: f32 = -3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalState {
    Exported,
    EmergencyFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    Applied,
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecord {
    pub stage: &'static str,
    #[serde(flatten)]
    pub outcome: StageOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct MasterReport {
    pub output: PathBuf,
    pub preset: &'static str,
    pub duration_secs: f32,
    /// RMS of the exported buffer
    pub level_dbfs: f32,
    pub final_state: FinalState,
    pub stages: Vec<StageRecord>,
    /// Recovered failures, in the order they happened
    pub failures: Vec<String>,
}

/// One mastering request.
#[derive(Debug, Clone)]
pub struct Job {
    pub output: PathBuf,
    pub preset: String,
    /// Defaults to the input (or output) file stem
    pub title: Option<String>,
    /// User reference track; takes priority over the preset's own
    pub reference: Option<PathBuf>,
}

/// `<stem>_mastered_<preset>.mp3` next to the input.
pub fn default_output(input: &Path, preset: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    input.with_file_name(format!("{}_mastered_{}.mp3", stem, preset.to_lowercase()))
}

/// Stages for a preset in chain order. Disabled features are left out.
pub fn build_chain(preset: &Preset) -> Vec<Box<dyn Stage>> {
    let mut stages: Vec<Box<dyn Stage>> = Vec::new();

    if let Some(bass) = preset.bass_processing {
        stages.push(Box::new(BassProcessor::new(bass)));
    }
    stages.push(Box::new(Normalize {
        target_dbfs: preset.target_dbfs,
    }));
    stages.push(Box::new(Gain::at_least_min(preset.gain_db)));
    if let Some(amount) = preset.harmonic_exciter {
        stages.push(Box::new(HarmonicExciter::new(
            amount,
            preset.bass_processing.is_some(),
        )));
    }
    stages.push(Box::new(Compressor::new(preset.compression)));
    stages.push(Box::new(Equalizer::new(preset.eq_bands)));
    if let Some(amount) = preset.spatial_enhancement {
        stages.push(Box::new(SpatialEnhancer::new(amount)));
    }
    stages.push(Box::new(StereoImager::new(preset.stereo_width)));
    if let Some(amount) = preset.analog_warmth {
        stages.push(Box::new(AnalogWarmth::new(amount)));
    }
    stages.push(Box::new(Limiter::new(preset.ceiling_db)));

    stages
}

/// Run stages in order. A failing stage is logged and its input passes
/// through unchanged.
pub fn run_chain(
    stages: &[Box<dyn Stage>],
    input: AudioBuffer,
    records: &mut Vec<StageRecord>,
) -> AudioBuffer {
    let mut buffer = input;
    for stage in stages {
        let result = stage
            .process(&buffer)
            .and_then(|out| check_format(&buffer, out));
        match result {
            Ok(out) => {
                log::debug!(
                    "{}: rms {:.2} -> {:.2} dBFS",
                    stage.name(),
                    buffer.rms_dbfs(),
                    out.rms_dbfs()
                );
                buffer = out;
                records.push(StageRecord {
                    stage: stage.name(),
                    outcome: StageOutcome::Applied,
                });
            }
            Err(source) => {
                let err = MasterError::Stage {
                    stage: stage.name(),
                    source,
                };
                log::warn!("{}; stage skipped", err);
                records.push(StageRecord {
                    stage: stage.name(),
                    outcome: StageOutcome::Skipped {
                        reason: err.to_string(),
                    },
                });
            }
        }
    }
    buffer
}

fn check_format(input: &AudioBuffer, output: AudioBuffer) -> StageResult<AudioBuffer> {
    if output.channels() != input.channels() {
        return Err(StageError::UnsupportedChannels(output.channels()));
    }
    if output.sample_rate() != input.sample_rate() {
        return Err(StageError::InvalidSampleRate(output.sample_rate()));
    }
    if output.frame_count() != input.frame_count() {
        return Err(StageError::ShapeMismatch {
            expected: input.samples().len(),
            actual: output.samples().len(),
        });
    }
    Ok(output)
}

/// Run `f`, turning a panic into `Catastrophic`.
fn guarded<T>(f: impl FnOnce() -> Result<T, MasterError>) -> Result<T, MasterError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(MasterError::Catastrophic(panic_message(payload))))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".into()
    }
}

pub struct Masterer {
    exporter: Box<dyn Exporter>,
    matcher: Box<dyn ReferenceMatcher>,
    references_dir: PathBuf,
    bitrate: Option<String>,
}

impl Masterer {
    pub fn new(exporter: Box<dyn Exporter>) -> Self {
        Self {
            exporter,
            matcher: Box::new(LevelMatcher),
            references_dir: PathBuf::from(DEFAULT_REFERENCE_DIR),
            bitrate: None,
        }
    }

    pub fn with_matcher(mut self, matcher: Box<dyn ReferenceMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_references_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.references_dir = dir.into();
        self
    }

    /// Replaces the preset bitrate for ordinary exports.
    pub fn with_bitrate(mut self, bitrate: Option<String>) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Decode, master and export one file.
    pub fn process_file(&self, input: &Path, job: &Job) -> Result<MasterReport, MasterError> {
        let preset = presets::lookup(&job.preset)?;
        log::info!("Mastering {} with preset {}", input.display(), preset.id);

        let mut failures = Vec::new();
        let buffer = match decode_audio(input) {
            Ok(buffer) => buffer,
            Err(e) => {
                let err = MasterError::Decode(format!("{:#}", e));
                log::warn!("{}; using silence", err);
                failures.push(err.to_string());
                fallback::silence()
            }
        };

        let title = job.title.clone().unwrap_or_else(|| stem_of(input));
        self.run(buffer, preset, job, title, failures)
    }

    /// Master and export an already decoded buffer.
    pub fn process_buffer(&self, buffer: AudioBuffer, job: &Job) -> Result<MasterReport, MasterError> {
        let preset = presets::lookup(&job.preset)?;
        let title = job.title.clone().unwrap_or_else(|| stem_of(&job.output));
        self.run(buffer, preset, job, title, Vec::new())
    }

    fn run(
        &self,
        buffer: AudioBuffer,
        preset: &'static Preset,
        job: &Job,
        title: String,
        mut failures: Vec<String>,
    ) -> Result<MasterReport, MasterError> {
        let buffer = if buffer.is_empty() {
            let err = MasterError::Decode("buffer has no audio frames".into());
            log::warn!("{}; using silence", err);
            failures.push(err.to_string());
            fallback::silence()
        } else {
            buffer
        };

        let mut stages = Vec::new();
        let mastered = guarded(|| {
            self.master(buffer, preset, job.reference.as_deref(), &mut stages, &mut failures)
        });

        let settings = ExportSettings {
            bitrate: self
                .bitrate
                .clone()
                .unwrap_or_else(|| preset.bitrate.to_string()),
            tags: Tags::new(title),
        };

        let buffer = match mastered {
            Ok(buffer) => buffer,
            Err(err) => {
                log::error!("{}", err);
                failures.push(err.to_string());
                return self.emergency(job, preset, stages, failures);
            }
        };

        if let Err(e) = self.exporter.export(&buffer, &job.output, &settings) {
            let err = MasterError::Export(format!("{:#}", e));
            log::error!("{}", err);
            failures.push(err.to_string());
            return self.emergency(job, preset, stages, failures);
        }

        log::info!(
            "Exported {} ({:.2}s, {:.1} dBFS)",
            job.output.display(),
            buffer.duration_secs(),
            buffer.rms_dbfs()
        );
        Ok(MasterReport {
            output: job.output.clone(),
            preset: preset.id,
            duration_secs: buffer.duration_secs(),
            level_dbfs: buffer.rms_dbfs(),
            final_state: FinalState::Exported,
            stages,
            failures,
        })
    }

    /// Reference match when one resolves, the stage chain otherwise, with
    /// level rescue on both sides.
    fn master(
        &self,
        buffer: AudioBuffer,
        preset: &Preset,
        user_reference: Option<&Path>,
        stages: &mut Vec<StageRecord>,
        failures: &mut Vec<String>,
    ) -> Result<AudioBuffer, MasterError> {
        let mut buffer = buffer;
        let level = buffer.rms_dbfs();
        log::info!("Input level {:.1} dBFS, {:.2}s", level, buffer.duration_secs());
        if level < QUIET_INPUT_DBFS {
            log::info!("Input below {} dBFS, renormalising", QUIET_INPUT_DBFS);
            buffer = buffer.normalize(RESCUE_PEAK_DBFS);
        }

        let matched = resolve_reference(user_reference, preset, &self.references_dir)
            .and_then(|path| match self.match_reference(&buffer, &path, preset) {
                Ok(out) => Some(out),
                Err(err) => {
                    log::warn!("Reference matching failed, using the stage chain: {:#}", err);
                    failures.push(format!("Reference matching failed: {:#}", err));
                    None
                }
            });

        let mut out = match matched {
            Some(out) => {
                stages.push(StageRecord {
                    stage: self.matcher.name(),
                    outcome: StageOutcome::Applied,
                });
                out
            }
            None => run_chain(&build_chain(preset), buffer, stages),
        };

        if out.rms_dbfs() < QUIET_OUTPUT_DBFS {
            log::info!("Output below {} dBFS, renormalising", QUIET_OUTPUT_DBFS);
            out = out.normalize(RESCUE_PEAK_DBFS);
            if out.rms_dbfs() < QUIET_OUTPUT_DBFS {
                return Err(MasterError::Catastrophic(format!(
                    "output level {:.1} dBFS after renormalising",
                    out.rms_dbfs()
                )));
            }
        }
        Ok(out)
    }

    fn match_reference(
        &self,
        buffer: &AudioBuffer,
        path: &Path,
        preset: &Preset,
    ) -> anyhow::Result<AudioBuffer> {
        log::info!("Matching against reference {}", path.display());
        let reference = decode_audio(path)?;
        self.matcher.match_reference(buffer, &reference, preset)
    }

    fn emergency(
        &self,
        job: &Job,
        preset: &'static Preset,
        stages: Vec<StageRecord>,
        failures: Vec<String>,
    ) -> Result<MasterReport, MasterError> {
        let tone = fallback::emergency_tone();
        self.exporter
            .export(&tone, &job.output, &fallback::emergency_settings())
            .map_err(|e| MasterError::Export(format!("emergency tone: {:#}", e)))?;

        log::warn!("Exported emergency tone to {}", job.output.display());
        Ok(MasterReport {
            output: job.output.clone(),
            preset: preset.id,
            duration_secs: tone.duration_secs(),
            level_dbfs: tone.rms_dbfs(),
            final_state: FinalState::EmergencyFallback,
            stages,
            failures,
        })
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Exported {
        buffer: AudioBuffer,
        settings: ExportSettings,
    }

    /// Records every export; optionally fails everything but the emergency tone.
    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Exported>>>,
        fail_regular: bool,
    }

    impl Exporter for Recorder {
        fn export(&self, buffer: &AudioBuffer, _path: &Path, settings: &ExportSettings) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(Exported {
                buffer: buffer.clone(),
                settings: settings.clone(),
            });
            if self.fail_regular && settings.tags.title != fallback::TONE_TITLE {
                anyhow::bail!("disk full");
            }
            Ok(())
        }
    }

    struct Broken;

    impl Stage for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn process(&self, _input: &AudioBuffer) -> StageResult<AudioBuffer> {
            Err(StageError::InvalidParameter {
                name: "amount",
                value: f32::NAN,
            })
        }
    }

    struct Truncating;

    impl Stage for Truncating {
        fn name(&self) -> &'static str {
            "truncating"
        }

        fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer> {
            Ok(AudioBuffer::silence(10, input.sample_rate(), input.channels()))
        }
    }

    fn job(preset: &str) -> Job {
        Job {
            output: PathBuf::from("out.mp3"),
            preset: preset.into(),
            title: Some("Song".into()),
            reference: None,
        }
    }

    fn masterer(recorder: &Recorder) -> Masterer {
        Masterer::new(Box::new(recorder.clone())).with_references_dir("/nonexistent/references")
    }

    fn music(ms: u32, channels: u16) -> AudioBuffer {
        let low = AudioBuffer::tone(55.0, ms, 44100, channels, -12.0);
        let high = AudioBuffer::tone(1800.0, ms, 44100, channels, -18.0);
        let mixed = low
            .samples()
            .iter()
            .zip(high.samples())
            .map(|(&a, &b)| a.saturating_add(b))
            .collect();
        AudioBuffer::new(channels, 44100, mixed).unwrap()
    }

    #[test]
    fn silence_never_yields_silence() {
        for preset in presets::all() {
            let recorder = Recorder::default();
            let silent = AudioBuffer::silence(1000, 44100, 2);
            let report = masterer(&recorder)
                .process_buffer(silent, &job(preset.id))
                .unwrap();

            assert!(report.duration_secs >= 0.5, "{}", preset.id);
            assert!(report.level_dbfs >= QUIET_OUTPUT_DBFS, "{}", preset.id);
            let calls = recorder.calls.lock().unwrap();
            let last = calls.last().unwrap();
            assert!(last.buffer.rms_dbfs() >= QUIET_OUTPUT_DBFS);
        }
    }

    #[test]
    fn failing_stage_passes_input_through() {
        let input = music(200, 2);
        let stages: Vec<Box<dyn Stage>> = vec![Box::new(Broken)];
        let mut records = Vec::new();
        let out = run_chain(&stages, input.clone(), &mut records);

        assert_eq!(out, input);
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].outcome, StageOutcome::Skipped { .. }));
    }

    #[test]
    fn failing_stage_does_not_stop_the_chain() {
        let input = music(200, 2);
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(Broken),
            Box::new(Truncating),
            Box::new(Gain { db: -6.0 }),
        ];
        let mut records = Vec::new();
        let out = run_chain(&stages, input.clone(), &mut records);

        assert_eq!(out, input.apply_gain_db(-6.0));
        let outcomes: Vec<bool> = records
            .iter()
            .map(|r| r.outcome == StageOutcome::Applied)
            .collect();
        assert_eq!(outcomes, vec![false, false, true]);
    }

    #[test]
    fn chain_order_follows_preset() {
        let names: Vec<_> = build_chain(presets::lookup("masterify_v1").unwrap())
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names.first(), Some(&"bass_processing"));
        assert_eq!(names.last(), Some(&"limiter"));
        let pos = |n: &str| names.iter().position(|s| *s == n).unwrap();
        assert!(pos("normalize") < pos("gain"));
        assert!(pos("gain") < pos("compression"));
        assert!(pos("compression") < pos("eq"));
        assert!(pos("eq") < pos("stereo_width"));

        let clean: Vec<_> = build_chain(presets::lookup("clean").unwrap())
            .iter()
            .map(|s| s.name())
            .collect();
        assert!(!clean.contains(&"bass_processing"));
    }

    #[test]
    fn masterify_v1_keeps_stereo() {
        let recorder = Recorder::default();
        let report = masterer(&recorder)
            .process_buffer(music(2000, 2), &job("masterify_v1"))
            .unwrap();

        assert_eq!(report.final_state, FinalState::Exported);
        assert!((report.duration_secs - 2.0).abs() < 1e-3);
        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].buffer.channels(), 2);
        assert_eq!(calls[0].buffer.frame_count(), 88200);
        assert!(calls[0].buffer.peak_dbfs() <= -1.5 + 0.05);
        assert_eq!(calls[0].settings.tags, Tags::new("Song"));
    }

    #[test]
    fn mono_input_stays_mono() {
        let recorder = Recorder::default();
        masterer(&recorder)
            .process_buffer(music(500, 1), &job("masterify_v1"))
            .unwrap();
        assert_eq!(recorder.calls.lock().unwrap()[0].buffer.channels(), 1);
    }

    #[test]
    fn export_failure_falls_back_to_tone() {
        let recorder = Recorder {
            fail_regular: true,
            ..Default::default()
        };
        let report = masterer(&recorder)
            .process_buffer(music(500, 2), &job("warm"))
            .unwrap();

        assert_eq!(report.final_state, FinalState::EmergencyFallback);
        assert_eq!(report.duration_secs, 0.5);
        assert!(report.failures.iter().any(|f| f.contains("disk full")));

        let calls = recorder.calls.lock().unwrap();
        let tone = calls.last().unwrap();
        assert_eq!(tone.buffer.frame_count(), 22050);
        assert_eq!(tone.settings.bitrate, "128k");
        assert_eq!(tone.settings.tags.album, "Masterify");
        assert_eq!(tone.settings.tags.artist, "Masterify Audio");
        assert_eq!(tone.settings.tags.title, "Error Recovery");
    }

    #[test]
    fn unknown_preset_touches_nothing() {
        let recorder = Recorder::default();
        let err = masterer(&recorder)
            .process_file(Path::new("/nonexistent/in.wav"), &job("does_not_exist"))
            .unwrap_err();
        assert!(matches!(err, MasterError::PresetNotFound(_)));
        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn undecodable_input_is_replaced_with_silence() {
        let recorder = Recorder::default();
        let report = masterer(&recorder)
            .process_file(Path::new("/nonexistent/in.wav"), &job("clean"))
            .unwrap();
        assert!(report.failures[0].starts_with("Decode failed"));
        // silence cannot be rescued, so the tone goes out
        assert_eq!(report.final_state, FinalState::EmergencyFallback);
    }

    #[test]
    fn empty_buffer_is_replaced_with_silence() {
        let recorder = Recorder::default();
        let empty = AudioBuffer::new(2, 48000, Vec::new()).unwrap();
        let report = masterer(&recorder)
            .process_buffer(empty, &job("clean"))
            .unwrap();

        assert_eq!(report.failures[0], "Decode failed: buffer has no audio frames");
        // the chain ran on one second of 44.1 kHz silence
        assert_eq!(report.stages.len(), build_chain(presets::lookup("clean").unwrap()).len());
        assert_eq!(report.final_state, FinalState::EmergencyFallback);
        assert_eq!(report.duration_secs, 0.5);
    }

    #[test]
    fn empty_decoded_file_is_a_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.wav");
        crate::encode::wav::WavExporter
            .export(
                &AudioBuffer::new(2, 44100, Vec::new()).unwrap(),
                &input,
                &fallback::emergency_settings(),
            )
            .unwrap();

        let recorder = Recorder::default();
        let report = masterer(&recorder)
            .process_file(&input, &job("clean"))
            .unwrap();
        assert!(report.failures[0].starts_with("Decode failed"));
    }

    struct Exploding;

    impl ReferenceMatcher for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn match_reference(
            &self,
            _target: &AudioBuffer,
            _reference: &AudioBuffer,
            _preset: &Preset,
        ) -> anyhow::Result<AudioBuffer> {
            panic!("matcher exploded")
        }
    }

    #[test]
    fn panic_in_mastering_exports_the_tone() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("ref.wav");
        crate::encode::wav::WavExporter
            .export(
                &AudioBuffer::tone(440.0, 300, 44100, 2, -3.0),
                &reference,
                &fallback::emergency_settings(),
            )
            .unwrap();

        let recorder = Recorder::default();
        let mut request = job("masterify_v1");
        request.reference = Some(reference);
        let report = masterer(&recorder)
            .with_matcher(Box::new(Exploding))
            .process_buffer(music(300, 2), &request)
            .unwrap();

        assert_eq!(report.final_state, FinalState::EmergencyFallback);
        assert_eq!(report.duration_secs, 0.5);
        assert!(report
            .failures
            .iter()
            .any(|f| f == "Catastrophic failure: matcher exploded"));

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].buffer, fallback::emergency_tone());
        assert_eq!(calls[0].settings, fallback::emergency_settings());
    }

    #[test]
    fn missing_reference_uses_the_chain() {
        let recorder = Recorder::default();
        let mut request = job("masterify_v1");
        request.reference = Some(PathBuf::from("/nonexistent/ref.wav"));
        let report = masterer(&recorder)
            .process_buffer(music(300, 2), &request)
            .unwrap();
        assert_eq!(report.stages[0].stage, "bass_processing");
    }

    #[test]
    fn reference_replaces_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("ref.wav");
        crate::encode::wav::WavExporter
            .export(
                &AudioBuffer::tone(440.0, 300, 44100, 2, -3.0),
                &reference,
                &fallback::emergency_settings(),
            )
            .unwrap();

        let recorder = Recorder::default();
        let mut request = job("masterify_v1");
        request.reference = Some(reference);
        let report = masterer(&recorder)
            .process_buffer(music(300, 2), &request)
            .unwrap();

        assert_eq!(report.stages.len(), 1);
        assert_eq!(report.stages[0].stage, "level_match");
        assert_eq!(report.final_state, FinalState::Exported);
    }

    #[test]
    fn panics_become_catastrophic() {
        let result: Result<(), MasterError> = guarded(|| panic!("boom"));
        assert!(matches!(result, Err(MasterError::Catastrophic(ref m)) if m == "boom"));
    }

    #[test]
    fn default_output_name() {
        assert_eq!(
            default_output(Path::new("/music/track.flac"), "Warm"),
            PathBuf::from("/music/track_mastered_warm.mp3")
        );
    }
}
