//! Preset-driven audio mastering chain and waveform digest.

pub mod audio;
pub mod config;
pub mod dsp;
pub mod encode;
pub mod error;
pub mod master;
pub mod presets;

pub use audio::buffer::AudioBuffer;
pub use error::{MasterError, StageError};
pub use master::{MasterReport, Masterer};
pub use presets::Preset;
