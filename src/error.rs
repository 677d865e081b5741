//! Error types for the mastering chain

use thiserror::Error;

/// Result type for stage operations
pub type StageResult<T> = std::result::Result<T, StageError>;

/// Failures raised by a single processing stage.
///
/// A stage failure never aborts mastering: the orchestrator logs it and
/// passes the stage's input through unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// Channel layout the stage cannot handle
    #[error("Unsupported channel count: {0} (must be 1 or 2)")]
    UnsupportedChannels(u16),

    /// Sample rate of zero or otherwise unusable
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// A preset parameter outside the range the stage accepts
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// Interleaved data whose length does not divide into whole frames,
    /// or a derived signal whose shape disagrees with its source
    #[error("Shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Top-level mastering errors.
///
/// `PresetNotFound` is returned before any work starts. The other variants
/// are recovered inside the orchestrator and recorded on the report; `Export`
/// only reaches the caller when even the emergency tone cannot be written.
#[derive(Error, Debug)]
pub enum MasterError {
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: StageError,
    },

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Catastrophic failure: {0}")]
    Catastrophic(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
