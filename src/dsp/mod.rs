//! Mastering stages.
//!
//! Every stage is a pure buffer transformation: it borrows its input and
//! returns a freshly built buffer with the same frame count and sample rate.
//! Stages keep no state between calls, so one instance can be shared across
//! threads and jobs.

pub mod bass;
pub mod compressor;
pub mod eq;
pub mod exciter;
pub mod filter;
pub mod level;
pub mod limiter;
pub mod stereo;
pub mod transient;
pub mod utils;
pub mod warmth;

use crate::audio::buffer::AudioBuffer;
use crate::error::StageResult;

pub trait Stage: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// Build the processed buffer. On error the caller keeps `input`.
    fn process(&self, input: &AudioBuffer) -> StageResult<AudioBuffer>;
}
