/// Full-scale reference for signed 16-bit samples.
pub const FULL_SCALE: f32 = 32768.0;

pub fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

pub fn gain_to_db(gain: f32) -> f32 {
    if gain <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * gain.log10()
    }
}

/// Convert a float sample in full-scale units back to i16, saturating.
#[inline]
pub fn to_i16(sample: f32) -> i16 {
    (sample * FULL_SCALE).round().clamp(-32768.0, 32767.0) as i16
}

#[inline]
pub fn to_f32(sample: i16) -> f32 {
    sample as f32 / FULL_SCALE
}

/// Extract the digits of a band label and read them as a frequency.
///
/// Only ASCII digits are kept, so `"120Hz"` is 120 and `"1kHz"` is 1: a
/// kilo suffix is not expanded.
pub fn parse_band_frequency(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

pub fn ensure_finite(name: &'static str, value: f32) -> crate::error::StageResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(crate::error::StageError::InvalidParameter { name, value })
    }
}
