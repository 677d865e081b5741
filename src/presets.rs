//! Compiled-in mastering presets.
//!
//! The catalog is a constant table; presets are looked up by id and never
//! mutated.

use serde::Serialize;

use crate::error::MasterError;

/// How the dynamics stage reduces level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMode {
    /// Flat makeup gain of `|threshold| / (ratio * 2)` dB.
    MakeupGain,
    /// Per-frame gain reduction above the threshold.
    PerSample,
}

impl Default for CompressionMode {
    fn default() -> Self {
        Self::MakeupGain
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Compression {
    pub threshold_db: f32,
    pub ratio: f32,
    pub attack_ms: f32,
    pub release_ms: f32,
    pub mode: CompressionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BassParams {
    pub threshold_db: f32,
    pub ratio: f32,
    pub makeup_db: f32,
    pub split_hz: f32,
    pub kick_preservation: bool,
    /// Sub-bass boost amount, 0..1
    pub sub_enhance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Normalisation target for the chain's normalise stage (peak dBFS)
    pub target_dbfs: f32,
    pub gain_db: f32,
    pub compression: Compression,
    pub eq_bands: &'static [(&'static str, f32)],
    /// Percent, 100 = unchanged
    pub stereo_width: f32,
    pub ceiling_db: f32,
    pub bitrate: &'static str,
    pub harmonic_exciter: Option<f32>,
    pub analog_warmth: Option<f32>,
    pub spatial_enhancement: Option<f32>,
    pub bass_processing: Option<BassParams>,
}

impl Preset {
    /// Presets with a system reference track for reference-matching mode.
    pub fn has_reference_track(&self) -> bool {
        matches!(self.id, "masterify_v1" | "masterify_ia")
    }
}

const PRESETS: &[Preset] = &[
    Preset {
        id: "masterify_v1",
        display_name: "Masterify V.1",
        description: "Clear enhancement with defined, controlled low-end impact",
        target_dbfs: -2.0,
        gain_db: 0.5,
        compression: Compression {
            threshold_db: -28.0,
            ratio: 1.2,
            attack_ms: 30.0,
            release_ms: 200.0,
            mode: CompressionMode::MakeupGain,
        },
        eq_bands: &[
            ("30Hz", 0.3),
            ("40Hz", 0.5),
            ("60Hz", 0.4),
            ("100Hz", -0.2),
            ("120Hz", -0.5),
            ("200Hz", -1.0),
            ("300Hz", -1.2),
            ("500Hz", -0.8),
            ("1kHz", 0.0),
            ("3kHz", 0.6),
            ("5kHz", 1.0),
            ("8kHz", 0.8),
            ("10kHz", 1.0),
            ("16kHz", 0.7),
        ],
        stereo_width: 102.0,
        ceiling_db: -1.5,
        bitrate: "320k",
        harmonic_exciter: Some(0.08),
        analog_warmth: Some(0.10),
        spatial_enhancement: None,
        bass_processing: Some(BassParams {
            threshold_db: -30.0,
            ratio: 1.15,
            makeup_db: 0.4,
            split_hz: 120.0,
            kick_preservation: true,
            sub_enhance: 0.15,
        }),
    },
    Preset {
        id: "masterify_ia",
        display_name: "Masterify I.A",
        description: "Adaptive processing for a professional, immersive sound",
        target_dbfs: -0.8,
        gain_db: 1.8,
        compression: Compression {
            threshold_db: -18.0,
            ratio: 2.5,
            attack_ms: 8.0,
            release_ms: 80.0,
            mode: CompressionMode::MakeupGain,
        },
        eq_bands: &[
            ("40Hz", 2.0),
            ("60Hz", 1.8),
            ("120Hz", 1.0),
            ("250Hz", 0.0),
            ("500Hz", -0.8),
            ("1kHz", 0.0),
            ("3kHz", 1.8),
            ("5kHz", 2.0),
            ("10kHz", 1.5),
            ("16kHz", 1.0),
        ],
        stereo_width: 110.0,
        ceiling_db: -0.4,
        bitrate: "320k",
        harmonic_exciter: Some(0.25),
        analog_warmth: Some(0.25),
        spatial_enhancement: Some(0.3),
        bass_processing: None,
    },
    Preset {
        id: "clean",
        display_name: "Clean",
        description: "Balanced mastering for acoustic and vocal-focused tracks",
        target_dbfs: -1.0,
        gain_db: 0.0,
        compression: Compression {
            threshold_db: -20.0,
            ratio: 2.5,
            attack_ms: 5.0,
            release_ms: 50.0,
            mode: CompressionMode::PerSample,
        },
        eq_bands: &[
            ("60Hz", 1.0),
            ("120Hz", 0.5),
            ("500Hz", -0.5),
            ("1kHz", 0.0),
            ("3kHz", 1.0),
            ("5kHz", 1.5),
            ("10kHz", 1.0),
            ("16kHz", 0.5),
        ],
        stereo_width: 110.0,
        ceiling_db: -0.3,
        bitrate: "320k",
        harmonic_exciter: None,
        analog_warmth: None,
        spatial_enhancement: None,
        bass_processing: None,
    },
    Preset {
        id: "warm",
        display_name: "Warm",
        description: "Rich low-end with smooth highs for organic sound",
        target_dbfs: -1.2,
        gain_db: 0.0,
        compression: Compression {
            threshold_db: -18.0,
            ratio: 3.0,
            attack_ms: 10.0,
            release_ms: 80.0,
            mode: CompressionMode::PerSample,
        },
        eq_bands: &[
            ("60Hz", 2.0),
            ("120Hz", 1.5),
            ("250Hz", 1.0),
            ("500Hz", 0.0),
            ("1kHz", -0.5),
            ("3kHz", -1.0),
            ("5kHz", 0.0),
            ("10kHz", -1.0),
            ("16kHz", -1.5),
        ],
        stereo_width: 105.0,
        ceiling_db: -0.5,
        bitrate: "320k",
        harmonic_exciter: None,
        analog_warmth: None,
        spatial_enhancement: None,
        bass_processing: None,
    },
    Preset {
        id: "lofi",
        display_name: "Lo-Fi",
        description: "Vintage character with subtle imperfections",
        target_dbfs: -2.0,
        gain_db: -1.0,
        compression: Compression {
            threshold_db: -15.0,
            ratio: 4.0,
            attack_ms: 1.0,
            release_ms: 30.0,
            mode: CompressionMode::PerSample,
        },
        eq_bands: &[
            ("60Hz", -1.0),
            ("120Hz", 2.0),
            ("500Hz", 3.0),
            ("1kHz", 1.5),
            ("3kHz", -2.0),
            ("5kHz", -3.0),
            ("10kHz", -4.0),
            ("16kHz", -6.0),
        ],
        stereo_width: 90.0,
        ceiling_db: -1.0,
        bitrate: "192k",
        harmonic_exciter: None,
        analog_warmth: None,
        spatial_enhancement: None,
        bass_processing: None,
    },
    Preset {
        id: "trap",
        display_name: "Trap",
        description: "Heavy bass, punchy drums, and crisp highs",
        target_dbfs: -0.8,
        gain_db: 1.0,
        compression: Compression {
            threshold_db: -12.0,
            ratio: 5.0,
            attack_ms: 1.0,
            release_ms: 20.0,
            mode: CompressionMode::PerSample,
        },
        eq_bands: &[
            ("40Hz", 4.0),
            ("60Hz", 3.0),
            ("120Hz", 2.0),
            ("250Hz", -1.0),
            ("500Hz", -2.0),
            ("1kHz", 0.0),
            ("3kHz", 2.0),
            ("5kHz", 3.0),
            ("10kHz", 2.0),
            ("16kHz", 1.0),
        ],
        stereo_width: 120.0,
        ceiling_db: -0.3,
        bitrate: "320k",
        harmonic_exciter: None,
        analog_warmth: None,
        spatial_enhancement: None,
        bass_processing: None,
    },
    Preset {
        id: "bright",
        display_name: "Bright",
        description: "Clear and detailed with emphasized highs",
        target_dbfs: -1.0,
        gain_db: 0.5,
        compression: Compression {
            threshold_db: -18.0,
            ratio: 2.0,
            attack_ms: 5.0,
            release_ms: 40.0,
            mode: CompressionMode::PerSample,
        },
        eq_bands: &[
            ("60Hz", 0.0),
            ("120Hz", -0.5),
            ("500Hz", -1.0),
            ("1kHz", 0.0),
            ("3kHz", 2.0),
            ("5kHz", 3.0),
            ("10kHz", 2.5),
            ("16kHz", 2.0),
        ],
        stereo_width: 115.0,
        ceiling_db: -0.3,
        bitrate: "320k",
        harmonic_exciter: None,
        analog_warmth: None,
        spatial_enhancement: None,
        bass_processing: None,
    },
];

/// Every preset, in catalog order.
pub fn all() -> &'static [Preset] {
    PRESETS
}

/// Case-insensitive lookup by preset id.
pub fn lookup(name: &str) -> Result<&'static Preset, MasterError> {
    PRESETS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(name))
        .ok_or_else(|| MasterError::PresetNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("MASTERIFY_V1").unwrap().id, "masterify_v1");
        assert_eq!(lookup("Trap").unwrap().display_name, "Trap");
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = lookup("does_not_exist").unwrap_err();
        assert!(matches!(err, MasterError::PresetNotFound(ref n) if n == "does_not_exist"));
    }

    #[test]
    fn catalog_ids_are_unique() {
        let mut ids: Vec<_> = all().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn masterify_v1_bass_settings() {
        let preset = lookup("masterify_v1").unwrap();
        let bass = preset.bass_processing.unwrap();
        assert_eq!(bass.split_hz, 120.0);
        assert!(bass.kick_preservation);
        assert_eq!(preset.compression.mode, CompressionMode::MakeupGain);
        assert_eq!(preset.eq_bands[0], ("30Hz", 0.3));
    }

    #[test]
    fn classic_presets_compress_per_sample() {
        for id in ["clean", "warm", "lofi", "trap", "bright"] {
            assert_eq!(lookup(id).unwrap().compression.mode, CompressionMode::PerSample);
        }
    }

    #[test]
    fn amounts_are_in_unit_range() {
        for preset in all() {
            for amount in [preset.harmonic_exciter, preset.analog_warmth, preset.spatial_enhancement]
                .into_iter()
                .flatten()
            {
                assert!((0.0..=1.0).contains(&amount), "{}", preset.id);
            }
        }
    }
}
