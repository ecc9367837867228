//! Game balance tuning
//!
//! Loaded from JSON; any missing field takes its default value.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Relaxed,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Relaxed => "Relaxed",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(DifficultyPreset::Relaxed),
            "normal" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Multiplier on the withdrawal gain rate
    pub fn withdrawal_scale(&self) -> f32 {
        match self {
            DifficultyPreset::Relaxed => 0.6,
            DifficultyPreset::Normal => 1.0,
            DifficultyPreset::Hard => 1.4,
        }
    }

    /// Cap on the distance-based world speed bonus
    pub fn speed_bonus_cap(&self) -> f32 {
        match self {
            DifficultyPreset::Relaxed => 0.4,
            DifficultyPreset::Normal => 0.6,
            DifficultyPreset::Hard => 0.8,
        }
    }
}

/// Relative weights of the three chunk patterns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternWeights {
    pub flat: u32,
    pub gap: u32,
    pub platform: u32,
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            flat: 45,
            gap: 20,
            platform: 35,
        }
    }
}

impl PatternWeights {
    /// Sum of the weights, saturating at `u32::MAX`
    pub fn total(&self) -> u32 {
        self.flat.saturating_add(self.gap).saturating_add(self.platform)
    }

    /// Sum of the weights, `None` on overflow
    pub fn checked_total(&self) -> Option<u32> {
        self.flat.checked_add(self.gap)?.checked_add(self.platform)
    }
}

/// Balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: DifficultyPreset,

    // === Player ===
    /// Base run speed (px/s)
    pub base_speed: f32,
    pub max_health: u8,
    /// Withdrawal gained per second
    pub withdrawal_rate: f32,
    pub max_withdrawal: f32,
    /// Withdrawal removed by one weed pickup
    pub weed_relief: f32,
    /// Speed-ramp gain per second of survival
    pub speed_ramp_rate: f32,
    pub max_speed_boost: f32,

    // === Generation ===
    pub gap_min: u32,
    pub gap_max: u32,
    pub pattern_weights: PatternWeights,
    /// Distance units travelled before the first gap may appear
    pub gap_free_distance: u32,
    /// Camera travel (px) before aerial enemies appear
    pub aerial_distance: f32,
    /// Seconds between attacker spawn attempts
    pub attacker_cooldown: f32,
    /// Chance that an attacker spawn attempt succeeds
    pub attacker_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            difficulty: DifficultyPreset::Normal,

            base_speed: 350.0,
            max_health: 3,
            withdrawal_rate: 3.0,
            max_withdrawal: 100.0,
            weed_relief: 15.0,
            speed_ramp_rate: 2.0,
            max_speed_boost: 300.0,

            gap_min: 150,
            gap_max: 190,
            pattern_weights: PatternWeights::default(),
            gap_free_distance: 5,
            aerial_distance: 5000.0,
            attacker_cooldown: 60.0,
            attacker_chance: 0.6,
        }
    }
}

impl Tuning {
    /// Create tuning from a difficulty preset (other values default)
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            difficulty: preset,
            ..Self::default()
        }
    }

    /// Withdrawal gain per second after the preset scale
    pub fn effective_withdrawal_rate(&self) -> f32 {
        self.withdrawal_rate * self.difficulty.withdrawal_scale()
    }

    /// Parse and validate tuning from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!(
                    "Using default tuning ({}: {})",
                    path.as_ref().display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the generator and controller cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.gap_min == 0 || self.gap_min > self.gap_max {
            return Err(TuningError::Invalid {
                field: "gap_min",
                reason: "gap band must be non-empty and start above zero",
            });
        }
        match self.pattern_weights.checked_total() {
            None => {
                return Err(TuningError::Invalid {
                    field: "pattern_weights",
                    reason: "weights must sum to at most u32::MAX",
                });
            }
            Some(0) => {
                return Err(TuningError::Invalid {
                    field: "pattern_weights",
                    reason: "at least one pattern needs a positive weight",
                });
            }
            Some(_) => {}
        }
        if self.max_health == 0 {
            return Err(TuningError::Invalid {
                field: "max_health",
                reason: "must be at least 1",
            });
        }
        if self.max_withdrawal <= 0.0 {
            return Err(TuningError::Invalid {
                field: "max_withdrawal",
                reason: "must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.attacker_chance) {
            return Err(TuningError::Invalid {
                field: "attacker_chance",
                reason: "must be a probability",
            });
        }
        Ok(())
    }
}

/// Errors raised while loading tuning
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read tuning file: {err}"),
            Self::Parse(err) => write!(f, "malformed tuning JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "base_speed": 400.0 }"#).unwrap();
        assert_eq!(tuning.base_speed, 400.0);
        assert_eq!(tuning.gap_min, 150);
        assert_eq!(tuning.pattern_weights.total(), 100);
    }

    #[test]
    fn test_inverted_gap_band_rejected() {
        let err = Tuning::from_json_str(r#"{ "gap_min": 200, "gap_max": 100 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "gap_min", .. }));
    }

    #[test]
    fn test_overflowing_pattern_weights_rejected() {
        let json = r#"{ "pattern_weights": { "flat": 4294967295, "gap": 1, "platform": 0 } }"#;
        let err = Tuning::from_json_str(json).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "pattern_weights", .. }));

        let weights = PatternWeights {
            flat: u32::MAX,
            gap: 1,
            platform: 0,
        };
        assert_eq!(weights.total(), u32::MAX);
        assert_eq!(weights.checked_total(), None);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Tuning::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("/nonexistent/street-runner/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_roundtrip_through_json() {
        let tuning = Tuning::from_preset(DifficultyPreset::Hard);
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json_str(&json).unwrap(), tuning);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(DifficultyPreset::parse("EASY"), Some(DifficultyPreset::Relaxed));
        assert_eq!(DifficultyPreset::parse("hard"), Some(DifficultyPreset::Hard));
        assert_eq!(DifficultyPreset::parse("brutal"), None);
    }
}
