//! Physics settings
//!
//! Loaded from a JSON file by native drivers; every field has a default
//! matching the reference simulation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::WorldError;

/// How overlapping balls are moved back to the moment of contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactMode {
    /// Step both balls backward in `overlap_step` increments until they
    /// separate, then re-advance the same count with the new velocities
    #[default]
    Rewind,
    /// Solve for the exact back-off time along straight-line motion
    TimeOfImpact,
}

impl ContactMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMode::Rewind => "rewind",
            ContactMode::TimeOfImpact => "time_of_impact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rewind" => Some(ContactMode::Rewind),
            "time_of_impact" | "toi" => Some(ContactMode::TimeOfImpact),
            _ => None,
        }
    }
}

/// Physics tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vertical acceleration (negative pulls toward y = 0)
    pub gravity: f64,
    /// Speed kept after a wall bounce (1.0 = no loss)
    pub wall_restitution: f64,
    /// Mass per squared radius
    pub mass_density: f64,

    // === Overlap correction ===
    pub contact_mode: ContactMode,
    /// Rewind increment, in simulation time units
    pub overlap_step: f64,
    /// Rewind cap per pair
    pub max_rewind_steps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            wall_restitution: WALL_RESTITUTION,
            mass_density: MASS_DENSITY,

            contact_mode: ContactMode::Rewind,
            overlap_step: OVERLAP_STEP,
            max_rewind_steps: MAX_REWIND_STEPS,
        }
    }
}

impl Settings {
    /// Settings with a different overlap correction
    pub fn with_contact_mode(mut self, mode: ContactMode) -> Self {
        self.contact_mode = mode;
        self
    }

    /// Perfectly elastic walls (velocity is only negated)
    pub fn with_elastic_walls(mut self) -> Self {
        self.wall_restitution = 1.0;
        self
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::info!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

/// Failure to load a settings or scenario file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(WorldError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "cannot read file: {}", err),
            ConfigError::Parse(err) => write!(f, "invalid JSON: {}", err),
            ConfigError::Invalid(err) => write!(f, "invalid world: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<WorldError> for ConfigError {
    fn from(err: WorldError) -> Self {
        ConfigError::Invalid(err)
    }
}
