//! Scenario description for drivers
//!
//! A scenario names the domain, the physics settings, how the initial
//! population is produced and how long to run. Stored as JSON:
//!
//! ```json
//! {
//!   "width": 4.0,
//!   "height": 3.0,
//!   "settings": { "wall_restitution": 1.0 },
//!   "population": { "kind": "random", "count": 20, "seed": 7 },
//!   "dt": 0.016666,
//!   "steps": 600
//! }
//! ```

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::{ConfigError, Settings};
use crate::sim::{Ball, World, WorldError, default_balls};

/// Initial state of one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    pub pos: DVec2,
    #[serde(default)]
    pub vel: DVec2,
    pub radius: f64,
}

/// Where the starting balls come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Population {
    /// The built-in two-ball set
    #[default]
    Default,
    Explicit { balls: Vec<BallSpec> },
    Random {
        count: usize,
        #[serde(default)]
        seed: u64,
        #[serde(default = "default_min_radius")]
        min_radius: f64,
        #[serde(default = "default_max_radius")]
        max_radius: f64,
        #[serde(default = "default_max_speed")]
        max_speed: f64,
    },
}

fn default_min_radius() -> f64 {
    0.1
}

fn default_max_radius() -> f64 {
    0.3
}

fn default_max_speed() -> f64 {
    2.0
}

fn default_dt() -> f64 {
    SIM_DT
}

fn default_steps() -> u64 {
    600
}

/// A complete run description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub population: Population,
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_steps")]
    pub steps: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            settings: Settings::default(),
            population: Population::Default,
            dt: default_dt(),
            steps: default_steps(),
        }
    }
}

impl Scenario {
    /// Load a scenario from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let scenario = serde_json::from_str(&json)?;
        log::info!("Loaded scenario from {}", path.as_ref().display());
        Ok(scenario)
    }

    /// Build the starting world, validating dimensions and balls
    pub fn build_world(&self) -> Result<World, WorldError> {
        let balls = match &self.population {
            Population::Default => default_balls(self.width, self.height)
                .into_iter()
                .map(|b| {
                    Ball::with_density(b.pos, b.vel, b.radius(), self.settings.mass_density)
                })
                .collect(),
            Population::Explicit { balls } => balls
                .iter()
                .map(|spec| {
                    Ball::with_density(spec.pos, spec.vel, spec.radius, self.settings.mass_density)
                })
                .collect(),
            Population::Random {
                count,
                seed,
                min_radius,
                max_radius,
                max_speed,
            } => {
                return World::try_random(
                    self.width,
                    self.height,
                    *count,
                    *seed,
                    (*min_radius, *max_radius),
                    *max_speed,
                    self.settings,
                );
            }
        };
        World::try_new(self.width, self.height, balls, self.settings)
    }
}
