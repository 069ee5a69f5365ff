//! Bouncing Balls - a 2D rigid-ball simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, borders, collisions, integration)
//! - `settings`: Physics tuning loaded from JSON
//! - `scenario`: Domain size, initial population and run length for a driver
//!
//! Angles handled by the helpers in this module are in degrees. Conversion to
//! radians happens only at the trigonometric call sites.

pub mod scenario;
pub mod settings;
pub mod sim;

pub use scenario::{BallSpec, Population, Scenario};
pub use settings::{ConfigError, ContactMode, Settings};
pub use sim::{Ball, World, WorldError, WorldEvent, step};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Simulation constants
pub mod consts {
    /// Downward gravitational acceleration (+y is up)
    pub const GRAVITY: f64 = -9.81;
    /// Fraction of speed kept after bouncing off a wall
    pub const WALL_RESTITUTION: f64 = 0.95;
    /// Mass per squared radius (mass = k * r^2)
    pub const MASS_DENSITY: f64 = 10.0;

    /// Time increment used when rewinding overlapping balls
    pub const OVERLAP_STEP: f64 = 0.001;
    /// Upper bound on rewind increments for a single pair
    pub const MAX_REWIND_STEPS: u32 = 10_000;

    /// Default domain
    pub const DEFAULT_WIDTH: f64 = 4.0;
    pub const DEFAULT_HEIGHT: f64 = 3.0;
    /// Default driver timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
}

/// A vector in polar form: magnitude and angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    pub magnitude: f64,
    /// Degrees, counter-clockwise from +x
    pub angle: f64,
}

impl Polar {
    pub const fn new(magnitude: f64, angle: f64) -> Self {
        Self { magnitude, angle }
    }

    /// Back to rectangular form
    #[inline]
    pub fn to_rect(self) -> DVec2 {
        polar_to_rect(self.magnitude, self.angle)
    }
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert cartesian (x, y) to polar (magnitude, degrees in [0, 360))
///
/// Vertical vectors map to 90 or 270 degrees. The zero vector maps to
/// `(0, 0)`.
#[inline]
pub fn rect_to_polar(v: DVec2) -> Polar {
    Polar {
        magnitude: v.length(),
        angle: normalize_degrees(v.y.atan2(v.x).to_degrees()),
    }
}

/// Convert polar (magnitude, degrees) to cartesian (x, y)
#[inline]
pub fn polar_to_rect(magnitude: f64, angle: f64) -> DVec2 {
    let theta = angle.to_radians();
    DVec2::new(magnitude * theta.cos(), magnitude * theta.sin())
}

/// Signed component of `v` along `axis`, anchored at the axis angle
///
/// A negative magnitude means `v` points away from the axis direction.
/// A zero axis is treated as +x.
pub fn project(v: DVec2, axis: DVec2) -> Polar {
    let v = rect_to_polar(v);
    let axis = rect_to_polar(axis);
    Polar {
        magnitude: v.magnitude * (v.angle - axis.angle).to_radians().cos(),
        angle: axis.angle,
    }
}
