//! World state and core simulation types
//!
//! The world exclusively owns its balls. Population is fixed after
//! construction; balls are mutated in place every step.

use std::fmt;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;

/// A circular point mass
///
/// Serialize-only: mass is derived from the radius, so balls are built
/// through [`Ball::new`] or [`Ball::with_density`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    /// Center position
    pub pos: DVec2,
    pub vel: DVec2,
    radius: f64,
    /// Cached `density * radius^2`
    mass: f64,
}

impl Ball {
    /// Create a ball using the reference mass density
    pub fn new(pos: DVec2, vel: DVec2, radius: f64) -> Self {
        Self::with_density(pos, vel, radius, MASS_DENSITY)
    }

    /// Radius must be positive; [`World::try_new`] rejects balls that are not
    pub fn with_density(pos: DVec2, vel: DVec2, radius: f64, density: f64) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass: density * radius * radius,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// Domain edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Left,
    Right,
    Bottom,
    Top,
}

/// Something that happened during the last step, in processing order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Velocity component normal to `wall` was reflected
    WallBounce {
        ball: usize,
        wall: Wall,
        /// Normal velocity component before the bounce
        before: f64,
        after: f64,
    },
    /// Two balls exchanged momentum along their line of centers
    BallCollision {
        first: usize,
        second: usize,
        /// Simulation time the pair was moved back before resolving
        rewound: f64,
    },
}

/// Invalid world construction input
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    InvalidDimensions { width: f64, height: f64 },
    InvalidRadius { ball: usize, radius: f64 },
    /// Diameter exceeds the domain
    BallTooLarge { ball: usize, radius: f64 },
    NonFiniteState { ball: usize },
    /// Random population parameters that cannot produce valid balls
    InvalidPopulation {
        min_radius: f64,
        max_radius: f64,
        max_speed: f64,
    },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::InvalidDimensions { width, height } => {
                write!(f, "domain must be finite and positive, got {}x{}", width, height)
            }
            WorldError::InvalidRadius { ball, radius } => {
                write!(f, "ball {} has invalid radius {}", ball, radius)
            }
            WorldError::BallTooLarge { ball, radius } => {
                write!(f, "ball {} with radius {} does not fit the domain", ball, radius)
            }
            WorldError::NonFiniteState { ball } => {
                write!(f, "ball {} has a non-finite position or velocity", ball)
            }
            WorldError::InvalidPopulation {
                min_radius,
                max_radius,
                max_speed,
            } => write!(
                f,
                "random population needs 0 < radius and 0 <= speed, got radius {}..{} speed {}",
                min_radius, max_radius, max_speed
            ),
        }
    }
}

impl std::error::Error for WorldError {}

/// Domain plus its ball population
#[derive(Debug, Clone, Serialize)]
pub struct World {
    width: f64,
    height: f64,
    settings: Settings,
    /// Index order fixes pair processing order
    pub(crate) balls: Vec<Ball>,
    /// Accumulated simulation time
    pub(crate) time: f64,
    pub(crate) step_count: u64,
    /// Events from the most recent step
    #[serde(skip)]
    pub(crate) events: Vec<WorldEvent>,
}

impl World {
    /// Create a world with reference settings
    ///
    /// Dimensions and radii must be positive; use [`World::try_new`] to
    /// validate untrusted input. A ball wider than the domain on some axis
    /// is pinned to the middle of that axis.
    pub fn new(width: f64, height: f64, balls: Vec<Ball>) -> Self {
        Self::with_settings(width, height, balls, Settings::default())
    }

    pub fn with_settings(width: f64, height: f64, balls: Vec<Ball>, settings: Settings) -> Self {
        log::info!("World {}x{} with {} balls", width, height, balls.len());
        Self {
            width,
            height,
            settings,
            balls,
            time: 0.0,
            step_count: 0,
            events: Vec::new(),
        }
    }

    /// Validate inputs, then create the world
    pub fn try_new(
        width: f64,
        height: f64,
        balls: Vec<Ball>,
        settings: Settings,
    ) -> Result<Self, WorldError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        for (i, ball) in balls.iter().enumerate() {
            if !(ball.radius.is_finite() && ball.radius > 0.0) {
                return Err(WorldError::InvalidRadius {
                    ball: i,
                    radius: ball.radius,
                });
            }
            if 2.0 * ball.radius > width.min(height) {
                return Err(WorldError::BallTooLarge {
                    ball: i,
                    radius: ball.radius,
                });
            }
            if !(ball.pos.is_finite() && ball.vel.is_finite()) {
                return Err(WorldError::NonFiniteState { ball: i });
            }
        }
        Ok(Self::with_settings(width, height, balls, settings))
    }

    /// The two-ball starting population
    pub fn with_default_balls(width: f64, height: f64) -> Self {
        Self::new(width, height, default_balls(width, height))
    }

    /// Place `count` non-overlapping balls from a seeded generator
    ///
    /// Balls that cannot be placed after repeated attempts are skipped, so
    /// crowded domains may hold fewer than `count`. Non-positive radii drawn
    /// from the range are skipped as well; use [`World::try_random`] to
    /// validate untrusted parameters.
    pub fn random(
        width: f64,
        height: f64,
        count: usize,
        seed: u64,
        radius_range: (f64, f64),
        max_speed: f64,
        settings: Settings,
    ) -> Self {
        let balls = random_balls(width, height, count, seed, radius_range, max_speed, &settings);
        Self::with_settings(width, height, balls, settings)
    }

    /// Validate domain and population parameters, then place balls
    pub fn try_random(
        width: f64,
        height: f64,
        count: usize,
        seed: u64,
        (min_radius, max_radius): (f64, f64),
        max_speed: f64,
        settings: Settings,
    ) -> Result<Self, WorldError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        let radii_ok = min_radius.is_finite() && max_radius.is_finite() && min_radius > 0.0;
        let speed_ok = max_speed.is_finite() && max_speed >= 0.0;
        if !(radii_ok && speed_ok) {
            return Err(WorldError::InvalidPopulation {
                min_radius,
                max_radius,
                max_speed,
            });
        }
        let balls = random_balls(
            width,
            height,
            count,
            seed,
            (min_radius, max_radius),
            max_speed,
            &settings,
        );
        Self::try_new(width, height, balls, settings)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Events recorded by the last call to [`World::step`]
    #[inline]
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Advance by one tick
    pub fn step(&mut self, dt: f64) {
        super::tick::step(self, dt);
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.balls.iter().map(Ball::kinetic_energy).sum()
    }

    pub fn momentum(&self) -> DVec2 {
        self.balls.iter().map(Ball::momentum).sum()
    }
}

/// Ball 0 high on the left, ball 1 lower on the right
pub fn default_balls(width: f64, height: f64) -> Vec<Ball> {
    vec![
        Ball::new(
            DVec2::new(width / 3.0, height * 0.9),
            DVec2::new(1.2, 1.6),
            0.2,
        ),
        Ball::new(
            DVec2::new(2.0 * width / 3.0, height * 0.7),
            DVec2::new(-0.6, 0.6),
            0.3,
        ),
    ]
}

/// Placement attempts per ball before giving up on it
const PLACEMENT_ATTEMPTS: u32 = 64;

fn random_balls(
    width: f64,
    height: f64,
    count: usize,
    seed: u64,
    (min_radius, max_radius): (f64, f64),
    max_speed: f64,
    settings: &Settings,
) -> Vec<Ball> {
    let mut rng = Pcg32::seed_from_u64(seed);
    // `count` is untrusted, grow on demand
    let mut balls: Vec<Ball> = Vec::new();
    let max_radius = max_radius.max(min_radius);

    for i in 0..count {
        let radius = if max_radius > min_radius {
            rng.random_range(min_radius..max_radius)
        } else {
            min_radius
        };
        if !(radius > 0.0) {
            log::warn!("Ball {} radius {} is not positive, skipping", i, radius);
            continue;
        }
        if 2.0 * radius >= width.min(height) {
            log::warn!("Ball {} radius {} does not fit, skipping", i, radius);
            continue;
        }

        let placed = (0..PLACEMENT_ATTEMPTS).find_map(|_| {
            let pos = DVec2::new(
                rng.random_range(radius..width - radius),
                rng.random_range(radius..height - radius),
            );
            let clear = balls
                .iter()
                .all(|other| other.pos.distance(pos) >= other.radius + radius);
            clear.then_some(pos)
        });

        match placed {
            Some(pos) => {
                let speed = if max_speed > 0.0 {
                    rng.random_range(0.0..max_speed)
                } else {
                    0.0
                };
                let heading: f64 = rng.random_range(0.0..360.0);
                let vel = crate::polar_to_rect(speed, heading);
                balls.push(Ball::with_density(pos, vel, radius, settings.mass_density));
            }
            None => log::warn!("No room for ball {} after {} attempts", i, PLACEMENT_ATTEMPTS),
        }
    }

    balls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_from_radius() {
        let ball = Ball::new(DVec2::ZERO, DVec2::ZERO, 0.3);
        assert!((ball.mass() - 0.9).abs() < 1e-12);
        let ball = Ball::with_density(DVec2::ZERO, DVec2::ZERO, 2.0, 1.0);
        assert_eq!(ball.mass(), 4.0);
    }

    #[test]
    fn test_default_balls() {
        let world = World::with_default_balls(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        assert_eq!(world.balls().len(), 2);
        let first = &world.balls()[0];
        assert!((first.pos.x - 4.0 / 3.0).abs() < 1e-12);
        assert!((first.pos.y - 2.7).abs() < 1e-12);
        assert_eq!(first.vel, DVec2::new(1.2, 1.6));
        assert_eq!(first.radius(), 0.2);
        assert_eq!(world.balls()[1].radius(), 0.3);
    }

    #[test]
    fn test_try_new_rejects_bad_input() {
        let ok = Ball::new(DVec2::new(1.0, 1.0), DVec2::ZERO, 0.2);
        assert!(World::try_new(4.0, 3.0, vec![ok.clone()], Settings::default()).is_ok());

        assert!(matches!(
            World::try_new(0.0, 3.0, vec![], Settings::default()),
            Err(WorldError::InvalidDimensions { .. })
        ));

        let mut flat = ok.clone();
        flat.radius = 0.0;
        assert!(matches!(
            World::try_new(4.0, 3.0, vec![ok.clone(), flat], Settings::default()),
            Err(WorldError::InvalidRadius { ball: 1, .. })
        ));

        let huge = Ball::new(DVec2::new(1.0, 1.0), DVec2::ZERO, 2.0);
        assert!(matches!(
            World::try_new(4.0, 3.0, vec![huge], Settings::default()),
            Err(WorldError::BallTooLarge { ball: 0, .. })
        ));

        let mut lost = ok;
        lost.vel = DVec2::new(f64::NAN, 0.0);
        assert!(matches!(
            World::try_new(4.0, 3.0, vec![lost], Settings::default()),
            Err(WorldError::NonFiniteState { ball: 0 })
        ));
    }

    #[test]
    fn test_random_world_is_seeded() {
        let a = World::random(4.0, 3.0, 12, 7, (0.05, 0.15), 2.0, Settings::default());
        let b = World::random(4.0, 3.0, 12, 7, (0.05, 0.15), 2.0, Settings::default());
        assert_eq!(a.balls(), b.balls());

        let c = World::random(4.0, 3.0, 12, 8, (0.05, 0.15), 2.0, Settings::default());
        assert_ne!(a.balls(), c.balls());
    }

    #[test]
    fn test_random_world_has_no_overlap() {
        let world = World::random(4.0, 3.0, 20, 42, (0.05, 0.2), 1.0, Settings::default());
        let balls = world.balls();
        for (i, a) in balls.iter().enumerate() {
            assert!(a.pos.x >= a.radius() && a.pos.x <= 4.0 - a.radius());
            assert!(a.pos.y >= a.radius() && a.pos.y <= 3.0 - a.radius());
            for b in &balls[i + 1..] {
                assert!(a.pos.distance(b.pos) >= a.radius() + b.radius());
            }
        }
    }

    #[test]
    fn test_try_random_rejects_bad_population() {
        let settings = Settings::default();
        assert!(matches!(
            World::try_random(4.0, 3.0, 8, 1, (-0.3, 0.1), 1.0, settings),
            Err(WorldError::InvalidPopulation { .. })
        ));
        assert!(matches!(
            World::try_random(4.0, 3.0, 8, 1, (0.0, 0.1), 1.0, settings),
            Err(WorldError::InvalidPopulation { .. })
        ));
        assert!(matches!(
            World::try_random(4.0, 3.0, 8, 1, (0.05, f64::INFINITY), 1.0, settings),
            Err(WorldError::InvalidPopulation { .. })
        ));
        assert!(matches!(
            World::try_random(4.0, 3.0, 8, 1, (0.05, 0.1), -1.0, settings),
            Err(WorldError::InvalidPopulation { .. })
        ));
        assert!(matches!(
            World::try_random(f64::NAN, 3.0, 8, 1, (0.05, 0.1), 1.0, settings),
            Err(WorldError::InvalidDimensions { .. })
        ));

        let world = World::try_random(4.0, 3.0, 8, 1, (0.05, 0.1), 1.0, settings).unwrap();
        assert_eq!(world.balls().len(), 8);
    }

    #[test]
    fn test_random_skips_non_positive_radii() {
        let world = World::random(4.0, 3.0, 8, 1, (-0.3, 0.1), 1.0, Settings::default());
        for ball in world.balls() {
            assert!(ball.radius() > 0.0);
            assert!(ball.pos.x >= ball.radius() && ball.pos.x <= 4.0 - ball.radius());
            assert!(ball.pos.y >= ball.radius() && ball.pos.y <= 3.0 - ball.radius());
        }
    }

    #[test]
    fn test_random_large_count_without_room() {
        // Every ball is too wide, nothing is placed or reserved up front
        let world = World::random(4.0, 3.0, 1 << 20, 3, (2.0, 2.0), 1.0, Settings::default());
        assert!(world.balls().is_empty());
    }

    #[test]
    fn test_serialized_ball_mass_matches_radius() {
        let ball = Ball::with_density(DVec2::new(1.0, 2.0), DVec2::new(0.5, 0.0), 0.3, 2.0);
        let json = serde_json::to_value(&ball).unwrap();
        assert_eq!(json["pos"], serde_json::json!([1.0, 2.0]));
        assert_eq!(json["radius"], serde_json::json!(0.3));
        let mass = json["mass"].as_f64().unwrap();
        assert!((mass - 2.0 * 0.3 * 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_energy_and_momentum() {
        let world = World::new(
            4.0,
            3.0,
            vec![
                Ball::new(DVec2::new(1.0, 1.0), DVec2::new(1.0, 0.0), 0.1),
                Ball::new(DVec2::new(2.0, 1.0), DVec2::new(0.0, -2.0), 0.1),
            ],
        );
        // mass 0.1 each
        assert!((world.kinetic_energy() - (0.05 + 0.2)).abs() < 1e-12);
        let p = world.momentum();
        assert!((p.x - 0.1).abs() < 1e-12);
        assert!((p.y + 0.2).abs() < 1e-12);
    }
}
