//! Ball-ball collision detection and response
//!
//! Response is a 1D elastic collision along the line of centers. The
//! velocity component perpendicular to that line is untouched (frictionless,
//! no spin).

use super::overlap;
use super::state::Ball;
use crate::settings::{ContactMode, Settings};
use crate::{Polar, project};

/// Parallel speeds along the collision axis, before and after
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExchange {
    /// Direction from the first ball's center to the second's (degrees)
    pub axis_angle: f64,
    pub before: (f64, f64),
    pub after: (f64, f64),
}

/// A resolved pair contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Simulation time the pair was moved back before resolving
    pub rewound: f64,
    pub exchange: AxisExchange,
}

/// Circles strictly overlap (tangency is not a collision)
#[inline]
pub fn does_collide(a: &Ball, b: &Ball) -> bool {
    a.pos.distance(b.pos) < a.radius() + b.radius()
}

/// Centers are getting closer
#[inline]
pub fn is_approaching(a: &Ball, b: &Ball) -> bool {
    (b.vel - a.vel).dot(b.pos - a.pos) < 0.0
}

/// Replace both velocities with their post-collision values
///
/// Momentum along the axis is conserved and the relative speed along it
/// reverses exactly (restitution 1).
pub fn resolve_elastic(a: &mut Ball, b: &mut Ball) -> AxisExchange {
    let axis = b.pos - a.pos;
    let u1 = project(a.vel, axis);
    let u2 = project(b.vel, axis);
    let (m1, m2) = (a.mass(), b.mass());

    // m1*v1 + m2*v2 = m1*u1 + m2*u2
    // v2 - v1 = -(u2 - u1)
    let momentum = m1 * u1.magnitude + m2 * u2.magnitude;
    let separation = u1.magnitude - u2.magnitude;
    let v1 = (momentum - m2 * separation) / (m1 + m2);
    let v2 = separation + v1;

    a.vel = a.vel - u1.to_rect() + Polar::new(v1, u1.angle).to_rect();
    b.vel = b.vel - u2.to_rect() + Polar::new(v2, u2.angle).to_rect();

    AxisExchange {
        axis_angle: u1.angle,
        before: (u1.magnitude, u2.magnitude),
        after: (v1, v2),
    }
}

/// Detect, correct overlap and resolve one pair
///
/// Only overlapping pairs whose centers are approaching are resolved. A
/// separating overlap is left alone so the balls can drift apart.
pub fn collide_pair(a: &mut Ball, b: &mut Ball, settings: &Settings) -> Option<Contact> {
    if !does_collide(a, b) {
        return None;
    }
    if !is_approaching(a, b) {
        log::trace!("Skipping separating overlap");
        return None;
    }

    let (rewound, exchange) = match settings.contact_mode {
        ContactMode::Rewind => {
            let steps = overlap::rewind(a, b, settings.overlap_step, settings.max_rewind_steps);
            let exchange = resolve_elastic(a, b);
            overlap::advance(a, b, steps, settings.overlap_step);
            (steps as f64 * settings.overlap_step, exchange)
        }
        ContactMode::TimeOfImpact => {
            let t = overlap::time_of_impact(a, b).unwrap_or(0.0);
            overlap::shift(a, b, -t);
            let exchange = resolve_elastic(a, b);
            overlap::shift(a, b, t);
            (t, exchange)
        }
    };

    log::debug!(
        "Collision at {:.1} deg: {:.4},{:.4} -> {:.4},{:.4} (rewound {:.4})",
        exchange.axis_angle,
        exchange.before.0,
        exchange.before.1,
        exchange.after.0,
        exchange.after.1,
        rewound
    );

    Some(Contact { rewound, exchange })
}
