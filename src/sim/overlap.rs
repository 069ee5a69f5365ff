//! Overlap correction for interpenetrating pairs
//!
//! Positions advance in discrete steps, so a collision is usually first
//! seen after the balls already overlap. The pair is moved back along its
//! current velocities until the balls just touch, resolved there, then moved
//! forward again with the new velocities.
//!
//! ```text
//!   detected          rewound         resolved + re-advanced
//!    (●●)      ->     (●)(●)     ->     (●)   (●)
//!   overlap           contact           separating
//! ```

use super::collision::does_collide;
use super::state::Ball;

/// Move both balls along their velocities by `dt` (negative moves back)
#[inline]
pub fn shift(a: &mut Ball, b: &mut Ball, dt: f64) {
    a.pos += a.vel * dt;
    b.pos += b.vel * dt;
}

/// Step both balls back in `increment` time units until they no longer
/// overlap, giving up after `max_steps`
///
/// Returns the number of increments applied.
pub fn rewind(a: &mut Ball, b: &mut Ball, increment: f64, max_steps: u32) -> u32 {
    let mut steps = 0;
    while does_collide(a, b) && steps < max_steps {
        shift(a, b, -increment);
        steps += 1;
    }
    if steps == max_steps && does_collide(a, b) {
        log::warn!(
            "Overlap not cleared after {} rewind steps (distance {:.6}, contact {:.6})",
            steps,
            a.pos.distance(b.pos),
            a.radius() + b.radius()
        );
    }
    steps
}

/// Re-apply `steps` increments using the balls' current velocities
#[inline]
pub fn advance(a: &mut Ball, b: &mut Ball, steps: u32, increment: f64) {
    shift(a, b, steps as f64 * increment);
}

/// Time to move the pair back along straight-line motion until the balls
/// just touch
///
/// Zero when the balls do not overlap, `None` when they have no relative
/// motion to undo.
pub fn time_of_impact(a: &Ball, b: &Ball) -> Option<f64> {
    let offset = b.pos - a.pos;
    let rel_vel = b.vel - a.vel;
    let contact = a.radius() + b.radius();

    // |offset - rel_vel * t|^2 = contact^2
    let c = offset.length_squared() - contact * contact;
    if c >= 0.0 {
        return Some(0.0);
    }
    let a2 = rel_vel.length_squared();
    if a2 < 1e-18 {
        return None;
    }
    let half_b = offset.dot(rel_vel);
    // c < 0 keeps the discriminant positive and the larger root positive
    let t = (half_b + (half_b * half_b - a2 * c).sqrt()) / a2;
    Some(t.max(0.0))
}
