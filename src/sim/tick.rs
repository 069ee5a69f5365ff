//! One simulation tick
//!
//! Balls are processed in ascending index order. For ball `i`: resolve its
//! walls, resolve it against every ball `j > i`, apply gravity, integrate.
//! Later pairs see the state left by earlier pairs in the same tick.

use super::border::{confine, resolve_border};
use super::collision::collide_pair;
use super::state::{Ball, World, WorldEvent};

/// Accelerate vertically
#[inline]
pub fn apply_gravity(ball: &mut Ball, gravity: f64, dt: f64) {
    ball.vel.y += gravity * dt;
}

/// Advance position with the already updated velocity (semi-implicit Euler)
#[inline]
pub fn integrate(ball: &mut Ball, dt: f64) {
    ball.pos += ball.vel * dt;
}

/// Advance the world by `dt`
///
/// Non-positive or non-finite `dt` leaves the world untouched.
pub fn step(world: &mut World, dt: f64) {
    if !(dt > 0.0 && dt.is_finite()) {
        log::warn!("Ignoring step with dt = {}", dt);
        return;
    }

    let settings = *world.settings();
    let (width, height) = (world.width(), world.height());
    let count = world.balls.len();
    world.events.clear();

    for i in 0..count {
        // --- WALLS ---
        {
            let ball = &mut world.balls[i];
            let hits = resolve_border(ball, width, height, settings.wall_restitution);
            for hit in hits.into_iter().flatten() {
                log::debug!(
                    "Ball {} hit {:?}: {:.4} -> {:.4}",
                    i,
                    hit.wall,
                    hit.before,
                    hit.after
                );
                world.events.push(WorldEvent::WallBounce {
                    ball: i,
                    wall: hit.wall,
                    before: hit.before,
                    after: hit.after,
                });
            }
        }

        // --- PAIRS (each unordered pair once) ---
        for j in (i + 1)..count {
            let (head, tail) = world.balls.split_at_mut(j);
            if let Some(contact) = collide_pair(&mut head[i], &mut tail[0], &settings) {
                world.events.push(WorldEvent::BallCollision {
                    first: i,
                    second: j,
                    rewound: contact.rewound,
                });
            }
        }

        // --- GRAVITY + INTEGRATION ---
        let ball = &mut world.balls[i];
        apply_gravity(ball, settings.gravity, dt);
        integrate(ball, dt);
        confine(ball, width, height);
    }

    world.time += dt;
    world.step_count += 1;
}
