//! Ball against the four domain walls
//!
//! Each axis is handled independently: the ball is clamped back inside and
//! the velocity component pointing into the wall is reflected and damped.

use super::state::{Ball, Wall};

/// A reflected velocity component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall: Wall,
    pub before: f64,
    pub after: f64,
}

/// Legal centre range `[radius, extent - radius]` on one axis
///
/// A ball wider than the extent has no legal range; it is pinned to the
/// middle of the axis instead.
#[inline]
fn axis_bounds(radius: f64, extent: f64) -> (f64, f64) {
    let (low, high) = (radius, extent - radius);
    if high < low {
        let mid = 0.5 * extent;
        (mid, mid)
    } else {
        (low, high)
    }
}

/// Clamp one coordinate into its legal range, reflecting `vel` if it points
/// into the touched wall
fn resolve_axis(
    pos: &mut f64,
    vel: &mut f64,
    radius: f64,
    extent: f64,
    restitution: f64,
    walls: (Wall, Wall),
) -> Option<WallHit> {
    let (low_wall, high_wall) = walls;
    let (low, high) = axis_bounds(radius, extent);

    let wall = if *pos <= low && *vel < 0.0 {
        *pos = low;
        low_wall
    } else if *pos >= high && *vel > 0.0 {
        *pos = high;
        high_wall
    } else {
        // Outside but already heading back in
        *pos = pos.clamp(low, high);
        return None;
    };

    let before = *vel;
    *vel = -before * restitution;
    Some(WallHit {
        wall,
        before,
        after: *vel,
    })
}

/// Resolve wall contacts for one ball
///
/// Returns the reflected components, horizontal first.
pub fn resolve_border(
    ball: &mut Ball,
    width: f64,
    height: f64,
    restitution: f64,
) -> [Option<WallHit>; 2] {
    let radius = ball.radius();
    let horizontal = resolve_axis(
        &mut ball.pos.x,
        &mut ball.vel.x,
        radius,
        width,
        restitution,
        (Wall::Left, Wall::Right),
    );
    let vertical = resolve_axis(
        &mut ball.pos.y,
        &mut ball.vel.y,
        radius,
        height,
        restitution,
        (Wall::Bottom, Wall::Top),
    );
    [horizontal, vertical]
}

/// Clamp a ball's position into the legal rectangle without touching its
/// velocity
#[inline]
pub fn confine(ball: &mut Ball, width: f64, height: f64) {
    let radius = ball.radius();
    let (low, high) = axis_bounds(radius, width);
    ball.pos.x = ball.pos.x.clamp(low, high);
    let (low, high) = axis_bounds(radius, height);
    ball.pos.y = ball.pos.y.clamp(low, high);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn ball(x: f64, y: f64, vx: f64, vy: f64) -> Ball {
        Ball::new(DVec2::new(x, y), DVec2::new(vx, vy), 0.2)
    }

    #[test]
    fn test_inside_untouched() {
        let mut b = ball(2.0, 1.5, 3.0, -1.0);
        let hits = resolve_border(&mut b, 4.0, 3.0, 0.95);
        assert_eq!(hits, [None, None]);
        assert_eq!(b.pos, DVec2::new(2.0, 1.5));
        assert_eq!(b.vel, DVec2::new(3.0, -1.0));
    }

    #[test]
    fn test_floor_bounce_damped() {
        let mut b = ball(1.0, 0.1, 0.5, -4.0);
        let [horizontal, vertical] = resolve_border(&mut b, 4.0, 3.0, 0.95);
        assert!(horizontal.is_none());
        let hit = vertical.unwrap();
        assert_eq!(hit.wall, Wall::Bottom);
        assert_eq!(hit.before, -4.0);
        assert!((hit.after - 3.8).abs() < 1e-12);
        assert_eq!(b.pos.y, 0.2);
        // Horizontal velocity unaffected
        assert_eq!(b.vel.x, 0.5);
    }

    #[test]
    fn test_right_and_top_walls() {
        let mut b = ball(3.95, 2.9, 2.0, 1.0);
        let [horizontal, vertical] = resolve_border(&mut b, 4.0, 3.0, 1.0);
        assert_eq!(horizontal.unwrap().wall, Wall::Right);
        assert_eq!(vertical.unwrap().wall, Wall::Top);
        assert_eq!(b.pos, DVec2::new(4.0 - 0.2, 3.0 - 0.2));
        assert_eq!(b.vel, DVec2::new(-2.0, -1.0));
    }

    #[test]
    fn test_resting_on_wall_counts_as_contact() {
        // Exactly at the bound and still moving into it
        let mut b = ball(0.2, 1.0, -1.0, 0.0);
        let [horizontal, _] = resolve_border(&mut b, 4.0, 3.0, 0.95);
        assert_eq!(horizontal.unwrap().wall, Wall::Left);
        assert!((b.vel.x - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_leaving_wall_not_reflected_again() {
        let mut b = ball(0.1, 1.0, 2.0, 0.0);
        let hits = resolve_border(&mut b, 4.0, 3.0, 0.95);
        assert_eq!(hits, [None, None]);
        assert_eq!(b.pos.x, 0.2);
        assert_eq!(b.vel.x, 2.0);
    }

    #[test]
    fn test_confine() {
        let mut b = ball(-1.0, 5.0, -3.0, 3.0);
        confine(&mut b, 4.0, 3.0);
        assert_eq!(b.pos, DVec2::new(0.2, 3.0 - 0.2));
        assert_eq!(b.vel, DVec2::new(-3.0, 3.0));
    }

    #[test]
    fn test_oversized_ball_pinned_to_middle() {
        // Diameter 3.2 fits the width but not the height
        let mut b = Ball::new(DVec2::new(2.5, 0.4), DVec2::new(0.0, -2.0), 1.6);
        let [horizontal, vertical] = resolve_border(&mut b, 4.0, 3.0, 0.95);
        assert!(horizontal.is_none());
        assert_eq!(vertical.unwrap().wall, Wall::Bottom);
        assert_eq!(b.pos.y, 1.5);
        assert!((b.vel.y - 1.9).abs() < 1e-12);

        b.pos = DVec2::new(-3.0, 9.0);
        confine(&mut b, 4.0, 3.0);
        assert_eq!(b.pos, DVec2::new(1.6, 1.5));
    }
}
