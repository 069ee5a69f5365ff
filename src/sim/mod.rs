//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ball index)
//! - No rendering or platform dependencies

pub mod border;
pub mod collision;
pub mod overlap;
pub mod state;
pub mod tick;

pub use border::{WallHit, confine, resolve_border};
pub use collision::{AxisExchange, Contact, collide_pair, does_collide, is_approaching, resolve_elastic};
pub use overlap::{advance, rewind, shift, time_of_impact};
pub use state::{Ball, Wall, World, WorldError, WorldEvent, default_balls};
pub use tick::{apply_gravity, integrate, step};
