//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. The module is headless and, for a fixed
//! seed and tick count, deterministic:
//! - One tick per display frame (frame-stepped, no dt)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod ring;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use ring::{Ring, RingAction};
pub use state::{SimEvent, SimState};
pub use tick::tick;
