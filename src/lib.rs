//! Ring Chime - a concentric-ring escape toy
//!
//! A stack of rotating rings, each with one angular gap, encloses a handful of
//! bouncing balls. When a ball slips through the innermost ring's gap that
//! ring retires and the next one becomes the barrier; every ring contact
//! advances a cursor over a note sequence, so the breakout plays a melody.
//!
//! Core modules:
//! - `sim`: frame-stepped simulation (balls, rings, collision, events)
//! - `tuning`: data-driven gameplay constants
//! - `score`: note sequences the host maps events onto for playback
//!
//! The crate is headless. It computes angles and points; rendering and audio
//! synthesis are host concerns fed from [`sim::SimState`] accessors and the
//! events returned by [`sim::tick`].

pub mod score;
pub mod sim;
pub mod tuning;

pub use score::{Note, Score};
pub use sim::{Ball, Ring, RingAction, SimEvent, SimState, tick};
pub use tuning::{RotationMode, Tuning};

use glam::DVec2;

/// Display palette shared by balls and rings (hex RGB, cycled by index).
pub const PALETTE: [&str; 16] = [
    "#FF5733", "#33FF57", "#3357FF", "#FF33A1", "#FF33D4", "#33FFD4",
    "#D4FF33", "#D433FF", "#FF8C33", "#33FF8C", "#8C33FF", "#FF338C",
    "#FF8C33", "#33FF8C", "#8C33FF", "#FF338C",
];

/// Convert polar (r, theta) around `center` to a cartesian point
#[inline]
pub fn polar_to_cartesian(center: DVec2, r: f64, theta: f64) -> DVec2 {
    center + r * DVec2::new(theta.cos(), theta.sin())
}
