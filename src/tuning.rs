//! Data-driven gameplay tuning
//!
//! Every constant the simulation reads lives here, so hosts can rebalance the
//! toy from a JSON file instead of recompiling. Missing fields fall back to
//! the defaults.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// How the ring rotation accumulator advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RotationMode {
    /// Advance once per ball processed; ring speed scales with ball count
    #[default]
    PerBall,
    /// Advance once per tick regardless of ball count
    PerTick,
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Base ball launch speed (pixels per tick)
    pub speed: f64,
    /// Per-component velocity bound
    pub speed_max: f64,
    /// Downward acceleration added to dy every tick
    pub gravity: f64,
    /// Number of concentric rings
    pub ring_count: usize,
    /// Radius of the innermost ring
    pub start_radius: f64,
    /// Radial spacing between rings
    pub ring_spacing: f64,
    /// Ball radius
    pub ball_radius: f64,
    /// Number of balls spawned at startup
    pub ball_count: usize,
    /// Ring rotation increment per accumulator step (radians)
    pub rotation_speed: f64,
    /// Outward energy boost scale for bounces off larger rings
    pub bounce_boost: f64,
    /// Accumulator advance policy
    pub rotation_mode: RotationMode,
    /// Playfield bounds (pixels)
    pub width: f64,
    pub height: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        let speed = 1.0;
        Self {
            speed,
            speed_max: 5.0,
            gravity: speed / 75.0,
            ring_count: 35,
            start_radius: 100.0,
            ring_spacing: 10.0,
            ball_radius: 10.0,
            ball_count: 2,
            rotation_speed: 0.001,
            bounce_boost: 0.1,
            rotation_mode: RotationMode::PerBall,
            width: 900.0,
            height: 900.0,
        }
    }
}

impl Tuning {
    /// Radius of the outermost configured ring, the reference for the bounce
    /// boost
    pub fn max_ring_radius(&self) -> f64 {
        self.start_radius + self.ring_count as f64 * self.ring_spacing
    }

    /// Center of the ring stack
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!(
                        "Bad tuning file {}: {} - using defaults",
                        path.display(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "Cannot read tuning file {}: {} - using defaults",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }
}
