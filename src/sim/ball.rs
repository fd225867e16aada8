//! Ball entities
//!
//! A ball is a point mass with a fixed radius. Velocity goes through a
//! sign-preserving per-component clamp on every store, so a diagonal ball can
//! exceed the clamp in Euclidean norm but never on either axis.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A bouncing ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pos: DVec2,
    vel: DVec2,
    /// Fixed after construction
    pub radius: f64,
    /// Palette index, display-only
    pub color: usize,
    /// Per-component bound applied by [`Ball::set_velocity`]
    speed_max: f64,
}

impl Ball {
    /// The initial velocity goes through the clamp like any other store.
    pub fn new(pos: DVec2, vel: DVec2, radius: f64, color: usize, speed_max: f64) -> Self {
        let mut ball = Self {
            pos,
            vel: DVec2::ZERO,
            radius,
            color,
            speed_max,
        };
        ball.set_velocity(vel);
        ball
    }

    /// Advance position by one tick of velocity
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    pub fn vel(&self) -> DVec2 {
        self.vel
    }

    pub fn set_position(&mut self, pos: DVec2) {
        self.pos = pos;
    }

    /// Store a velocity, clamping each component to ±speed_max independently
    pub fn set_velocity(&mut self, vel: DVec2) {
        let max = DVec2::splat(self.speed_max);
        self.vel = vel.clamp(-max, max);
    }
}
