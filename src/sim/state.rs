//! Simulation state and events
//!
//! Everything the stepping function mutates lives here: the ball collection,
//! the ring arena, the rotation accumulator and the note cursor. Rings are
//! never removed from their vector; they retire in place so indices stay
//! stable across a tick.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::PALETTE;
use crate::sim::ball::Ball;
use crate::sim::ring::Ring;
use crate::tuning::Tuning;

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A ring contact advanced the note cursor; play this score index
    Note { index: usize },
    /// A ball escaped through a gap; the ring at this index is retired
    RingCleared { ring: usize },
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    /// Spawn seed, kept for reproducibility
    pub seed: u64,
    /// Balls in spawn order; iteration order decides collision pairing
    pub balls: Vec<Ball>,
    /// Ring arena ordered by increasing radius; retired rings stay in place
    pub rings: Vec<Ring>,
    /// Shared rotation accumulator, the simulation clock for ring geometry
    pub rotation: f64,
    /// Next index into the host's score
    pub note_cursor: usize,
    /// Length of the host's score; the cursor wraps modulo this
    pub note_count: usize,
    /// Play/pause flag read by the stepping function each tick
    running: bool,
    /// Ticks performed while running
    pub time_ticks: u64,
    /// Playfield bounds
    pub width: f64,
    pub height: f64,
}

impl SimState {
    /// Build the initial state: a stack of rings around the playfield center
    /// and a column of balls hanging below it, with PCG-seeded launch
    /// velocities. The state starts paused.
    pub fn new(tuning: &Tuning, seed: u64, note_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let center = tuning.center();

        let balls = (0..tuning.ball_count)
            .map(|i| {
                let y = center.y + (tuning.ball_radius * 2.0 + 10.0) * i as f64;
                let vel = DVec2::new(tuning.speed * rng.random::<f64>(), tuning.speed);
                Ball::new(
                    DVec2::new(center.x, y),
                    vel,
                    tuning.ball_radius,
                    i % PALETTE.len(),
                    tuning.speed_max,
                )
            })
            .collect();

        let rings = (0..tuning.ring_count)
            .map(|i| {
                let radius = tuning.start_radius + i as f64 * tuning.ring_spacing;
                Ring::new(radius, center, i as f64 * 0.1, i % PALETTE.len())
            })
            .collect();

        Self {
            seed,
            balls,
            rings,
            rotation: 0.0,
            note_cursor: 0,
            note_count,
            running: false,
            time_ticks: 0,
            width: tuning.width,
            height: tuning.height,
        }
    }

    /// Index of the innermost ring still standing, if any
    pub fn innermost_ring(&self) -> Option<usize> {
        self.rings.iter().position(|r| !r.is_retired())
    }

    pub fn rings_remaining(&self) -> usize {
        self.rings.iter().filter(|r| !r.is_retired()).count()
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the note cursor, wrapping over the score. Returns the index to
    /// play, or None for an empty score.
    pub(crate) fn advance_note(&mut self) -> Option<usize> {
        if self.note_count == 0 {
            return None;
        }
        let index = self.note_cursor;
        self.note_cursor = (self.note_cursor + 1) % self.note_count;
        Some(index)
    }
}
