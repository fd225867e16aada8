//! Rotating gapped rings
//!
//! A ring is a circle that is solid except for one angular gap. The gap sweeps
//! around as the ring rotates, and its two endpoints move with the rim, acting
//! as small circular obstacles in their own right. Per tick a ring classifies
//! a ball as passing through the gap, escaping entirely, grazing a gap edge,
//! or pressing against the solid arc, and computes the velocity response for
//! the last two.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Outcome of testing a ball against a ring for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RingAction {
    /// No obstruction; velocity unchanged
    Pass,
    /// The ball's center fully crossed the ring radius - the ring is beaten
    Escape,
    /// The ball bounced off the solid arc
    Bounce,
    /// The ball grazed a gap endpoint
    Deviate,
}

/// A rotating circle with one angular gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Fixed at creation; rings never change size
    pub radius: f64,
    /// Shared fixed center of the ring stack
    pub center: DVec2,
    /// Fixed per-ring angle added to the accumulator, staggering gap positions
    pub offset: f64,
    /// Current rotation angle, set by [`Ring::advance_rotation`]
    rotation: f64,
    /// Bounds of the solid arc; the gap spans the remaining angle
    start_angle: f64,
    end_angle: f64,
    /// Palette index, display-only
    pub color: usize,
    /// Set once a ball escapes through the gap; retired rings are inert
    retired: bool,
}

impl Ring {
    pub fn new(radius: f64, center: DVec2, offset: f64, color: usize) -> Self {
        let mut ring = Self {
            radius,
            center,
            offset,
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: 0.0,
            color,
            retired: false,
        };
        ring.advance_rotation(0.0);
        ring
    }

    /// Angular width of the gap, negative by convention. Larger rings get a
    /// narrower opening.
    fn hole_angle(&self) -> f64 {
        -PI / (2.0 + self.radius / 75.0)
    }

    /// Recompute the solid-arc bounds for the given accumulator value.
    ///
    /// The accumulator is the shared simulation clock, threaded in by the
    /// caller; each ring adds its own fixed offset so gaps stay staggered.
    /// The +2π on the end angle makes the solid arc span everything except
    /// the gap, which ends up centered on the rotation angle.
    pub fn advance_rotation(&mut self, accumulator: f64) {
        let hole = self.hole_angle();
        self.rotation = accumulator + self.offset;
        self.start_angle = -hole / 2.0 + self.rotation;
        self.end_angle = hole / 2.0 + self.rotation + 2.0 * PI;
    }

    /// Start of the solid arc, for rendering
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// End of the solid arc, for rendering
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub(crate) fn retire(&mut self) {
        self.retired = true;
    }

    /// The two gap endpoints, on the rim at the solid-arc bounds
    pub fn gap_edges(&self) -> (DVec2, DVec2) {
        (
            polar_to_cartesian(self.center, self.radius, self.start_angle),
            polar_to_cartesian(self.center, self.radius, self.end_angle),
        )
    }

    /// Rim speed under rigid rotation
    fn edge_speed(&self, rotation_speed: f64) -> f64 {
        self.radius * rotation_speed
    }

    /// Instantaneous velocity of a gap endpoint: tangent to the rim, scaled
    /// by the rim speed. A point coincident with the center yields zero.
    pub fn edge_velocity(&self, point: DVec2, rotation_speed: f64) -> DVec2 {
        let radial = (point - self.center).normalize_or_zero();
        DVec2::new(-radial.y, radial.x) * self.edge_speed(rotation_speed)
    }

    /// Classify the ball's relation to the ring for this tick.
    ///
    /// Callers gate this behind the coarse rim test in [`Ring::check`]; a
    /// ball comfortably inside the ring never reaches classification.
    pub fn classify(&self, ball_pos: DVec2, ball_radius: f64) -> RingAction {
        if ball_pos.distance(self.center) >= self.radius {
            return RingAction::Escape;
        }

        let (a, b) = self.gap_edges();
        let dist_a = a.distance(ball_pos);
        let dist_b = b.distance(ball_pos);
        if dist_a <= ball_radius || dist_b <= ball_radius {
            return RingAction::Deviate;
        }

        // Chord spanning the gap: a ball closer to both endpoints than they
        // are to each other sits inside the gap's angular span.
        let chord = a.distance(b);
        if chord > dist_a && chord > dist_b {
            return RingAction::Pass;
        }

        RingAction::Bounce
    }

    /// Reflect a ball off the solid arc, treating the ring as a rigid
    /// circular wall: v' = v - 2(v·n)n along the outward normal, then an
    /// outward boost that grows with ring size relative to the outermost
    /// configured ring.
    pub fn reflect(&self, ball_pos: DVec2, vel: DVec2, max_radius: f64, boost: f64) -> DVec2 {
        let n = (ball_pos - self.center).normalize_or_zero();
        let reflected = vel - 2.0 * vel.dot(n) * n;
        reflected * (1.0 + (self.radius / max_radius) * boost)
    }

    /// Deflect a ball off the nearer gap endpoint, treated as a moving point
    /// obstacle: subtract the relative-velocity component projected onto the
    /// endpoint-to-ball axis. A ball dead on the endpoint has no axis to
    /// project onto and keeps its velocity.
    pub fn deviate(&self, ball_pos: DVec2, vel: DVec2, rotation_speed: f64) -> DVec2 {
        let (a, b) = self.gap_edges();
        let edge = if a.distance(ball_pos) < b.distance(ball_pos) {
            a
        } else {
            b
        };
        let edge_vel = self.edge_velocity(edge, rotation_speed);

        let n = ball_pos - edge;
        let n_sq = n.length_squared();
        if n_sq == 0.0 {
            return vel;
        }

        let relative = vel - edge_vel;
        vel - (relative.dot(n) / n_sq) * n
    }

    /// Per-tick entry point: test a ball against this ring and produce the
    /// updated velocity plus the action taken. Pure in everything except the
    /// ring geometry already set by [`Ring::advance_rotation`].
    pub fn check(
        &self,
        ball_pos: DVec2,
        vel: DVec2,
        ball_radius: f64,
        tuning: &Tuning,
    ) -> (DVec2, RingAction) {
        // Coarse rim test: the ball's leading edge must have reached the rim
        if ball_pos.distance(self.center) + ball_radius < self.radius {
            return (vel, RingAction::Pass);
        }

        match self.classify(ball_pos, ball_radius) {
            RingAction::Pass => (vel, RingAction::Pass),
            RingAction::Escape => (vel, RingAction::Escape),
            RingAction::Bounce => (
                self.reflect(ball_pos, vel, tuning.max_ring_radius(), tuning.bounce_boost),
                RingAction::Bounce,
            ),
            RingAction::Deviate => (
                self.deviate(ball_pos, vel, tuning.rotation_speed),
                RingAction::Deviate,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CENTER: DVec2 = DVec2::new(450.0, 450.0);

    fn ring() -> Ring {
        Ring::new(100.0, CENTER, 0.0, 0)
    }

    #[test]
    fn test_gap_edges_lie_on_rim() {
        let ring = ring();
        let (a, b) = ring.gap_edges();
        assert!((a.distance(CENTER) - 100.0).abs() < 1e-9);
        assert!((b.distance(CENTER) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_gap_width_matches_hole_angle() {
        let ring = ring();
        let (a, b) = ring.gap_edges();
        // For radius 100 the hole is π/(2 + 100/75) wide; the chord between
        // the endpoints is 2r·sin(hole/2)
        let hole = PI / (2.0 + 100.0 / 75.0);
        let expected_chord = 2.0 * 100.0 * (hole / 2.0).sin();
        assert!((a.distance(b) - expected_chord).abs() < 1e-9);
    }

    #[test]
    fn test_edge_velocity_is_tangential() {
        let ring = ring();
        let (a, _) = ring.gap_edges();
        let v = ring.edge_velocity(a, 0.001);
        assert!(v.dot(a - CENTER).abs() < 1e-9);
        assert!((v.length() - 100.0 * 0.001).abs() < 1e-9);
    }

    #[test]
    fn test_classify_escape_past_rim() {
        let ring = ring();
        let pos = CENTER + DVec2::new(150.0, 0.0);
        assert_eq!(ring.classify(pos, 10.0), RingAction::Escape);
        // Exactly on the rim counts as escaped too
        let on_rim = CENTER + DVec2::new(100.0, 0.0);
        assert_eq!(ring.classify(on_rim, 10.0), RingAction::Escape);
    }

    #[test]
    fn test_classify_pass_inside_gap() {
        // Rotation 0 with zero offset centers the gap on the +x axis
        let ring = ring();
        let pos = CENTER + DVec2::new(95.0, 0.0);
        assert_eq!(ring.classify(pos, 10.0), RingAction::Pass);
    }

    #[test]
    fn test_classify_bounce_on_solid_arc() {
        let ring = ring();
        // Opposite side from the gap
        let pos = CENTER + DVec2::new(-95.0, 0.0);
        assert_eq!(ring.classify(pos, 10.0), RingAction::Bounce);
    }

    #[test]
    fn test_classify_deviate_at_gap_edge() {
        let ring = ring();
        let (a, _) = ring.gap_edges();
        // Nudge the ball just inside the rim so the escape branch stays out
        let pos = a + (CENTER - a).normalize_or_zero() * 1.0;
        assert_eq!(ring.classify(pos, 10.0), RingAction::Deviate);
    }

    #[test]
    fn test_reflect_head_on_reverses_velocity() {
        let ring = ring();
        let pos = CENTER + DVec2::new(95.0, 0.0);
        // max_radius equal to this ring with boost 0.05 gives exactly 1.05
        let out = ring.reflect(pos, DVec2::new(-5.0, 0.0), 100.0, 0.05);
        assert!((out - DVec2::new(5.25, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_deviate_on_edge_point_keeps_velocity() {
        let ring = ring();
        let (a, _) = ring.gap_edges();
        let vel = DVec2::new(2.0, -3.0);
        let out = ring.deviate(a, vel, 0.001);
        assert_eq!(out, vel);
        assert!(out.x.is_finite() && out.y.is_finite());
    }

    #[test]
    fn test_deviate_pushes_ball_off_edge() {
        let ring = ring();
        let (a, _) = ring.gap_edges();
        let pos = a + DVec2::new(3.0, 0.0);
        let vel = DVec2::new(-2.0, 0.0);
        let out = ring.deviate(pos, vel, 0.001);
        assert!(out.x.is_finite() && out.y.is_finite());
        assert_ne!(out, vel);
    }

    #[test]
    fn test_check_gate_skips_interior_balls() {
        let ring = ring();
        let vel = DVec2::new(1.0, 1.0);
        let (out, action) = ring.check(CENTER, vel, 10.0, &Tuning::default());
        assert_eq!(action, RingAction::Pass);
        assert_eq!(out, vel);
    }

    proptest! {
        #[test]
        fn reflect_scales_speed_by_the_boost_only(
            angle in 0.0f64..std::f64::consts::TAU,
            vx in -5.0f64..5.0,
            vy in -5.0f64..5.0,
        ) {
            let ring = ring();
            let pos = polar_to_cartesian(CENTER, 95.0, angle);
            let vel = DVec2::new(vx, vy);
            let out = ring.reflect(pos, vel, 450.0, 0.1);
            let multiplier = 1.0 + (100.0 / 450.0) * 0.1;
            prop_assert!((out.length() - vel.length() * multiplier).abs() < 1e-9);
        }
    }
}
