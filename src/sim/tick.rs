//! Frame stepping
//!
//! One call advances every ball by one frame: innermost-ring test, wall
//! bounce, gravity, ball-ball impulse, positional correction, integration,
//! rotation advance. Ring contacts surface as returned [`SimEvent`]s; the
//! caller decides what noise to make about them.

use glam::DVec2;

use super::ring::RingAction;
use super::state::{SimEvent, SimState};
use crate::polar_to_cartesian;
use crate::tuning::{RotationMode, Tuning};

/// Advance the simulation by one frame.
///
/// A paused state is left untouched and produces no events; the host keeps
/// its frame cadence and simply calls again next frame. Each ball is tested
/// only against the innermost ring still standing, and a ring retired by one
/// ball is gone for every ball after it, including later balls in the same
/// tick.
pub fn tick(state: &mut SimState, tuning: &Tuning) -> Vec<SimEvent> {
    if !state.is_running() {
        return Vec::new();
    }

    let mut events = Vec::new();
    state.time_ticks += 1;

    // Ring geometry is refreshed once per frame, before any ball moves; the
    // accumulator keeps advancing during the ball loop but only shows up in
    // the next frame's geometry.
    let rotation = state.rotation;
    for ring in state.rings.iter_mut().filter(|r| !r.is_retired()) {
        ring.advance_rotation(rotation);
    }

    for i in 0..state.balls.len() {
        let pos = state.balls[i].pos();
        let radius = state.balls[i].radius;
        let mut vel = state.balls[i].vel();

        let mut action = RingAction::Pass;
        if let Some(ring_idx) = state.innermost_ring() {
            let (new_vel, ring_action) =
                state.rings[ring_idx].check(pos, vel, radius, tuning);
            vel = new_vel;
            action = ring_action;

            match action {
                RingAction::Escape => {
                    state.rings[ring_idx].retire();
                    log::debug!(
                        "ring at radius {} cleared, {} remaining",
                        state.rings[ring_idx].radius,
                        state.rings_remaining()
                    );
                    events.push(SimEvent::RingCleared { ring: ring_idx });
                }
                RingAction::Bounce | RingAction::Deviate => {
                    if let Some(index) = state.advance_note() {
                        events.push(SimEvent::Note { index });
                    }
                }
                RingAction::Pass => {}
            }
        }

        // Screen bounds reflect the leading edge back into the playfield
        if pos.x + radius > state.width || pos.x - radius < 0.0 {
            vel.x = -vel.x;
        }
        if pos.y + radius > state.height || pos.y - radius < 0.0 {
            vel.y = -vel.y;
        }

        // Gravity pulls down every tick; only the component clamp limits it
        vel.y += tuning.gravity;

        state.balls[i].set_velocity(vel);

        // First overlapping partner in spawn order, not the nearest
        if let Some(j) = first_overlap(state, i) {
            resolve_ball_collision(state, i, j);
        }

        if action != RingAction::Pass {
            adjust_position(state, i, pos);
        }

        state.balls[i].step();

        // PerBall advances the clock once per ball processed, so ring speed
        // scales with the ball count
        if tuning.rotation_mode == RotationMode::PerBall {
            state.rotation += tuning.rotation_speed;
        }
    }

    if tuning.rotation_mode == RotationMode::PerTick {
        state.rotation += tuning.rotation_speed;
    }

    events
}

/// First other ball overlapping ball `i`, in spawn order
fn first_overlap(state: &SimState, i: usize) -> Option<usize> {
    let ball = &state.balls[i];
    state.balls.iter().enumerate().find_map(|(j, other)| {
        if j == i {
            return None;
        }
        (ball.pos().distance(other.pos()) < ball.radius + other.radius).then_some(j)
    })
}

/// Equal-mass elastic impulse along the line of centers. Both velocities go
/// back through the component clamp. Coincident centers leave no axis to
/// exchange momentum along and are a no-op.
fn resolve_ball_collision(state: &mut SimState, i: usize, j: usize) {
    let (pa, va) = (state.balls[i].pos(), state.balls[i].vel());
    let (pb, vb) = (state.balls[j].pos(), state.balls[j].vel());

    let d = pa - pb;
    let dist_sq = d.length_squared();
    if dist_sq == 0.0 {
        return;
    }

    let factor = (va - vb).dot(d) / dist_sq;
    let correction = factor * d;
    state.balls[i].set_velocity(va - correction);
    state.balls[j].set_velocity(vb + correction);
}

/// Positional correction after a ring contact: push the ball back inside the
/// innermost ring and out of any overlapping partner. Distances and angles
/// use the position captured at the start of the ball's update, the same one
/// the velocity pass saw.
fn adjust_position(state: &mut SimState, i: usize, pos: DVec2) {
    let radius = state.balls[i].radius;

    if let Some(ring_idx) = state.innermost_ring() {
        let ring = &state.rings[ring_idx];
        if pos.distance(ring.center) + radius > ring.radius {
            let angle = (pos.y - ring.center.y).atan2(pos.x - ring.center.x);
            let clamped = polar_to_cartesian(ring.center, ring.radius - radius, angle);
            state.balls[i].set_position(clamped);
        }
    }

    for j in 0..state.balls.len() {
        if j == i {
            continue;
        }
        let other_pos = state.balls[j].pos();
        let other_radius = state.balls[j].radius;
        if pos.distance(other_pos) < radius + other_radius {
            let angle = (pos.y - other_pos.y).atan2(pos.x - other_pos.x);
            let pushed = polar_to_cartesian(other_pos, radius + other_radius, angle);
            state.balls[i].set_position(pushed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Ball;
    use crate::sim::ring::Ring;

    /// Tuning with gravity and rotation zeroed so individual effects can be
    /// isolated per test
    fn quiet_tuning() -> Tuning {
        Tuning {
            gravity: 0.0,
            rotation_speed: 0.0,
            ..Tuning::default()
        }
    }

    fn empty_state(tuning: &Tuning) -> SimState {
        let mut state = SimState::new(tuning, 7, 0);
        state.balls.clear();
        state.rings.clear();
        state.resume();
        state
    }

    #[test]
    fn test_paused_tick_is_inert() {
        let tuning = Tuning::default();
        let mut state = SimState::new(&tuning, 7, 4);
        let before = state.clone();

        let events = tick(&mut state, &tuning);
        assert!(events.is_empty());
        assert_eq!(state, before);

        state.resume();
        tick(&mut state, &tuning);
        assert_eq!(state.time_ticks, 1);

        state.pause();
        tick(&mut state, &tuning);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_gravity_only_free_fall() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        let start = tuning.center();
        state
            .balls
            .push(Ball::new(start, DVec2::ZERO, 10.0, 0, tuning.speed_max));

        let n = 20;
        for _ in 0..n {
            tick(&mut state, &tuning);
        }

        let ball = &state.balls[0];
        assert!((ball.vel().y - n as f64 * tuning.gravity).abs() < 1e-9);
        assert_eq!(ball.vel().x, 0.0);
        assert_eq!(ball.pos().x, start.x);
        assert!(ball.pos().y > start.y);
    }

    #[test]
    fn test_gravity_saturates_at_clamp() {
        let tuning = Tuning::default();
        let mut state = empty_state(&tuning);
        state.balls.push(Ball::new(
            tuning.center(),
            DVec2::ZERO,
            10.0,
            0,
            tuning.speed_max,
        ));

        // More than enough ticks for speed_max / gravity
        for _ in 0..1000 {
            tick(&mut state, &tuning);
        }
        assert_eq!(state.balls[0].vel().y, tuning.speed_max);
    }

    #[test]
    fn test_wall_bounce_flips_component() {
        let tuning = quiet_tuning();
        let mut state = empty_state(&tuning);
        // Leading edge past the right wall
        state.balls.push(Ball::new(
            DVec2::new(tuning.width - 5.0, 400.0),
            DVec2::new(3.0, 0.0),
            10.0,
            0,
            tuning.speed_max,
        ));

        tick(&mut state, &tuning);
        assert_eq!(state.balls[0].vel(), DVec2::new(-3.0, 0.0));
    }

    #[test]
    fn test_ball_collision_swaps_approach_velocities() {
        let tuning = quiet_tuning();
        let mut state = empty_state(&tuning);
        state.balls.push(Ball::new(
            DVec2::new(100.0, 100.0),
            DVec2::new(1.0, 0.0),
            2.0,
            0,
            tuning.speed_max,
        ));
        state.balls.push(Ball::new(
            DVec2::new(103.0, 100.0),
            DVec2::new(-1.0, 0.0),
            2.0,
            1,
            tuning.speed_max,
        ));

        tick(&mut state, &tuning);
        assert!((state.balls[0].vel().x - -1.0).abs() < 1e-9);
        assert!((state.balls[1].vel().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_escape_retires_ring_for_good() {
        let tuning = quiet_tuning();
        let mut state = empty_state(&tuning);
        let center = tuning.center();
        state.rings.push(Ring::new(100.0, center, 0.0, 0));
        state.rings.push(Ring::new(110.0, center, 0.1, 1));
        // Past the innermost rim already
        state.balls.push(Ball::new(
            center + DVec2::new(104.0, 0.0),
            DVec2::new(0.5, 0.0),
            10.0,
            0,
            tuning.speed_max,
        ));

        let events = tick(&mut state, &tuning);
        assert!(events.contains(&SimEvent::RingCleared { ring: 0 }));
        assert!(state.rings[0].is_retired());
        assert_eq!(state.innermost_ring(), Some(1));

        // Retirement is permanent: no further clear events for that ring
        for _ in 0..10 {
            let events = tick(&mut state, &tuning);
            assert!(!events.contains(&SimEvent::RingCleared { ring: 0 }));
            assert!(state.rings[0].is_retired());
        }
    }

    #[test]
    fn test_bounce_emits_note_and_advances_cursor() {
        let tuning = quiet_tuning();
        let mut state = empty_state(&tuning);
        state.note_count = 3;
        let center = tuning.center();
        state.rings.push(Ring::new(100.0, center, 0.0, 0));
        // Pressing on the solid arc, opposite the gap
        state.balls.push(Ball::new(
            center + DVec2::new(-95.0, 0.0),
            DVec2::new(-1.0, 0.0),
            10.0,
            0,
            tuning.speed_max,
        ));

        let events = tick(&mut state, &tuning);
        assert!(events.contains(&SimEvent::Note { index: 0 }));
        assert_eq!(state.note_cursor, 1);
        // Bounce also pushes the ball back inside the rim
        let ball = &state.balls[0];
        assert!(ball.pos().distance(center) + ball.radius <= 100.0 + 1e-9);
    }

    #[test]
    fn test_rotation_mode_per_ball_vs_per_tick() {
        let mut tuning = quiet_tuning();
        tuning.rotation_speed = 0.001;

        let mut state = empty_state(&tuning);
        let far = DVec2::new(200.0, 200.0);
        state
            .balls
            .push(Ball::new(far, DVec2::ZERO, 10.0, 0, tuning.speed_max));
        state.balls.push(Ball::new(
            far + DVec2::new(50.0, 0.0),
            DVec2::ZERO,
            10.0,
            1,
            tuning.speed_max,
        ));

        tick(&mut state, &tuning);
        assert!((state.rotation - 0.002).abs() < 1e-12);

        tuning.rotation_mode = RotationMode::PerTick;
        tick(&mut state, &tuning);
        assert!((state.rotation - 0.003).abs() < 1e-12);
    }
}
