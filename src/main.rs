//! Ring Chime entry point
//!
//! Headless driver: builds the simulation, steps it at display cadence and
//! logs the notes the host synth would play.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ring_chime::score::Score;
use ring_chime::sim::{SimEvent, SimState, tick};
use ring_chime::tuning::Tuning;

/// Display cadence for the paced mode (~60 FPS)
const FRAME: Duration = Duration::from_micros(16_667);

struct Args {
    seed: u64,
    frames: u64,
    tuning: Option<PathBuf>,
    score: Option<PathBuf>,
    /// Skip frame pacing and run the ticks back to back
    fast: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            frames: 3600,
            tuning: None,
            score: None,
            fast: false,
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                if let Some(v) = iter.next() {
                    args.seed = v.parse().unwrap_or(args.seed);
                }
            }
            "--frames" => {
                if let Some(v) = iter.next() {
                    args.frames = v.parse().unwrap_or(args.frames);
                }
            }
            "--tuning" => args.tuning = iter.next().map(PathBuf::from),
            "--score" => args.score = iter.next().map(PathBuf::from),
            "--fast" => args.fast = true,
            other => log::warn!("ignoring unknown argument {other}"),
        }
    }
    args
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let tuning = args.tuning.as_deref().map(Tuning::load).unwrap_or_default();
    let score = args.score.as_deref().map(Score::load).unwrap_or_else(Score::demo);

    let mut state = SimState::new(&tuning, args.seed, score.len());
    state.resume();

    log::info!(
        "seed {:#x}: {} balls, {} rings, {} notes",
        args.seed,
        state.balls.len(),
        state.rings.len(),
        score.len()
    );

    let mut notes_played = 0u64;
    for _ in 0..args.frames {
        let frame_start = Instant::now();

        for event in tick(&mut state, &tuning) {
            match event {
                SimEvent::Note { index } => {
                    let note = &score.notes[index];
                    log::info!("note {} ({:.2}s)", note.name, note.duration);
                    notes_played += 1;
                }
                SimEvent::RingCleared { ring } => {
                    log::info!(
                        "ring cleared at radius {} ({} standing)",
                        state.rings[ring].radius,
                        state.rings_remaining()
                    );
                }
            }
        }

        if state.rings_remaining() == 0 {
            log::info!("all rings cleared");
            break;
        }

        if !args.fast {
            if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    log::info!(
        "done: {} ticks, {}/{} rings cleared, {} notes played",
        state.time_ticks,
        state.rings.len() - state.rings_remaining(),
        state.rings.len(),
        notes_played
    );
}
