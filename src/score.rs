//! Note sequences for collision-triggered playback
//!
//! The simulation only ever advances an index; hosts look the note up here
//! and hand it to whatever synth they have. Extracting notes from MIDI is a
//! host concern, the in-scope interchange format is a JSON array of named
//! notes.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single timed note: pitch name plus duration in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Scientific pitch name, e.g. "D#4"
    pub name: String,
    pub duration: f64,
}

/// An ordered note sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub notes: Vec<Note>,
}

impl Score {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Load a score from a JSON file, falling back to the demo sequence
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(score) => {
                    log::info!("Loaded score from {}", path.display());
                    score
                }
                Err(err) => {
                    log::warn!(
                        "Bad score file {}: {} - using demo score",
                        path.display(),
                        err
                    );
                    Self::demo()
                }
            },
            Err(err) => {
                log::warn!(
                    "Cannot read score file {}: {} - using demo score",
                    path.display(),
                    err
                );
                Self::demo()
            }
        }
    }

    /// Built-in pentatonic loop so the binary makes noise without assets
    pub fn demo() -> Self {
        let names = [
            "C4", "D4", "E4", "G4", "A4", "C5", "A4", "G4", "E4", "D4",
        ];
        Self {
            notes: names
                .iter()
                .map(|name| Note {
                    name: (*name).to_string(),
                    duration: 0.25,
                })
                .collect(),
        }
    }
}
