use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Per-difficulty pacing of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    /// Fall speed at session start, in field pixels per tick
    pub initial_speed: f64,
    /// Added to the fall speed on every level up
    pub speed_increment: f64,
    /// Minimum time between two spawns, in milliseconds
    pub spawn_interval_ms: u64,
    pub max_words_on_screen: usize,
}

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                initial_speed: 0.6,
                speed_increment: 0.02,
                spawn_interval_ms: 2500,
                max_words_on_screen: 3,
            },
            Difficulty::Medium => DifficultyConfig {
                initial_speed: 0.8,
                speed_increment: 0.03,
                spawn_interval_ms: 2000,
                max_words_on_screen: 4,
            },
            Difficulty::Hard => DifficultyConfig {
                initial_speed: 1.2,
                speed_increment: 0.05,
                spawn_interval_ms: 1500,
                max_words_on_screen: 5,
            },
        }
    }

    /// Cycle to the next difficulty (menu selection)
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}
