//! Matching the live input buffer against the falling words.

use std::time::Instant;

use crate::{
    events::{GameEvent, SoundCue},
    session::{Game, Phase, WORDS_PER_LEVEL},
    word::FallingWord,
};

/// Outcome of an input change
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// No session is being played
    Ignored,
    /// Input kept, nothing on the field matches it yet
    Pending,
    Matched {
        word: FallingWord,
        /// New level when this word completed a level
        level_up: Option<u32>,
    },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    pub fn events(&self) -> Vec<GameEvent> {
        match self {
            MatchResult::Matched { word, level_up } => {
                let mut events = vec![
                    GameEvent::Matched {
                        id: word.id,
                        text: word.text.clone(),
                    },
                    GameEvent::Sound(SoundCue::Correct),
                ];
                if let Some(level) = level_up {
                    events.push(GameEvent::LevelUp { level: *level });
                }
                events
            }
            _ => Vec::new(),
        }
    }
}

impl Game {
    /// Replace the input buffer with `raw` and remove the first falling word
    /// whose text equals it exactly.
    ///
    /// Falling words share one speed and are kept in spawn order, so the first
    /// match is also the lowest of any duplicates.
    pub fn on_input_change(&mut self, raw: &str, now: Instant) -> MatchResult {
        if self.phase != Phase::Playing {
            return MatchResult::Ignored;
        }

        self.input = raw.to_string();

        let Some(idx) = self.falling.iter().position(|word| word.text == raw) else {
            return MatchResult::Pending;
        };

        let word = self.falling.remove(idx);
        self.input.clear();
        self.stats.record_completion(&word.text, true, now);

        let level_up = if self.stats.correct_words % WORDS_PER_LEVEL == 0 {
            self.level += 1;
            self.speed += self.difficulty.config().speed_increment;
            tracing::info!(level = self.level, speed = self.speed, "level up");
            Some(self.level)
        } else {
            None
        };

        tracing::debug!(id = word.id, text = %word.text, "word matched");
        MatchResult::Matched { word, level_up }
    }

    pub fn push_char(&mut self, c: char, now: Instant) -> MatchResult {
        let mut raw = self.input.clone();
        raw.push(c);
        self.on_input_change(&raw, now)
    }

    pub fn pop_char(&mut self, now: Instant) -> MatchResult {
        let mut raw = self.input.clone();
        raw.pop();
        self.on_input_change(&raw, now)
    }

    pub fn clear_input(&mut self, now: Instant) -> MatchResult {
        self.on_input_change("", now)
    }
}
