pub mod core;
pub mod feed;
pub mod supply;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

// Re-export the main types for convenience
pub use core::{DirWordLists, EmbeddedWordLists, WordBank, WordListError, WordListProvider};
pub use feed::{InlineFeed, SupplyRequest, ThreadedFeed, WordBatch, WordFeed};
pub use supply::WordSupply;

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
pub enum Language {
    #[default]
    English,
    Korean,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Korean];

    /// Stem of the word list file for this language (`english` -> `english.json`)
    pub fn file_stem(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn next(&self) -> Self {
        match self {
            Language::English => Language::Korean,
            Language::Korean => Language::English,
        }
    }
}

/// Identifies an independent word-queue lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub language: Language,
    pub difficulty: Difficulty,
}

impl SessionKey {
    pub fn new(language: Language, difficulty: Difficulty) -> Self {
        Self {
            language,
            difficulty,
        }
    }
}
