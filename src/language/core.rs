use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::Language;
use crate::difficulty::Difficulty;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Errors raised while loading a word list
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("word list not found: {0}")]
    NotFound(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid word list {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// All candidate words of one language, grouped by difficulty
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WordBank {
    pub name: String,
    #[serde(default)]
    pub easy: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub hard: Vec<String>,
}

impl WordBank {
    pub fn words(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn from_json(name: &str, json: &str) -> Result<Self, WordListError> {
        from_str(json).map_err(|source| WordListError::Parse {
            name: name.to_string(),
            source,
        })
    }

    /// Small built-in list used when the real one cannot be loaded
    pub fn fallback(language: Language) -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();

        match language {
            Language::English => Self {
                name: "english_fallback".to_string(),
                easy: owned(&["apple", "sun", "cat", "dog", "cup", "star", "moon", "tree"]),
                medium: owned(&["adventure", "rainbow", "journey", "mystery", "solution"]),
                hard: owned(&["cacophony", "ephemeral", "obfuscate", "paradox", "ubiquitous"]),
            },
            Language::Korean => Self {
                name: "korean_fallback".to_string(),
                easy: owned(&["사과", "하늘", "고양이", "강아지", "별님", "달님", "나무", "구름"]),
                medium: owned(&["무지개", "도전하다", "여행자", "신비로운", "해결책"]),
                hard: owned(&["불가사의", "형이상학", "불가지론", "인식론", "변증법"]),
            },
        }
    }
}

/// Source of word banks, one per language
pub trait WordListProvider: Send {
    fn load(&self, language: Language) -> Result<WordBank, WordListError>;
}

/// Word lists compiled into the binary from `src/lang`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedWordLists;

impl WordListProvider for EmbeddedWordLists {
    fn load(&self, language: Language) -> Result<WordBank, WordListError> {
        let file_name = format!("{}.json", language.file_stem());

        let file = LANG_DIR
            .get_file(&file_name)
            .ok_or_else(|| WordListError::NotFound(file_name.clone()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordListError::NotFound(format!("{file_name} is not utf-8")))?;

        WordBank::from_json(&file_name, contents)
    }
}

/// Word lists read at runtime from `<dir>/<language>.json`
#[derive(Debug, Clone)]
pub struct DirWordLists {
    dir: PathBuf,
}

impl DirWordLists {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl WordListProvider for DirWordLists {
    fn load(&self, language: Language) -> Result<WordBank, WordListError> {
        let path = self.dir.join(format!("{}.json", language.file_stem()));

        let contents = fs::read_to_string(&path).map_err(|source| WordListError::Io {
            path: path.clone(),
            source,
        })?;

        WordBank::from_json(&path.display().to_string(), &contents)
    }
}
