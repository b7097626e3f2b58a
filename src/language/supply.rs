use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;

use super::{core::WordListProvider, Language, SessionKey, WordBank};

/// Returned when a session key has no source words at all, so spawning never stalls
pub const PLACEHOLDER_WORDS: [&str; 3] = ["magic", "fairy", "love"];

/// Hands out words per session key from a shuffled stack, reshuffling the full
/// source list whenever the stack runs dry.
pub struct WordSupply {
    provider: Box<dyn WordListProvider>,
    banks: HashMap<Language, WordBank>,
    stacks: HashMap<SessionKey, Vec<String>>,
    rng: StdRng,
}

impl WordSupply {
    pub fn new(provider: Box<dyn WordListProvider>) -> Self {
        Self::with_rng(provider, StdRng::from_entropy())
    }

    pub fn with_seed(provider: Box<dyn WordListProvider>, seed: u64) -> Self {
        Self::with_rng(provider, StdRng::seed_from_u64(seed))
    }

    fn with_rng(provider: Box<dyn WordListProvider>, rng: StdRng) -> Self {
        Self {
            provider,
            banks: HashMap::new(),
            stacks: HashMap::new(),
            rng,
        }
    }

    /// Pop `count` words for `key`. Within one batch a word can repeat only when
    /// the source list is shorter than what has been drawn since the last reshuffle.
    pub fn fetch_batch(&mut self, key: SessionKey, count: usize) -> Vec<String> {
        self.ensure_bank(key.language);

        let source = self
            .banks
            .get(&key.language)
            .map(|bank| bank.words(key.difficulty))
            .unwrap_or_default();

        let stack = self.stacks.entry(key).or_default();

        if stack.is_empty() && source.is_empty() {
            tracing::warn!(
                language = %key.language,
                difficulty = %key.difficulty,
                "empty word list, using placeholder batch"
            );
            return PLACEHOLDER_WORDS.iter().map(|w| w.to_string()).collect();
        }

        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            if stack.is_empty() {
                *stack = source.to_vec();
                stack.shuffle(&mut self.rng);
                tracing::debug!(
                    language = %key.language,
                    difficulty = %key.difficulty,
                    size = stack.len(),
                    "reshuffled word stack"
                );
            }

            match stack.pop() {
                Some(word) => batch.push(word),
                None => break,
            }
        }

        batch
    }

    /// Forget the in-progress stack for `key`; the next fetch starts a fresh shuffle.
    pub fn reset(&mut self, key: SessionKey) {
        self.stacks.remove(&key);
    }

    /// Words still waiting in the current shuffle for `key`
    pub fn remaining(&self, key: SessionKey) -> usize {
        self.stacks.get(&key).map_or(0, Vec::len)
    }

    fn ensure_bank(&mut self, language: Language) {
        let provider = &self.provider;
        self.banks.entry(language).or_insert_with(|| {
            match provider.load(language) {
                Ok(bank) => {
                    tracing::info!(%language, name = %bank.name, "loaded word list");
                    bank
                }
                Err(err) => {
                    tracing::warn!(%language, error = %err, "word list unavailable, using fallback");
                    WordBank::fallback(language)
                }
            }
        });
    }
}
