use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::{
    difficulty::Difficulty,
    events::{GameEvent, SoundCue},
    indicator::Indicators,
    language::{Language, SessionKey, SupplyRequest, WordBatch, WordFeed},
    stats::{GameStats, INITIAL_HP},
    word::{FallingWord, WordId},
};

/// Refill is requested once fewer words than this are queued
pub const LOW_WATER_MARK: usize = 5;
/// Words asked for per refill
pub const REFILL_BATCH: usize = 10;
/// Correct words needed per level
pub const WORDS_PER_LEVEL: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    #[strum(to_string = "Game Over")]
    GameOver,
}

/// Geometry of the playing field, in field pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
    /// Spawned words keep at least this far from either side
    pub safe_margin: f64,
    /// Spawn height, above the visible field
    pub spawn_top: f64,
    /// Health-loss markers appear this far above the bottom edge
    pub indicator_offset: f64,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 450.0,
            safe_margin: 120.0,
            spawn_top: -50.0,
            indicator_offset: 20.0,
        }
    }
}

impl Field {
    /// Uniform horizontal spawn position inside the safe margins
    pub fn spawn_left<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let low = self.safe_margin;
        let high = self.width - self.safe_margin;
        if low < high {
            rng.gen_range(low..high)
        } else {
            self.width / 2.0
        }
    }
}

/// One game session: phase, falling words, input buffer, stats and the word queue.
///
/// Hosts drive it with [`Game::advance`] once per frame, [`Game::on_input_change`]
/// on every edit of the input buffer and [`Game::sync_words`] to keep the queue fed.
#[derive(Debug)]
pub struct Game {
    pub(crate) phase: Phase,
    pub(crate) difficulty: Difficulty,
    pub(crate) language: Language,
    pub(crate) field: Field,
    pub(crate) max_hp: u32,
    pub(crate) level: u32,
    pub(crate) speed: f64,
    pub(crate) spawn_interval: Duration,
    pub(crate) last_spawn_at: Option<Instant>,
    pub(crate) paused_at: Option<Instant>,
    pub(crate) falling: Vec<FallingWord>,
    pub(crate) next_word_id: WordId,
    pub(crate) input: String,
    pub(crate) indicators: Indicators,
    pub(crate) stats: GameStats,
    pub(crate) queue: VecDeque<String>,
    pub(crate) fetch_in_flight: bool,
    pub(crate) generation: u64,
    pub(crate) outbox: Vec<SupplyRequest>,
    pub(crate) rng: StdRng,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let difficulty = Difficulty::default();
        let cfg = difficulty.config();
        Self {
            phase: Phase::Idle,
            difficulty,
            language: Language::default(),
            field: Field::default(),
            max_hp: INITIAL_HP,
            level: 1,
            speed: cfg.initial_speed,
            spawn_interval: Duration::from_millis(cfg.spawn_interval_ms),
            last_spawn_at: None,
            paused_at: None,
            falling: Vec::new(),
            next_word_id: 0,
            input: String::new(),
            indicators: Indicators::new(),
            stats: GameStats::new(INITIAL_HP),
            queue: VecDeque::new(),
            fetch_in_flight: false,
            generation: 0,
            outbox: Vec::new(),
            rng,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.field = field;
        self
    }

    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp;
        self.stats = GameStats::new(max_hp);
        self
    }

    /// Reset everything and begin playing `difficulty` in `language`
    pub fn start(&mut self, difficulty: Difficulty, language: Language, now: Instant) {
        let cfg = difficulty.config();

        self.difficulty = difficulty;
        self.language = language;
        self.level = 1;
        self.speed = cfg.initial_speed;
        self.spawn_interval = Duration::from_millis(cfg.spawn_interval_ms);
        self.last_spawn_at = Some(now);
        self.paused_at = None;
        self.falling.clear();
        self.next_word_id = 0;
        self.input.clear();
        self.indicators.clear();
        self.stats = GameStats::started(self.max_hp, now);

        // batches still in flight for an earlier session are discarded on arrival
        self.generation += 1;
        self.queue.clear();
        self.fetch_in_flight = false;
        self.outbox.clear();
        self.outbox.push(SupplyRequest::Reset(self.session_key()));
        self.request_fetch();

        self.phase = Phase::Playing;
        tracing::info!(
            %difficulty,
            %language,
            generation = self.generation,
            "session started"
        );
    }

    /// Stop the session. Returns the game-over events, or nothing if no session was running.
    pub fn end(&mut self) -> Vec<GameEvent> {
        if !matches!(self.phase, Phase::Playing | Phase::Paused) {
            return Vec::new();
        }

        self.phase = Phase::GameOver;
        self.paused_at = None;
        tracing::info!(
            correct = self.stats.correct_words,
            missed = self.stats.incorrect_words,
            level = self.level,
            wpm = self.stats.wpm,
            "session over"
        );

        vec![GameEvent::GameOver, GameEvent::Sound(SoundCue::GameOver)]
    }

    /// Leave the results for the menu
    pub fn return_to_idle(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.phase = Phase::Idle;
        true
    }

    pub fn pause(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.phase = Phase::Paused;
        self.paused_at = Some(now);
        tracing::debug!("session paused");
        true
    }

    /// Resume play; time spent paused counts neither toward WPM nor spawn pacing
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }

        if let Some(paused_at) = self.paused_at.take() {
            let paused_for = now.saturating_duration_since(paused_at);
            self.stats.shift_start(paused_for);
            self.last_spawn_at = self.last_spawn_at.map(|t| t + paused_for);
        }

        self.phase = Phase::Playing;
        tracing::debug!("session resumed");
        true
    }

    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Playing => self.pause(now),
            Phase::Paused => self.resume(now),
            _ => false,
        }
    }

    pub fn session_key(&self) -> SessionKey {
        SessionKey::new(self.language, self.difficulty)
    }

    /// Drain the requests waiting for the word supply
    pub fn take_supply_requests(&mut self) -> Vec<SupplyRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Append a delivered batch to the queue. Returns false for a stale batch.
    pub fn receive_batch(&mut self, batch: WordBatch) -> bool {
        if batch.generation != self.generation {
            tracing::debug!(
                batch_generation = batch.generation,
                generation = self.generation,
                "discarding stale word batch"
            );
            return false;
        }

        tracing::debug!(words = batch.words.len(), "word batch received");
        self.queue.extend(batch.words);
        self.fetch_in_flight = false;
        self.maybe_refill();
        true
    }

    /// Hand pending requests to `feed` and take in whatever it has ready
    pub fn sync_words<F: WordFeed + ?Sized>(&mut self, feed: &mut F) {
        for request in self.take_supply_requests() {
            feed.submit(request);
        }
        for batch in feed.poll() {
            self.receive_batch(batch);
        }
    }

    pub(crate) fn maybe_refill(&mut self) {
        if self.phase == Phase::Playing && self.queue.len() < LOW_WATER_MARK {
            self.request_fetch();
        }
    }

    fn request_fetch(&mut self) {
        if self.fetch_in_flight {
            return;
        }
        self.fetch_in_flight = true;
        self.outbox.push(SupplyRequest::Fetch {
            key: self.session_key(),
            count: REFILL_BATCH,
            generation: self.generation,
        });
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current global fall speed in field pixels per tick
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn falling_words(&self) -> &[FallingWord] {
        &self.falling
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
