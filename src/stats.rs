use std::time::Instant;

/// Health a session starts with
pub const INITIAL_HP: u32 = 5;

/// Characters counted as one word for WPM
const CHARS_PER_WORD: f64 = 5.0;

/// Running counters of a session plus health
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    pub words_typed: u32,
    pub correct_words: u32,
    pub incorrect_words: u32,
    pub total_typed_characters: usize,
    pub wpm: f64,
    pub accuracy: f64,
    pub started_at: Option<Instant>,
    pub current_hp: u32,
    pub max_hp: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new(INITIAL_HP)
    }
}

impl GameStats {
    pub fn new(max_hp: u32) -> Self {
        Self {
            words_typed: 0,
            correct_words: 0,
            incorrect_words: 0,
            total_typed_characters: 0,
            wpm: 0.0,
            accuracy: 0.0,
            started_at: None,
            current_hp: max_hp,
            max_hp,
        }
    }

    /// Fresh stats for a session starting at `now`
    pub fn started(max_hp: u32, now: Instant) -> Self {
        Self {
            started_at: Some(now),
            ..Self::new(max_hp)
        }
    }

    /// Count a finished word and refresh the derived metrics
    pub fn record_completion(&mut self, word: &str, correct: bool, now: Instant) {
        self.words_typed += 1;
        if correct {
            self.correct_words += 1;
        } else {
            self.incorrect_words += 1;
        }
        self.total_typed_characters += word.chars().count();
        self.refresh(now);
    }

    /// A word reached the ground: an incorrect word with no typed characters,
    /// and one health point lost
    pub fn record_miss(&mut self) {
        self.words_typed += 1;
        self.incorrect_words += 1;
        self.accuracy = self.calc_accuracy();
        self.lose_hp(1);
    }

    pub fn lose_hp(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    pub fn is_depleted(&self) -> bool {
        self.current_hp == 0
    }

    /// Move the start forward, excluding a pause from elapsed time
    pub fn shift_start(&mut self, by: std::time::Duration) {
        if let Some(started) = self.started_at {
            self.started_at = Some(started + by);
        }
    }

    fn refresh(&mut self, now: Instant) {
        self.accuracy = self.calc_accuracy();
        self.wpm = self.calc_wpm(now);
    }

    fn calc_accuracy(&self) -> f64 {
        if self.words_typed == 0 {
            return 0.0;
        }
        (self.correct_words as f64 / self.words_typed as f64) * 100.0
    }

    /// Words per minute since the start; 0 when it cannot be computed
    pub fn calc_wpm(&self, now: Instant) -> f64 {
        let Some(started) = self.started_at else {
            return 0.0;
        };

        let minutes = now.saturating_duration_since(started).as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }

        let wpm = (self.total_typed_characters as f64 / CHARS_PER_WORD) / minutes;
        if wpm.is_finite() {
            wpm
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn assert_counts_consistent(stats: &GameStats) {
        assert_eq!(
            stats.correct_words + stats.incorrect_words,
            stats.words_typed
        );
        assert!((0.0..=100.0).contains(&stats.accuracy));
        assert!(stats.current_hp <= stats.max_hp);
    }

    #[test]
    fn test_new_stats() {
        let stats = GameStats::default();
        assert_eq!(stats.current_hp, INITIAL_HP);
        assert_eq!(stats.words_typed, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.wpm, 0.0);
        assert!(stats.started_at.is_none());
    }

    #[test]
    fn test_record_correct_completion() {
        let t0 = Instant::now();
        let mut stats = GameStats::started(5, t0);

        stats.record_completion("hello", true, t0 + Duration::from_secs(60));

        assert_eq!(stats.words_typed, 1);
        assert_eq!(stats.correct_words, 1);
        assert_eq!(stats.total_typed_characters, 5);
        assert_eq!(stats.accuracy, 100.0);
        assert!((stats.wpm - 1.0).abs() < 1e-9);
        assert_counts_consistent(&stats);
    }

    #[test]
    fn test_wpm_uses_elapsed_minutes() {
        let t0 = Instant::now();
        let mut stats = GameStats::started(5, t0);

        stats.record_completion("rainbow", true, t0 + Duration::from_secs(10));
        stats.record_completion("moon", true, t0 + Duration::from_secs(30));

        // 11 chars = 2.2 words in half a minute
        assert!((stats.wpm - 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_wpm_zero_without_elapsed_time() {
        let t0 = Instant::now();
        let mut stats = GameStats::started(5, t0);
        stats.record_completion("cat", true, t0);
        assert_eq!(stats.wpm, 0.0);

        let unstarted = GameStats::default();
        assert_eq!(unstarted.calc_wpm(t0), 0.0);
    }

    #[test]
    fn test_miss_counts_as_incorrect_and_costs_hp() {
        let t0 = Instant::now();
        let mut stats = GameStats::started(5, t0);

        stats.record_completion("cat", true, t0 + Duration::from_secs(1));
        stats.record_miss();

        assert_eq!(stats.words_typed, 2);
        assert_eq!(stats.incorrect_words, 1);
        assert_eq!(stats.total_typed_characters, 3);
        assert_eq!(stats.accuracy, 50.0);
        assert_eq!(stats.current_hp, 4);
        assert_counts_consistent(&stats);
    }

    #[test]
    fn test_hp_clamps_at_zero() {
        let mut stats = GameStats::new(1);
        stats.record_miss();
        stats.record_miss();

        assert_eq!(stats.current_hp, 0);
        assert!(stats.is_depleted());
        assert_counts_consistent(&stats);
    }

    #[test]
    fn test_shift_start() {
        let t0 = Instant::now();
        let mut stats = GameStats::started(5, t0);
        stats.shift_start(Duration::from_secs(5));
        assert_eq!(stats.started_at, Some(t0 + Duration::from_secs(5)));
    }
}
