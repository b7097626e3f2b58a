//! Per-frame step of a running session: fall, misses, spawning, marker expiry.

use std::time::Instant;

use crate::{
    events::{GameEvent, SoundCue},
    session::{Game, Phase},
    word::{DecorItem, FallingWord},
};

impl Game {
    /// Advance the session by one tick at time `now`.
    ///
    /// Does nothing unless the session is playing. Misses are settled before a
    /// spawn is attempted, and the session ends in the same tick health runs out.
    pub fn advance(&mut self, now: Instant) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }

        let mut events = Vec::new();

        for word in self.fall() {
            self.stats.record_miss();
            self.indicators.push(
                self.field.height - self.field.indicator_offset,
                word.left,
                now,
            );
            tracing::debug!(
                id = word.id,
                text = %word.text,
                hp = self.stats.current_hp,
                "word missed"
            );
            events.push(GameEvent::Missed {
                id: word.id,
                text: word.text,
            });
            events.push(GameEvent::Sound(SoundCue::HpLoss));
        }

        if let Some(spawned) = self.try_spawn(now) {
            events.push(spawned);
        }

        self.indicators.expire(now);

        if self.stats.is_depleted() {
            events.extend(self.end());
        }

        self.maybe_refill();

        events
    }

    /// Move every falling word down by the global speed, returning those that
    /// crossed the bottom edge
    fn fall(&mut self) -> Vec<FallingWord> {
        let speed = self.speed;
        let height = self.field.height;

        let (missed, mut falling): (Vec<_>, Vec<_>) = std::mem::take(&mut self.falling)
            .into_iter()
            .partition(|word| word.next_top(speed) > height);

        for word in &mut falling {
            word.top = word.next_top(speed);
        }
        self.falling = falling;

        missed
    }

    fn try_spawn(&mut self, now: Instant) -> Option<GameEvent> {
        let last_spawn = self.last_spawn_at?;
        if now.saturating_duration_since(last_spawn) <= self.spawn_interval {
            return None;
        }
        if self.falling.len() >= self.difficulty.config().max_words_on_screen {
            return None;
        }

        let text = self.queue.pop_front()?;
        if text.trim().is_empty() {
            tracing::warn!("skipping blank queued word");
            return None;
        }

        self.next_word_id += 1;
        let word = FallingWord {
            id: self.next_word_id,
            text,
            top: self.field.spawn_top,
            left: self.field.spawn_left(&mut self.rng),
            speed: self.speed,
            item: DecorItem::random(&mut self.rng),
        };
        self.last_spawn_at = Some(now);

        tracing::debug!(id = word.id, text = %word.text, left = word.left, "word spawned");
        let event = GameEvent::Spawned {
            id: word.id,
            text: word.text.clone(),
        };
        self.falling.push(word);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        difficulty::Difficulty,
        events::{GameEvent, SoundCue},
        language::{Language, WordBatch},
        session::{Game, Phase},
        word::{DecorItem, FallingWord},
    };
    use std::time::{Duration, Instant};

    fn playing(difficulty: Difficulty, words: &[&str], t0: Instant) -> Game {
        let mut game = Game::with_seed(9);
        game.start(difficulty, Language::English, t0);
        game.take_supply_requests();
        game.receive_batch(WordBatch {
            generation: game.generation(),
            words: words.iter().map(|w| w.to_string()).collect(),
        });
        game.take_supply_requests();
        game
    }

    fn place(game: &mut Game, text: &str, top: f64, left: f64) {
        game.next_word_id += 1;
        game.falling.push(FallingWord {
            id: game.next_word_id,
            text: text.to_string(),
            top,
            left,
            speed: game.speed,
            item: DecorItem::Fairy,
        });
    }

    fn ms(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    #[test]
    fn test_idle_game_does_not_advance() {
        let mut game = Game::with_seed(1);
        assert!(game.advance(Instant::now()).is_empty());
    }

    #[test]
    fn test_words_fall_by_global_speed() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Medium, &[], t0);
        place(&mut game, "one", 10.0, 200.0);
        place(&mut game, "two", 100.0, 300.0);

        game.advance(t0);

        let tops: Vec<f64> = game.falling_words().iter().map(|w| w.top).collect();
        assert_eq!(tops.len(), 2);
        assert!((tops[0] - 10.8).abs() < 1e-9);
        assert!((tops[1] - 100.8).abs() < 1e-9);
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["cat", "dog"], t0);

        assert!(game.advance(ms(t0, 2500)).is_empty());
        assert!(game.falling_words().is_empty());

        let events = game.advance(ms(t0, 2501));
        assert_eq!(
            events,
            vec![GameEvent::Spawned {
                id: 1,
                text: "cat".into()
            }]
        );
        let word = &game.falling_words()[0];
        assert_eq!(word.top, -50.0);
        assert!(word.left >= 120.0 && word.left < 520.0);
        assert_eq!(word.speed, 0.6);
    }

    #[test]
    fn test_one_spawn_per_tick_and_interval_restarts() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["a", "b", "c"], t0);

        game.advance(ms(t0, 3000));
        game.advance(ms(t0, 3001));
        assert_eq!(game.falling_words().len(), 1);

        game.advance(ms(t0, 5501));
        assert_eq!(game.falling_words().len(), 2);
    }

    #[test]
    fn test_spawn_respects_max_on_screen() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["a", "b", "c", "d", "e"], t0);

        let mut now = 0;
        for _ in 0..6 {
            now += 2600;
            game.advance(ms(t0, now));
        }

        assert_eq!(game.falling_words().len(), 3);
        assert_eq!(game.queue_len(), 2);
    }

    #[test]
    fn test_empty_queue_skips_spawn() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &[], t0);

        let events = game.advance(ms(t0, 10_000));

        assert!(events.is_empty());
        assert!(game.falling_words().is_empty());
        // queue is empty, a refill is on its way
        assert!(game.fetch_in_flight());
    }

    #[test]
    fn test_blank_word_skips_spawn_without_resetting_timer() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["  ", "cat"], t0);

        assert!(game.advance(ms(t0, 3000)).is_empty());
        assert!(game.falling_words().is_empty());

        let events = game.advance(ms(t0, 3001));
        assert_eq!(events.len(), 1);
        assert_eq!(game.falling_words()[0].text, "cat");
    }

    #[test]
    fn test_easy_word_missed_after_834_ticks() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["cat"], t0);
        let now = ms(t0, 2501);

        game.advance(now);
        assert_eq!(game.falling_words().len(), 1);

        let mut ticks = 0;
        let mut missed_on = None;
        while ticks < 2000 {
            ticks += 1;
            let events = game.advance(now);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::Missed { .. }))
            {
                missed_on = Some(ticks);
                break;
            }
        }

        assert_eq!(missed_on, Some(834));
        assert_eq!(game.stats().current_hp, 4);
        assert_eq!(game.stats().incorrect_words, 1);
        assert_eq!(game.stats().words_typed, 1);
        assert!(game.falling_words().is_empty());
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_miss_emits_indicator_and_sound() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &[], t0);
        place(&mut game, "late", 449.9, 333.0);

        let events = game.advance(t0);

        assert_eq!(
            events,
            vec![
                GameEvent::Missed {
                    id: 1,
                    text: "late".into()
                },
                GameEvent::Sound(SoundCue::HpLoss),
            ]
        );
        let marker = game.indicators().iter().next().unwrap();
        assert_eq!(marker.top, 430.0);
        assert_eq!(marker.left, 333.0);
        assert_eq!(marker.created_at, t0);
    }

    #[test]
    fn test_indicators_expire() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &[], t0);
        place(&mut game, "late", 449.9, 333.0);

        game.advance(t0);
        game.advance(ms(t0, 1499));
        assert_eq!(game.indicators().len(), 1);

        game.advance(ms(t0, 1500));
        assert!(game.indicators().is_empty());
    }

    #[test]
    fn test_misses_settled_before_spawn() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["fresh"], t0);
        place(&mut game, "a", 449.5, 150.0);
        place(&mut game, "b", 449.5, 250.0);
        place(&mut game, "c", 100.0, 350.0);

        // screen is full (3 of 3) until the two misses are removed
        let events = game.advance(ms(t0, 3000));

        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                GameEvent::Missed { .. } => "missed",
                GameEvent::Spawned { .. } => "spawned",
                GameEvent::Sound(_) => "sound",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["missed", "sound", "missed", "sound", "spawned"]);
        assert_eq!(game.falling_words().len(), 2);
        assert_eq!(game.stats().current_hp, 3);
    }

    #[test]
    fn test_double_miss_at_one_hp_ends_game_same_tick() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["x", "y", "z"], t0);
        game.stats.current_hp = 1;
        place(&mut game, "a", 450.0, 150.0);
        place(&mut game, "b", 450.0, 250.0);

        let events = game.advance(ms(t0, 100));

        assert_eq!(game.stats().current_hp, 0);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.stats().incorrect_words, 2);
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(
            events.last(),
            Some(&GameEvent::Sound(SoundCue::GameOver))
        );

        // frozen afterwards
        let frozen_tops: Vec<f64> = game.falling_words().iter().map(|w| w.top).collect();
        assert!(game.advance(ms(t0, 5000)).is_empty());
        let tops: Vec<f64> = game.falling_words().iter().map(|w| w.top).collect();
        assert_eq!(tops, frozen_tops);
    }

    #[test]
    fn test_paused_game_does_not_fall_or_spawn() {
        let t0 = Instant::now();
        let mut game = playing(Difficulty::Easy, &["a", "b"], t0);
        place(&mut game, "c", 10.0, 200.0);

        game.pause(ms(t0, 1000));
        assert!(game.advance(ms(t0, 9000)).is_empty());
        assert_eq!(game.falling_words()[0].top, 10.0);

        // 8s paused: the interval counts from the shifted last spawn
        game.resume(ms(t0, 9000));
        let events = game.advance(ms(t0, 9100));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::Spawned { .. })));
    }

    #[test]
    fn test_counts_stay_consistent_over_long_run() {
        let t0 = Instant::now();
        let words: Vec<String> = (0..40).map(|i| format!("w{i}")).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut game = playing(Difficulty::Hard, &refs, t0);

        for tick in 0..20_000u64 {
            game.advance(ms(t0, tick * 16));
            let stats = game.stats();
            assert_eq!(stats.correct_words + stats.incorrect_words, stats.words_typed);
            assert!((0.0..=100.0).contains(&stats.accuracy));
            assert!(stats.current_hp <= stats.max_hp);
            if game.phase() != Phase::Playing {
                break;
            }
        }

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.stats().current_hp, 0);
    }
}
