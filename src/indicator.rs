use std::time::{Duration, Instant};

/// How long a health-loss marker stays on the field
pub const INDICATOR_TTL: Duration = Duration::from_millis(1500);

/// Part of the lifetime during which the marker rises and fades
pub const INDICATOR_FADE: Duration = Duration::from_millis(1000);

/// Rise of a marker over its fade, in field pixels
const RISE_PX: f64 = 50.0;

/// "-1 HP" marker left where a word hit the ground
#[derive(Debug, Clone, PartialEq)]
pub struct HpLossIndicator {
    pub id: u64,
    pub top: f64,
    pub left: f64,
    pub created_at: Instant,
}

impl HpLossIndicator {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.age(now) >= INDICATOR_TTL
    }

    /// Fade progress in 0..=1
    pub fn progress(&self, now: Instant) -> f64 {
        (self.age(now).as_secs_f64() / INDICATOR_FADE.as_secs_f64()).min(1.0)
    }

    /// Drawn position, drifting upward as the marker fades
    pub fn display_top(&self, now: Instant) -> f64 {
        self.top - RISE_PX * self.progress(now)
    }
}

/// Live health-loss markers of a session
#[derive(Debug, Default)]
pub struct Indicators {
    items: Vec<HpLossIndicator>,
    next_id: u64,
}

impl Indicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, top: f64, left: f64, now: Instant) {
        self.next_id += 1;
        self.items.push(HpLossIndicator {
            id: self.next_id,
            top,
            left,
            created_at: now,
        });
    }

    /// Remove markers older than the display duration
    pub fn expire(&mut self, now: Instant) {
        self.items.retain(|i| !i.is_expired(now));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HpLossIndicator> {
        self.items.iter()
    }
}
