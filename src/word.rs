use rand::Rng;

pub type WordId = u64;

/// Decoration carried by a falling word
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum DecorItem {
    Fairy,
    Rainbow,
    Diamond,
    MagicWand,
    CherryBlossom,
    Clover,
}

impl DecorItem {
    pub const ALL: [DecorItem; 6] = [
        DecorItem::Fairy,
        DecorItem::Rainbow,
        DecorItem::Diamond,
        DecorItem::MagicWand,
        DecorItem::CherryBlossom,
        DecorItem::Clover,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn glyph(&self) -> char {
        match self {
            DecorItem::Fairy => '🧚',
            DecorItem::Rainbow => '🌈',
            DecorItem::Diamond => '💎',
            DecorItem::MagicWand => '🪄',
            DecorItem::CherryBlossom => '🌸',
            DecorItem::Clover => '🍀',
        }
    }
}

/// A word on its way down the field. Positions are in field pixels, `top`
/// measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct FallingWord {
    pub id: WordId,
    pub text: String,
    pub top: f64,
    pub left: f64,
    /// Global fall speed at the moment this word spawned
    pub speed: f64,
    pub item: DecorItem,
}

impl FallingWord {
    /// Top of this word after one more tick at `speed`
    pub fn next_top(&self, speed: f64) -> f64 {
        self.top + speed
    }
}
