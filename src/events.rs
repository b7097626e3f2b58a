use std::io::{self, Write};

use crate::word::WordId;

/// Fire-and-forget audio cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SoundCue {
    Correct,
    HpLoss,
    GameOver,
}

/// Something that happened during a tick or an input change, for the
/// presentation and audio layers to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: WordId, text: String },
    Missed { id: WordId, text: String },
    Matched { id: WordId, text: String },
    LevelUp { level: u32 },
    GameOver,
    Sound(SoundCue),
}

impl GameEvent {
    pub fn sound(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Sound(cue) => Some(*cue),
            _ => None,
        }
    }
}

/// Receiver of sound cues. Playback failures are swallowed.
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);

    fn play_events(&mut self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(GameEvent::sound) {
            self.play(cue);
        }
    }
}

/// Rings the terminal bell
pub struct TerminalBell<W: Write = io::Stdout> {
    out: W,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SoundSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) {
        // one bell for a hit, two for damage, three for the end
        let rings = match cue {
            SoundCue::Correct => 1,
            SoundCue::HpLoss => 2,
            SoundCue::GameOver => 3,
        };
        let _ = self
            .out
            .write_all(&[0x07; 3][..rings])
            .and_then(|_| self.out.flush());
    }
}

/// Discards every cue (muted)
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}
