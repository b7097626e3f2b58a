// Library surface for the terminal front end and headless/integration tests.
pub mod app_dirs;
pub mod config;
pub mod difficulty;
pub mod events;
pub mod indicator;
pub mod language;
pub mod matcher;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod word;

pub use difficulty::Difficulty;
pub use events::{GameEvent, SoundCue, SoundSink};
pub use language::Language;
pub use session::{Game, Phase};
