pub mod config;
pub mod drawing;
pub mod error;
pub mod guess_scripter;
pub mod phase;
pub mod profile;
pub mod round_timer;
pub mod schedule;
pub mod scoring;
pub mod sequencer;
pub mod session;
pub mod session_events;
pub mod word_catalog;

// Re-export main components
pub use config::*;
pub use drawing::*;
pub use error::*;
pub use guess_scripter::*;
pub use phase::*;
pub use profile::*;
pub use round_timer::*;
pub use schedule::*;
pub use scoring::*;
pub use sequencer::*;
pub use session::*;
pub use session_events::*;
pub use word_catalog::*;
