//! Topic-based event bus for runtime events.
//!
//! Every handled command and every clock tick publishes a snapshot to
//! [`Topic::State`]; lifecycle notices and audio cues go to their own topics
//! so consumers subscribe only to what they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{AudioCue, MatchNotice, MatchSnapshot};
