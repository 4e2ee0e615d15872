//! Class playback: event data, trigger matching, position sampling.

pub mod event;
pub mod matcher;
pub mod watcher;

pub use event::{
    ActiveEvent, EventDefinition, EventKind, EventPayload, EventVariant, MediaAttachment,
    MediaKind,
};
pub use matcher::EventMatcher;
pub use watcher::{PlaybackWatcher, PositionSource};
