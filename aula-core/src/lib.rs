//! Core engine for the aula class portal.
//!
//! Two subsystems share one backend seam:
//! - `schedule`: date-window fetching, subject grouping and an
//!   in-memory cache that widens as the user navigates
//! - `playback`: trigger-second class events matched against the
//!   playback position while a recorded class plays
//!
//! Consumers construct a [`ScheduleBackend`] implementation for their
//! data source and inject it; nothing in here talks to the network on
//! its own.

pub mod backend;
pub mod config;
pub mod constants;
pub mod date;
pub mod error;
pub mod playback;
pub mod schedule;

// Re-export the surface consumers actually touch.
pub use backend::{CalendarRow, EventDefinitionRow, EventVariantRow, ScheduleBackend};
pub use config::AulaConfig;
pub use date::DateWindow;
pub use error::{ConfigError, EventLoadError, QueryError, ScheduleFetchError};
pub use playback::{
    ActiveEvent, EventDefinition, EventKind, EventMatcher, EventPayload, EventVariant,
    MediaAttachment, MediaKind, PlaybackWatcher, PositionSource,
};
pub use schedule::day::{CalendarDay, ClassItem, SubjectBlock};
pub use schedule::{ScheduleOptions, ScheduleService};
