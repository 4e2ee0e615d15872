//! Shared constants for schedule windows and playback matching.

use std::time::Duration;

/// Default number of days in a schedule window (roughly one month,
/// centered on the requested date).
pub const DEFAULT_WINDOW_DAYS: u32 = 31;

/// How long a fetched schedule window stays fresh before a re-fetch.
pub const SCHEDULE_TTL: Duration = Duration::from_secs(10 * 60);

/// An event is eligible while the playhead is within this many seconds
/// of its trigger second, on either side.
pub const TRIGGER_TOLERANCE_SECS: u32 = 5;

/// Period of the playback poll that backs up coarse position-change
/// notifications.
pub const POLL_PERIOD: Duration = Duration::from_secs(1);

/// Color used for subjects with no palette entry.
pub const DEFAULT_SUBJECT_COLOR: &str = "#718096";
