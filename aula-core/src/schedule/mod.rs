//! Schedule windows: fetch, group, cache.
//!
//! `ScheduleService` answers "what does this user's calendar look like
//! around this date" with one `CalendarDay` per requested date, serving
//! repeat reads from an in-memory cache that widens as the user
//! navigates. The cache is owned by the service instance — composition
//! roots inject it where schedule data is needed instead of sharing
//! hidden global state.

mod cache;
pub mod day;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::backend::{CalendarRow, ScheduleBackend};
use crate::constants::{DEFAULT_WINDOW_DAYS, SCHEDULE_TTL};
use crate::date::{DateWindow, normalize_backend_date};
use crate::error::ScheduleFetchError;
use crate::schedule::cache::CacheSlot;
use crate::schedule::day::{CalendarDay, ClassItem, SubjectBlock, subject_color};

/// Tuning knobs for a [`ScheduleService`], usually sourced from
/// [`crate::config::AulaConfig`].
#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    /// Requested window size; the effective span is
    /// `2 * floor(window_days / 2) + 1` days (see [`DateWindow::around`]).
    pub window_days: u32,
    /// How long a fetched window stays fresh.
    pub ttl: Duration,
    /// Per-subject color overrides consulted before the static palette.
    pub subject_colors: HashMap<String, String>,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        ScheduleOptions {
            window_days: DEFAULT_WINDOW_DAYS,
            ttl: SCHEDULE_TTL,
            subject_colors: HashMap::new(),
        }
    }
}

/// Serves contiguous windows of per-day schedule data for one backend,
/// minimizing redundant fetches.
pub struct ScheduleService<B> {
    backend: B,
    options: ScheduleOptions,
    slot: Mutex<CacheSlot>,
}

impl<B: ScheduleBackend> ScheduleService<B> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, ScheduleOptions::default())
    }

    pub fn with_options(backend: B, options: ScheduleOptions) -> Self {
        ScheduleService {
            backend,
            options,
            slot: Mutex::new(CacheSlot::default()),
        }
    }

    /// The configured-size window around `center` for `user_id`.
    pub async fn window(
        &self,
        user_id: &str,
        center: NaiveDate,
    ) -> Result<Vec<CalendarDay>, ScheduleFetchError> {
        self.window_sized(user_id, center, self.options.window_days)
            .await
    }

    /// A window of an explicit size around `center`.
    ///
    /// Served from cache when the cached span for this user fully covers
    /// the request and is still fresh; otherwise fetched, merged into
    /// the cache, and returned. A fetch failure leaves the cache exactly
    /// as it was and surfaces as [`ScheduleFetchError`] — callers render
    /// the message and may simply retry.
    pub async fn window_sized(
        &self,
        user_id: &str,
        center: NaiveDate,
        window_size_days: u32,
    ) -> Result<Vec<CalendarDay>, ScheduleFetchError> {
        let window = DateWindow::around(center, window_size_days);

        // Cache probe and request registration happen under one lock so
        // a concurrent navigation cannot slip between them.
        let sequence = {
            let mut slot = self.slot.lock().await;
            if let Some(entry) = &slot.entry {
                if entry.serves(user_id, &window, Instant::now(), self.options.ttl) {
                    debug!(user_id, %window, "schedule window served from cache");
                    return Ok(assemble_window(&entry.days, &window));
                }
            }
            slot.begin_request()
        };
        debug!(user_id, %window, sequence, "schedule window cache miss, fetching");

        let scheduled_ids = self.backend.list_scheduled_class_ids(user_id).await?;
        if scheduled_ids.is_empty() {
            // Nothing scheduled at all: answer with empty days, skip the
            // second fetch, and leave cached coverage for other ranges
            // untouched.
            return Ok(window.days().map(CalendarDay::empty).collect());
        }

        let rows = self
            .backend
            .list_calendar_entries(&scheduled_ids, window)
            .await?;

        let mut days = self.group_rows(rows);
        for date in window.days() {
            days.entry(date).or_insert_with(|| CalendarDay::empty(date));
        }
        let result = assemble_window(&days, &window);

        // Re-validate before committing: a newer fetch (or an
        // invalidation) may have won while we were suspended, and a
        // superseded result must not regress the cache.
        let mut slot = self.slot.lock().await;
        if !slot.commit(sequence, user_id, &window, days, Instant::now()) {
            debug!(user_id, sequence, "fetch superseded, cache commit skipped");
        }

        Ok(result)
    }

    /// Drop the cached schedule entirely (e.g. on logout). The next
    /// window call for any user fetches fresh data, and fetches already
    /// in flight are prevented from committing.
    pub async fn invalidate(&self) {
        self.slot.lock().await.invalidate();
    }

    /// Group raw rows by normalized date, then by subject name within
    /// each date. Same-day rows sharing a name accumulate time ranges
    /// and classes on one block instead of duplicating it.
    fn group_rows(&self, rows: Vec<CalendarRow>) -> BTreeMap<NaiveDate, CalendarDay> {
        let mut days: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();

        for row in rows {
            let Some(date) = normalize_backend_date(&row.date) else {
                warn!(row_id = %row.id, raw = %row.date, "calendar row date unparseable, row skipped");
                continue;
            };

            let day = days.entry(date).or_insert_with(|| CalendarDay::empty(date));
            let range = format_time_range(&row.start_time, &row.finish_time);
            let item = ClassItem {
                id: row.id,
                duration_minutes: row.duration_minutes,
                order_index: row.order_index,
                sub_subject: row.sub_subject,
                link: row.link,
            };

            match day.subjects.iter_mut().find(|s| s.name == row.subject) {
                Some(block) => {
                    block.time_ranges.push(range);
                    block.classes.push(item);
                }
                None => {
                    let color = self.color_for(&row.subject);
                    let mut block = SubjectBlock::new(row.scheduled_id, row.subject, color);
                    block.time_ranges.push(range);
                    block.classes.push(item);
                    day.subjects.push(block);
                }
            }
        }

        days
    }

    fn color_for(&self, subject: &str) -> String {
        self.options
            .subject_colors
            .get(subject)
            .cloned()
            .unwrap_or_else(|| subject_color(subject).to_string())
    }

    #[cfg(test)]
    pub(crate) async fn cached_coverage(&self) -> Option<DateWindow> {
        self.slot.lock().await.entry.as_ref().map(|e| e.coverage)
    }
}

/// One day per date in the window, cloning cached days and synthesizing
/// an empty day for any date the map lacks. The synthesis also covers
/// the defensive case of a coverage gap that should not occur.
fn assemble_window(
    days: &BTreeMap<NaiveDate, CalendarDay>,
    window: &DateWindow,
) -> Vec<CalendarDay> {
    window
        .days()
        .map(|date| {
            days.get(&date)
                .cloned()
                .unwrap_or_else(|| CalendarDay::empty(date))
        })
        .collect()
}

/// `"HH:MM - HH:MM"` from the backend's clock strings.
fn format_time_range(start: &str, finish: &str) -> String {
    format!("{} - {}", format_clock(start), format_clock(finish))
}

/// Truncate `HH:MM:SS` to `HH:MM`; unparseable values pass through raw
/// rather than costing us the row.
fn format_clock(raw: &str) -> String {
    let trimmed = raw.trim();
    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return time.format("%H:%M").to_string();
        }
    }
    trimmed.to_string()
}
