//! In-memory schedule cache: coverage tracking, freshness, merging.
//!
//! One `CacheSlot` lives inside each `ScheduleService` (the cache is an
//! injected object, not process-global state). The slot also carries the
//! request sequence that guards against a slow, superseded fetch
//! overwriting data a newer fetch already committed.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::Instant;

use crate::date::DateWindow;
use crate::schedule::day::CalendarDay;

/// The cached schedule for one user.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub owner_user_id: String,
    /// Span guaranteed fully populated in `days`.
    pub coverage: DateWindow,
    /// May hold dates outside `coverage`; that superset is tolerated.
    pub days: BTreeMap<NaiveDate, CalendarDay>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.fetched_at) < ttl
    }

    /// Whether a read for `window` can be answered from this entry.
    pub fn serves(&self, user_id: &str, window: &DateWindow, now: Instant, ttl: Duration) -> bool {
        self.owner_user_id == user_id && self.coverage.contains(window) && self.is_fresh(now, ttl)
    }

    /// Widen coverage to the union span and merge days key-by-key, new
    /// entries winning. Coverage only ever grows here.
    fn merge(&mut self, window: &DateWindow, days: BTreeMap<NaiveDate, CalendarDay>, now: Instant) {
        self.coverage = self.coverage.union(window);
        self.days.extend(days);
        self.fetched_at = now;
    }
}

/// Cache entry plus the request-sequence guard.
#[derive(Debug, Default)]
pub(crate) struct CacheSlot {
    pub entry: Option<CacheEntry>,
    latest_request: u64,
}

impl CacheSlot {
    /// Register a new fetch and return its sequence number. Only the
    /// most recently issued sequence is allowed to commit.
    pub fn begin_request(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }

    pub fn is_current(&self, sequence: u64) -> bool {
        sequence == self.latest_request
    }

    /// Commit a fetch result. Returns `false` (leaving the cache
    /// untouched) when the fetch has been superseded by a newer request
    /// or an invalidation.
    pub fn commit(
        &mut self,
        sequence: u64,
        user_id: &str,
        window: &DateWindow,
        days: BTreeMap<NaiveDate, CalendarDay>,
        now: Instant,
    ) -> bool {
        if !self.is_current(sequence) {
            return false;
        }

        match &mut self.entry {
            Some(entry) if entry.owner_user_id == user_id => entry.merge(window, days, now),
            // Different user (or empty slot): replace wholesale, no
            // per-user partitioning beyond that.
            _ => {
                self.entry = Some(CacheEntry {
                    owner_user_id: user_id.to_string(),
                    coverage: *window,
                    days,
                    fetched_at: now,
                });
            }
        }
        true
    }

    /// Drop everything and fence off in-flight fetches.
    pub fn invalidate(&mut self) {
        self.entry = None;
        self.latest_request += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::day::SubjectBlock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day_with_subject(date: NaiveDate, subject: &str) -> CalendarDay {
        CalendarDay {
            date,
            subjects: vec![SubjectBlock::new("row-1", subject, "#3182CE")],
        }
    }

    fn days_of(days: Vec<CalendarDay>) -> BTreeMap<NaiveDate, CalendarDay> {
        days.into_iter().map(|d| (d.date, d)).collect()
    }

    const TTL: Duration = Duration::from_secs(600);

    #[test]
    fn test_serves_requires_owner_coverage_and_freshness() {
        let now = Instant::now();
        let coverage = DateWindow::new(date(2024, 3, 1), date(2024, 3, 31));
        let entry = CacheEntry {
            owner_user_id: "user-1".to_string(),
            coverage,
            days: BTreeMap::new(),
            fetched_at: now,
        };

        let inside = DateWindow::new(date(2024, 3, 5), date(2024, 3, 20));
        let outside = DateWindow::new(date(2024, 3, 20), date(2024, 4, 5));

        assert!(entry.serves("user-1", &inside, now, TTL));
        assert!(!entry.serves("user-2", &inside, now, TTL));
        assert!(!entry.serves("user-1", &outside, now, TTL));
        // Zero TTL means the entry is already stale
        assert!(!entry.serves("user-1", &inside, now, Duration::ZERO));
    }

    #[test]
    fn test_commit_widens_coverage_and_new_days_win() {
        let now = Instant::now();
        let mut slot = CacheSlot::default();

        let first_window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 10));
        let seq = slot.begin_request();
        assert!(slot.commit(
            seq,
            "user-1",
            &first_window,
            days_of(vec![day_with_subject(date(2024, 3, 5), "Física")]),
            now,
        ));

        let second_window = DateWindow::new(date(2024, 3, 5), date(2024, 3, 20));
        let seq = slot.begin_request();
        assert!(slot.commit(
            seq,
            "user-1",
            &second_window,
            days_of(vec![day_with_subject(date(2024, 3, 5), "Química")]),
            now,
        ));

        let entry = slot.entry.as_ref().unwrap();
        assert_eq!(
            entry.coverage,
            DateWindow::new(date(2024, 3, 1), date(2024, 3, 20))
        );
        // Same-key day was overwritten by the newer fetch
        assert_eq!(entry.days[&date(2024, 3, 5)].subjects[0].name, "Química");
    }

    #[test]
    fn test_superseded_sequence_cannot_commit() {
        let now = Instant::now();
        let mut slot = CacheSlot::default();

        let stale_seq = slot.begin_request();
        let fresh_seq = slot.begin_request();

        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 10));
        assert!(slot.commit(fresh_seq, "user-1", &window, BTreeMap::new(), now));

        let wide = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31));
        assert!(!slot.commit(stale_seq, "user-1", &wide, BTreeMap::new(), now));

        // The stale fetch neither replaced data nor widened coverage
        assert_eq!(slot.entry.as_ref().unwrap().coverage, window);
    }

    #[test]
    fn test_commit_for_other_user_replaces_wholesale() {
        let now = Instant::now();
        let mut slot = CacheSlot::default();

        let window_a = DateWindow::new(date(2024, 3, 1), date(2024, 3, 10));
        let seq = slot.begin_request();
        slot.commit(
            seq,
            "user-1",
            &window_a,
            days_of(vec![day_with_subject(date(2024, 3, 5), "Física")]),
            now,
        );

        let window_b = DateWindow::new(date(2024, 6, 1), date(2024, 6, 10));
        let seq = slot.begin_request();
        slot.commit(seq, "user-2", &window_b, BTreeMap::new(), now);

        let entry = slot.entry.as_ref().unwrap();
        assert_eq!(entry.owner_user_id, "user-2");
        assert_eq!(entry.coverage, window_b);
        assert!(entry.days.is_empty());
    }

    #[test]
    fn test_invalidate_drops_entry_and_fences_in_flight_commits() {
        let now = Instant::now();
        let mut slot = CacheSlot::default();

        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 10));
        let seq = slot.begin_request();
        slot.commit(seq, "user-1", &window, BTreeMap::new(), now);

        let in_flight = slot.begin_request();
        slot.invalidate();

        assert!(slot.entry.is_none());
        assert!(!slot.commit(in_flight, "user-1", &window, BTreeMap::new(), now));
        assert!(slot.entry.is_none());
    }
}
