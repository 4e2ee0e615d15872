//! Date windows and backend date normalization.
//!
//! All dates are local-midnight `NaiveDate`s; the canonical wire form is
//! the ISO `YYYY-MM-DD` string. Only the composition root should ever
//! consult a timezone (to resolve "today").

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::constants::DEFAULT_WINDOW_DAYS;

/// An inclusive, contiguous range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Build a window from two dates, swapping them if given reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateWindow { start: a, end: b }
        } else {
            DateWindow { start: b, end: a }
        }
    }

    /// Window of `window_size_days` around a center date:
    /// `center ± floor(window_size_days / 2)` days, inclusive.
    ///
    /// Note the actual day count is `2 * floor(window_size_days / 2) + 1`,
    /// so the default size of 31 yields exactly 31 days and a size of 1
    /// yields the center date alone.
    pub fn around(center: NaiveDate, window_size_days: u32) -> Self {
        let half = Days::new(u64::from(window_size_days / 2));
        let start = center.checked_sub_days(half).unwrap_or(NaiveDate::MIN);
        let end = center.checked_add_days(half).unwrap_or(NaiveDate::MAX);
        DateWindow { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether this window fully covers `other`.
    pub fn contains(&self, other: &DateWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest window spanning both operands. Never shrinks either one.
    pub fn union(&self, other: &DateWindow) -> DateWindow {
        DateWindow {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Every date in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn day_count(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }
}

impl Default for DateWindow {
    /// Default window: `DEFAULT_WINDOW_DAYS` around the Unix epoch date.
    /// Callers almost always want [`DateWindow::around`] with a real
    /// center instead.
    fn default() -> Self {
        DateWindow::around(NaiveDate::default(), DEFAULT_WINDOW_DAYS)
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Normalize a raw backend date string to a `NaiveDate`.
///
/// The backend is not consistent about its date column. Accepted forms,
/// in order:
/// 1. Canonical `YYYY-MM-DD` — passes through silently.
/// 2. Day-first `DD-MM-YYYY` (two-digit years promoted to `20YY`) —
///    accepted with a warning.
/// 3. Fallbacks: an ISO-8601 datetime prefix, or slashed `DD/MM/YYYY` —
///    accepted with a warning.
///
/// Returns `None` when nothing applies; callers must not drop such rows
/// silently.
pub fn normalize_backend_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if let Some(date) = parse_iso(trimmed) {
        return Some(date);
    }

    if let Some(date) = parse_day_first(trimmed) {
        warn!(raw, normalized = %date, "calendar date not in canonical form, assumed day-first");
        return Some(date);
    }

    if let Some(date) = parse_loose(trimmed) {
        warn!(raw, normalized = %date, "calendar date required fallback parsing");
        return Some(date);
    }

    None
}

/// Strict `YYYY-MM-DD`. The year segment must be four digits so that
/// day-first strings like `05-03-24` never land here.
fn parse_iso(s: &str) -> Option<NaiveDate> {
    let (year, _) = s.split_once('-')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `DD-MM-YYYY` or `DD-MM-YY` with the short year promoted into the 2000s.
fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;
    if (0..100).contains(&year) {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Last-resort forms occasionally seen in exported rows.
fn parse_loose(s: &str) -> Option<NaiveDate> {
    // Datetime with a canonical date prefix ("2024-03-05T12:00:00Z")
    if let Some(prefix) = s.get(..10) {
        if let Some(date) = parse_iso(prefix) {
            return Some(date);
        }
    }

    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_around_default_size_spans_31_days() {
        let window = DateWindow::around(date(2024, 3, 16), 31);
        assert_eq!(window.start(), date(2024, 3, 1));
        assert_eq!(window.end(), date(2024, 3, 31));
        assert_eq!(window.day_count(), 31);
    }

    #[test]
    fn test_around_size_one_is_the_center_alone() {
        let window = DateWindow::around(date(2024, 3, 5), 1);
        assert_eq!(window.start(), window.end());
        assert_eq!(window.day_count(), 1);
        assert_eq!(window.days().collect::<Vec<_>>(), vec![date(2024, 3, 5)]);
    }

    #[test]
    fn test_union_spans_both_and_never_shrinks() {
        let a = DateWindow::new(date(2024, 3, 1), date(2024, 3, 10));
        let b = DateWindow::new(date(2024, 3, 8), date(2024, 3, 20));
        let u = a.union(&b);
        assert_eq!(u, DateWindow::new(date(2024, 3, 1), date(2024, 3, 20)));
        assert_eq!(u, b.union(&a));
        assert!(u.contains(&a));
        assert!(u.contains(&b));
    }

    #[test]
    fn test_union_of_disjoint_windows_covers_the_gap() {
        let a = DateWindow::new(date(2024, 3, 1), date(2024, 3, 3));
        let b = DateWindow::new(date(2024, 3, 10), date(2024, 3, 12));
        let u = a.union(&b);
        assert_eq!(u.day_count(), 12);
        assert!(u.contains_date(date(2024, 3, 6)));
    }

    #[test]
    fn test_contains_requires_full_coverage() {
        let outer = DateWindow::new(date(2024, 3, 1), date(2024, 3, 31));
        let inner = DateWindow::new(date(2024, 3, 5), date(2024, 3, 20));
        let straddling = DateWindow::new(date(2024, 3, 20), date(2024, 4, 2));
        assert!(outer.contains(&inner));
        assert!(!outer.contains(&straddling));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_days_iterates_every_date_without_gaps() {
        let window = DateWindow::new(date(2024, 2, 27), date(2024, 3, 2));
        let days: Vec<_> = window.days().collect();
        // 2024 is a leap year, so Feb 29 must be present
        assert_eq!(
            days,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1),
                date(2024, 3, 2),
            ]
        );
    }

    #[test]
    fn test_normalize_canonical_passes_through() {
        assert_eq!(normalize_backend_date("2024-03-05"), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_normalize_day_first_is_reordered() {
        assert_eq!(normalize_backend_date("05-03-2024"), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_normalize_promotes_two_digit_years() {
        assert_eq!(normalize_backend_date("05-03-24"), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_normalize_accepts_datetime_prefix() {
        assert_eq!(
            normalize_backend_date("2024-03-05T12:30:00Z"),
            Some(date(2024, 3, 5))
        );
    }

    #[test]
    fn test_normalize_accepts_slashed_day_first() {
        assert_eq!(normalize_backend_date("05/03/2024"), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_backend_date("not a date"), None);
        assert_eq!(normalize_backend_date("99-99-2024"), None);
        assert_eq!(normalize_backend_date(""), None);
    }
}
