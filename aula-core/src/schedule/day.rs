//! Calendar-day domain types.
//!
//! A `CalendarDay` is built for every date in a requested window whether
//! or not the backend has rows for it. Days are immutable once built:
//! the cache replaces entries wholesale, never mutates them in place.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SUBJECT_COLOR;

/// One calendar date plus everything scheduled on it.
///
/// Identity is the date alone. The presentation strings the dashboard
/// shows (weekday name, labels) are recomputed on demand and never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Subjects in backend fetch order. Consumers re-sort for display.
    pub subjects: Vec<SubjectBlock>,
}

impl CalendarDay {
    pub fn empty(date: NaiveDate) -> Self {
        CalendarDay {
            date,
            subjects: Vec::new(),
        }
    }

    /// Canonical `YYYY-MM-DD` identity string.
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Full weekday name in the product locale (pt-BR).
    pub fn weekday_name(&self) -> &'static str {
        match self.date.weekday() {
            Weekday::Mon => "segunda-feira",
            Weekday::Tue => "terça-feira",
            Weekday::Wed => "quarta-feira",
            Weekday::Thu => "quinta-feira",
            Weekday::Fri => "sexta-feira",
            Weekday::Sat => "sábado",
            Weekday::Sun => "domingo",
        }
    }

    /// Compact header label, e.g. `"ter 05/03"`.
    pub fn short_label(&self) -> String {
        let abbrev = match self.date.weekday() {
            Weekday::Mon => "seg",
            Weekday::Tue => "ter",
            Weekday::Wed => "qua",
            Weekday::Thu => "qui",
            Weekday::Fri => "sex",
            Weekday::Sat => "sáb",
            Weekday::Sun => "dom",
        };
        format!("{} {}", abbrev, self.date.format("%d/%m"))
    }

    /// Day-first formatted date, e.g. `"05/03/2024"`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

/// One subject's aggregated entry on a single day.
///
/// Two backend rows with the same subject name on the same day merge
/// into one block (the name is the uniqueness key, not the row id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectBlock {
    /// Opaque id from the first row that produced this block.
    pub id: String,
    pub name: String,
    /// Hex color resolved at build time from the palette (or an
    /// override), so every consumer renders the subject consistently.
    pub color: String,
    /// `"HH:MM - HH:MM"` ranges in fetch order; one per merged row.
    pub time_ranges: Vec<String>,
    pub classes: Vec<ClassItem>,
}

impl SubjectBlock {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        SubjectBlock {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            time_ranges: Vec::new(),
            classes: Vec::new(),
        }
    }
}

/// One class occurrence inside a subject block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassItem {
    pub id: String,
    pub duration_minutes: Option<u32>,
    pub order_index: Option<u32>,
    /// Sub-subject grouping key, e.g. "Cinemática" under "Física".
    pub sub_subject: Option<String>,
    /// External material link, when the class has one.
    pub link: Option<String>,
}

/// Static palette for the subjects the platform ships. Unmapped names
/// fall back to [`DEFAULT_SUBJECT_COLOR`].
pub fn subject_color(name: &str) -> &'static str {
    match name {
        "Matemática" => "#805AD5",
        "Física" => "#3182CE",
        "Química" => "#38A169",
        "Biologia" => "#48BB78",
        "História" => "#DD6B20",
        "Geografia" => "#D69E2E",
        "Português" => "#E53E3E",
        "Literatura" => "#9B2C2C",
        "Redação" => "#ED64A6",
        "Inglês" => "#00B5D8",
        "Filosofia" => "#5A67D8",
        "Sociologia" => "#ED8936",
        "Artes" => "#D53F8C",
        "Educação Física" => "#319795",
        _ => DEFAULT_SUBJECT_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_day_has_identity_but_no_subjects() {
        let day = CalendarDay::empty(date(2024, 3, 5));
        assert_eq!(day.iso_date(), "2024-03-05");
        assert!(day.subjects.is_empty());
    }

    #[test]
    fn test_presentation_strings_are_derived_from_the_date() {
        // 2024-03-05 is a Tuesday
        let day = CalendarDay::empty(date(2024, 3, 5));
        assert_eq!(day.weekday_name(), "terça-feira");
        assert_eq!(day.short_label(), "ter 05/03");
        assert_eq!(day.formatted_date(), "05/03/2024");

        let sunday = CalendarDay::empty(date(2024, 3, 10));
        assert_eq!(sunday.weekday_name(), "domingo");
    }

    #[test]
    fn test_known_subjects_resolve_palette_colors() {
        assert_eq!(subject_color("Física"), "#3182CE");
        assert_eq!(subject_color("Matemática"), "#805AD5");
    }

    #[test]
    fn test_unmapped_subject_falls_back_to_default() {
        assert_eq!(subject_color("Astronomia Avançada"), DEFAULT_SUBJECT_COLOR);
        assert_eq!(subject_color(""), DEFAULT_SUBJECT_COLOR);
    }
}
