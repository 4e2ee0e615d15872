//! Canned data source for trying the CLI without the real service.
//!
//! Rows are generated deterministically from the weekday, so any window
//! for any user produces a plausible week: two morning classes per
//! weekday, a review block on Saturdays, Sundays free. Saturday rows
//! keep the day-first date format the legacy service still emits;
//! everything else is ISO.

use std::time::Duration;

use async_trait::async_trait;
use aula_core::ScheduleBackend;
use aula_core::backend::{CalendarRow, EventDefinitionRow, EventVariantRow};
use aula_core::date::DateWindow;
use aula_core::error::QueryError;
use aula_core::playback::{EventKind, EventPayload, MediaAttachment, MediaKind};
use chrono::{Datelike, NaiveDate, Weekday};

pub struct DemoBackend;

struct Slot {
    subject: &'static str,
    sched: &'static str,
    start: &'static str,
    finish: &'static str,
    duration_minutes: u32,
    topic: Option<&'static str>,
}

const MONDAY: &[Slot] = &[
    Slot {
        subject: "Matemática",
        sched: "mat",
        start: "08:00:00",
        finish: "09:30:00",
        duration_minutes: 90,
        topic: Some("Funções"),
    },
    Slot {
        subject: "Física",
        sched: "fis",
        start: "10:00:00",
        finish: "11:30:00",
        duration_minutes: 90,
        topic: Some("Cinemática"),
    },
];

const TUESDAY: &[Slot] = &[
    Slot {
        subject: "Química",
        sched: "qui",
        start: "08:00:00",
        finish: "09:30:00",
        duration_minutes: 90,
        topic: None,
    },
    Slot {
        subject: "Biologia",
        sched: "bio",
        start: "10:00:00",
        finish: "11:00:00",
        duration_minutes: 60,
        topic: Some("Genética"),
    },
];

const WEDNESDAY: &[Slot] = &[
    Slot {
        subject: "História",
        sched: "his",
        start: "08:00:00",
        finish: "09:00:00",
        duration_minutes: 60,
        topic: None,
    },
    Slot {
        subject: "Matemática",
        sched: "mat",
        start: "09:30:00",
        finish: "11:00:00",
        duration_minutes: 90,
        topic: Some("Geometria"),
    },
];

const THURSDAY: &[Slot] = &[
    Slot {
        subject: "Física",
        sched: "fis",
        start: "08:00:00",
        finish: "09:30:00",
        duration_minutes: 90,
        topic: Some("Dinâmica"),
    },
    Slot {
        subject: "Redação",
        sched: "red",
        start: "10:00:00",
        finish: "11:00:00",
        duration_minutes: 60,
        topic: None,
    },
];

const FRIDAY: &[Slot] = &[
    Slot {
        subject: "Literatura",
        sched: "lit",
        start: "08:00:00",
        finish: "09:00:00",
        duration_minutes: 60,
        topic: None,
    },
    Slot {
        subject: "Inglês",
        sched: "ing",
        start: "09:15:00",
        finish: "10:15:00",
        duration_minutes: 60,
        topic: None,
    },
];

const SATURDAY: &[Slot] = &[Slot {
    subject: "Revisão",
    sched: "rev",
    start: "09:00:00",
    finish: "10:00:00",
    duration_minutes: 60,
    topic: None,
}];

fn slots_for(weekday: Weekday) -> &'static [Slot] {
    match weekday {
        Weekday::Mon => MONDAY,
        Weekday::Tue => TUESDAY,
        Weekday::Wed => WEDNESDAY,
        Weekday::Thu => THURSDAY,
        Weekday::Fri => FRIDAY,
        Weekday::Sat => SATURDAY,
        Weekday::Sun => &[],
    }
}

fn demo_date(date: NaiveDate) -> String {
    if date.weekday() == Weekday::Sat {
        date.format("%d-%m-%Y").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Simulated latency so the spinner is visible.
async fn latency() {
    tokio::time::sleep(Duration::from_millis(350)).await;
}

#[async_trait]
impl ScheduleBackend for DemoBackend {
    async fn list_scheduled_class_ids(&self, _user_id: &str) -> Result<Vec<String>, QueryError> {
        latency().await;
        Ok(["mat", "fis", "qui", "bio", "his", "red", "lit", "ing", "rev"]
            .iter()
            .map(|sched| format!("sched-{sched}"))
            .collect())
    }

    async fn list_calendar_entries(
        &self,
        _scheduled_ids: &[String],
        window: DateWindow,
    ) -> Result<Vec<CalendarRow>, QueryError> {
        latency().await;

        let mut rows = Vec::new();
        for date in window.days() {
            for (order, slot) in slots_for(date.weekday()).iter().enumerate() {
                rows.push(CalendarRow {
                    id: format!("{}-{}", slot.sched, date.format("%Y%m%d")),
                    scheduled_id: format!("sched-{}", slot.sched),
                    subject: slot.subject.to_string(),
                    date: demo_date(date),
                    start_time: slot.start.to_string(),
                    finish_time: slot.finish.to_string(),
                    duration_minutes: Some(slot.duration_minutes),
                    order_index: Some(order as u32),
                    sub_subject: slot.topic.map(str::to_string),
                    link: Some(format!(
                        "https://aula.example/classes/{}-{}",
                        slot.sched,
                        date.format("%Y%m%d")
                    )),
                });
            }
        }
        Ok(rows)
    }

    async fn list_event_definitions(
        &self,
        class_id: &str,
    ) -> Result<Vec<EventDefinitionRow>, QueryError> {
        latency().await;

        // Every demo class carries the same three events.
        Ok(vec![
            EventDefinitionRow {
                id: format!("{class_id}-quiz-30"),
                class_id: class_id.to_string(),
                trigger_second: 30,
                kind: EventKind::Quiz,
            },
            EventDefinitionRow {
                id: format!("{class_id}-dica-90"),
                class_id: class_id.to_string(),
                trigger_second: 90,
                kind: EventKind::Info,
            },
            EventDefinitionRow {
                id: format!("{class_id}-diagrama-150"),
                class_id: class_id.to_string(),
                trigger_second: 150,
                kind: EventKind::Info,
            },
        ])
    }

    async fn list_event_variants(
        &self,
        definition_ids: &[String],
    ) -> Result<Vec<EventVariantRow>, QueryError> {
        latency().await;

        let mut variants = Vec::new();
        for id in definition_ids {
            if id.ends_with("-quiz-30") {
                variants.push(EventVariantRow {
                    definition_id: id.clone(),
                    variant_index: 0,
                    weight: 1.0,
                    payload: EventPayload::Quiz {
                        question: "Qual é a unidade de medida da força no SI?".to_string(),
                        alternatives: vec![
                            "Newton".to_string(),
                            "Joule".to_string(),
                            "Watt".to_string(),
                            "Pascal".to_string(),
                        ],
                        correct_index: 0,
                    },
                });
            } else if id.ends_with("-dica-90") {
                variants.push(EventVariantRow {
                    definition_id: id.clone(),
                    variant_index: 0,
                    weight: 3.0,
                    payload: EventPayload::Info {
                        title: None,
                        text: Some(
                            "Anote: a força resultante é a soma vetorial de todas as forças."
                                .to_string(),
                        ),
                        media: None,
                    },
                });
                variants.push(EventVariantRow {
                    definition_id: id.clone(),
                    variant_index: 1,
                    weight: 7.0,
                    payload: EventPayload::Info {
                        title: Some("Dica".to_string()),
                        text: Some(
                            "Pause e tente resolver o exemplo do plano inclinado antes de continuar."
                                .to_string(),
                        ),
                        media: None,
                    },
                });
                variants.push(EventVariantRow {
                    definition_id: id.clone(),
                    variant_index: 2,
                    weight: 7.0,
                    payload: EventPayload::Info {
                        title: Some("Lembrete".to_string()),
                        text: Some("F = m·a vale apenas para massa constante.".to_string()),
                        media: None,
                    },
                });
            } else if id.ends_with("-diagrama-150") {
                variants.push(EventVariantRow {
                    definition_id: id.clone(),
                    variant_index: 0,
                    weight: 1.0,
                    payload: EventPayload::Info {
                        title: Some("Diagrama".to_string()),
                        text: None,
                        media: Some(MediaAttachment {
                            kind: MediaKind::Image,
                            src: "https://aula.example/media/plano-inclinado.png".to_string(),
                            alt: Some("Diagrama de forças no plano inclinado".to_string()),
                        }),
                    },
                });
            }
        }
        Ok(variants)
    }
}
