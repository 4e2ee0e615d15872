//! Query collaborator contract.
//!
//! The schedule and playback data live in an external managed backend;
//! this module defines the seam the rest of the crate talks through.
//! The composition root supplies the real implementation (and tests
//! supply mocks), so nothing in-core ever issues a network call of its
//! own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::date::DateWindow;
use crate::error::QueryError;
use crate::playback::event::{EventKind, EventPayload};

/// Async contract over the external query service.
#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Ids of the "scheduled class" records owned by a user.
    async fn list_scheduled_class_ids(&self, user_id: &str) -> Result<Vec<String>, QueryError>;

    /// Calendar rows referencing `scheduled_ids` whose date falls inside
    /// `window`, ordered by date then start time ascending.
    async fn list_calendar_entries(
        &self,
        scheduled_ids: &[String],
        window: DateWindow,
    ) -> Result<Vec<CalendarRow>, QueryError>;

    /// Event definitions for one class, ordered by trigger second
    /// ascending.
    async fn list_event_definitions(
        &self,
        class_id: &str,
    ) -> Result<Vec<EventDefinitionRow>, QueryError>;

    /// Variant rows for a batch of definition ids.
    async fn list_event_variants(
        &self,
        definition_ids: &[String],
    ) -> Result<Vec<EventVariantRow>, QueryError>;
}

// Shared backends are the norm: the schedule service and the event
// matcher usually sit on the same connection.
#[async_trait]
impl<B: ScheduleBackend + ?Sized> ScheduleBackend for std::sync::Arc<B> {
    async fn list_scheduled_class_ids(&self, user_id: &str) -> Result<Vec<String>, QueryError> {
        (**self).list_scheduled_class_ids(user_id).await
    }

    async fn list_calendar_entries(
        &self,
        scheduled_ids: &[String],
        window: DateWindow,
    ) -> Result<Vec<CalendarRow>, QueryError> {
        (**self).list_calendar_entries(scheduled_ids, window).await
    }

    async fn list_event_definitions(
        &self,
        class_id: &str,
    ) -> Result<Vec<EventDefinitionRow>, QueryError> {
        (**self).list_event_definitions(class_id).await
    }

    async fn list_event_variants(
        &self,
        definition_ids: &[String],
    ) -> Result<Vec<EventVariantRow>, QueryError> {
        (**self).list_event_variants(definition_ids).await
    }
}

/// One scheduled occurrence of a subject, as stored.
///
/// `date` is raw on purpose: the backend is inconsistent about its
/// format and normalization is this crate's job
/// ([`crate::date::normalize_backend_date`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRow {
    pub id: String,
    pub scheduled_id: String,
    pub subject: String,
    pub date: String,
    /// `"HH:MM:SS"` (some rows omit the seconds).
    pub start_time: String,
    pub finish_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One timestamp-triggered event, without its variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinitionRow {
    pub id: String,
    pub class_id: String,
    /// Offset into the video in whole seconds.
    pub trigger_second: u32,
    pub kind: EventKind,
}

/// One weighted payload alternative, joined to its definition by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventVariantRow {
    pub definition_id: String,
    pub variant_index: u32,
    pub weight: f64,
    pub payload: EventPayload,
}
