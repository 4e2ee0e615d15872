//! Position-driven event matching.
//!
//! `EventMatcher` turns a stream of playback positions into overlay
//! state: when the floored position lands inside a definition's trigger
//! window the matcher starts showing that event, and it keeps showing
//! it until the viewer dismisses it or a different definition matches.

use tracing::debug;

use crate::backend::ScheduleBackend;
use crate::constants::TRIGGER_TOLERANCE_SECS;
use crate::error::EventLoadError;
use crate::playback::event::{ActiveEvent, EventDefinition, merge_event_rows};

#[derive(Debug, Clone, PartialEq)]
enum MatcherState {
    Idle,
    Showing(ActiveEvent),
}

/// Per-class event state machine. One instance per playback session;
/// feed it positions with [`EventMatcher::sample`].
#[derive(Debug, Clone)]
pub struct EventMatcher {
    definitions: Vec<EventDefinition>,
    state: MatcherState,
    last_sampled: Option<i64>,
}

impl EventMatcher {
    pub fn new(mut definitions: Vec<EventDefinition>) -> Self {
        // Ascending trigger order decides which definition wins when
        // tolerance windows overlap.
        definitions.sort_by_key(|definition| definition.trigger_second);
        EventMatcher {
            definitions,
            state: MatcherState::Idle,
            last_sampled: None,
        }
    }

    /// Fetch and join the event rows for one class.
    pub async fn load<B: ScheduleBackend>(
        backend: &B,
        class_id: &str,
    ) -> Result<Self, EventLoadError> {
        let definition_rows = backend.list_event_definitions(class_id).await?;
        let variant_rows = if definition_rows.is_empty() {
            Vec::new()
        } else {
            let ids: Vec<String> = definition_rows.iter().map(|row| row.id.clone()).collect();
            backend.list_event_variants(&ids).await?
        };
        Ok(Self::new(merge_event_rows(definition_rows, variant_rows)))
    }

    /// Feed one playback position (seconds, fractional). Returns the
    /// event that just became active if this sample caused a transition,
    /// `None` otherwise.
    pub fn sample(&mut self, position_secs: f64) -> Option<ActiveEvent> {
        let second = position_secs.floor() as i64;

        // One decision per playback second, however often we get polled.
        if self.last_sampled == Some(second) {
            return None;
        }
        self.last_sampled = Some(second);

        let hit = self.definitions.iter().find(|definition| {
            (second - i64::from(definition.trigger_second)).abs()
                <= i64::from(TRIGGER_TOLERANCE_SECS)
                && definition.preferred_variant().is_some()
        })?;

        if let MatcherState::Showing(active) = &self.state {
            // Same event still in its window: leave it alone. A
            // different match replaces what is on screen.
            if active.definition.id == hit.id {
                return None;
            }
        }

        let variant = hit.preferred_variant()?.clone();
        let active = ActiveEvent {
            definition: hit.clone(),
            variant,
        };
        debug!(event_id = %active.definition.id, second, "class event triggered");
        self.state = MatcherState::Showing(active.clone());
        Some(active)
    }

    /// Clear the showing event. This is the only way off screen; the
    /// position drifting out of the trigger window never hides anything.
    pub fn dismiss(&mut self) {
        if let MatcherState::Showing(active) = &self.state {
            debug!(event_id = %active.definition.id, "class event dismissed");
        }
        self.state = MatcherState::Idle;
    }

    /// The event currently on screen, if any.
    pub fn active(&self) -> Option<&ActiveEvent> {
        match &self.state {
            MatcherState::Showing(active) => Some(active),
            MatcherState::Idle => None,
        }
    }

    /// All loaded definitions, ascending by trigger second.
    pub fn definitions(&self) -> &[EventDefinition] {
        &self.definitions
    }
}
