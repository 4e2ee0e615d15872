//! Timestamp-triggered event model.
//!
//! Definitions are loaded once per class and immutable for the session.
//! Each definition carries weighted variants; the matcher shows the
//! preferred variant of whichever definition the playhead lands on.

use serde::{Deserialize, Serialize};

use crate::backend::{EventDefinitionRow, EventVariantRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Quiz,
    Info,
}

/// Variant payload, one canonical shape per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Quiz {
        question: String,
        alternatives: Vec<String>,
        correct_index: usize,
    },
    Info {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        media: Option<MediaAttachment>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Pdf,
}

/// One weighted alternative payload for an event definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventVariant {
    pub variant_index: u32,
    /// Higher wins; ties go to the lowest `variant_index`.
    pub weight: f64,
    pub payload: EventPayload,
}

/// One timestamp-triggered interactive moment in a class video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub id: String,
    pub class_id: String,
    /// Playback offset in whole seconds at which this event becomes
    /// eligible.
    pub trigger_second: u32,
    pub kind: EventKind,
    /// Sorted by `variant_index` ascending after loading. May be empty,
    /// in which case the definition can never become active.
    pub variants: Vec<EventVariant>,
}

impl EventDefinition {
    /// The variant the matcher will show: highest weight, ties broken by
    /// the lowest variant index. `None` when the definition has no
    /// variants.
    pub fn preferred_variant(&self) -> Option<&EventVariant> {
        let mut best: Option<&EventVariant> = None;
        for variant in &self.variants {
            match best {
                None => best = Some(variant),
                Some(current) => {
                    if variant.weight > current.weight
                        || (variant.weight == current.weight
                            && variant.variant_index < current.variant_index)
                    {
                        best = Some(variant);
                    }
                }
            }
        }
        best
    }
}

/// The single event currently on screen, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub definition: EventDefinition,
    pub variant: EventVariant,
}

/// Join definition rows with their variant rows (matched by definition
/// id), sorting definitions by trigger second and variants by variant
/// index. The backend promises both orderings but the matcher depends
/// on them, so they are re-asserted here.
pub(crate) fn merge_event_rows(
    definition_rows: Vec<EventDefinitionRow>,
    variant_rows: Vec<EventVariantRow>,
) -> Vec<EventDefinition> {
    let mut definitions: Vec<EventDefinition> = definition_rows
        .into_iter()
        .map(|row| EventDefinition {
            id: row.id,
            class_id: row.class_id,
            trigger_second: row.trigger_second,
            kind: row.kind,
            variants: Vec::new(),
        })
        .collect();

    for row in variant_rows {
        if let Some(definition) = definitions.iter_mut().find(|d| d.id == row.definition_id) {
            definition.variants.push(EventVariant {
                variant_index: row.variant_index,
                weight: row.weight,
                payload: row.payload,
            });
        }
        // Variants pointing at unknown definitions are dropped; they
        // belong to rows the definition fetch did not return.
    }

    for definition in &mut definitions {
        definition
            .variants
            .sort_by_key(|variant| variant.variant_index);
    }
    definitions.sort_by_key(|definition| definition.trigger_second);

    definitions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_payload(text: &str) -> EventPayload {
        EventPayload::Info {
            title: None,
            text: Some(text.to_string()),
            media: None,
        }
    }

    fn variant(index: u32, weight: f64) -> EventVariant {
        EventVariant {
            variant_index: index,
            weight,
            payload: info_payload(&format!("variant {index}")),
        }
    }

    fn definition(id: &str, trigger_second: u32, variants: Vec<EventVariant>) -> EventDefinition {
        EventDefinition {
            id: id.to_string(),
            class_id: "class-1".to_string(),
            trigger_second,
            kind: EventKind::Info,
            variants,
        }
    }

    #[test]
    fn test_preferred_variant_takes_highest_weight() {
        let def = definition("e1", 30, vec![variant(0, 1.0), variant(1, 5.0), variant(2, 3.0)]);
        assert_eq!(def.preferred_variant().unwrap().variant_index, 1);
    }

    #[test]
    fn test_preferred_variant_breaks_ties_by_lowest_index() {
        // Weights [3, 7, 7]: index 1 wins the tie against index 2
        let def = definition("e1", 30, vec![variant(0, 3.0), variant(1, 7.0), variant(2, 7.0)]);
        assert_eq!(def.preferred_variant().unwrap().variant_index, 1);
    }

    #[test]
    fn test_preferred_variant_of_empty_definition_is_none() {
        let def = definition("e1", 30, vec![]);
        assert!(def.preferred_variant().is_none());
    }

    #[test]
    fn test_merge_joins_by_definition_id_and_sorts() {
        // Rows arrive in arbitrary order
        let definition_rows = vec![
            EventDefinitionRow {
                id: "e2".to_string(),
                class_id: "class-1".to_string(),
                trigger_second: 90,
                kind: EventKind::Quiz,
            },
            EventDefinitionRow {
                id: "e1".to_string(),
                class_id: "class-1".to_string(),
                trigger_second: 30,
                kind: EventKind::Info,
            },
        ];
        let variant_rows = vec![
            EventVariantRow {
                definition_id: "e2".to_string(),
                variant_index: 1,
                weight: 2.0,
                payload: info_payload("b"),
            },
            EventVariantRow {
                definition_id: "e2".to_string(),
                variant_index: 0,
                weight: 1.0,
                payload: info_payload("a"),
            },
            EventVariantRow {
                definition_id: "missing".to_string(),
                variant_index: 0,
                weight: 1.0,
                payload: info_payload("orphan"),
            },
        ];

        let merged = merge_event_rows(definition_rows, variant_rows);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "e1");
        assert_eq!(merged[1].id, "e2");
        let indices: Vec<u32> = merged[1].variants.iter().map(|v| v.variant_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(merged[0].variants.is_empty());
    }

    #[test]
    fn test_payload_wire_shape_is_kind_tagged() {
        let quiz: EventPayload = serde_json::from_str(
            r#"{
                "type": "quiz",
                "question": "Qual é a unidade de força no SI?",
                "alternatives": ["Joule", "Newton", "Pascal"],
                "correct_index": 1
            }"#,
        )
        .unwrap();
        match quiz {
            EventPayload::Quiz { correct_index, alternatives, .. } => {
                assert_eq!(correct_index, 1);
                assert_eq!(alternatives.len(), 3);
            }
            other => panic!("expected quiz payload, got {other:?}"),
        }

        let info: EventPayload = serde_json::from_str(
            r#"{"type": "info", "title": "Dica", "media": {"kind": "pdf", "src": "https://cdn.example/resumo.pdf"}}"#,
        )
        .unwrap();
        match info {
            EventPayload::Info { media: Some(media), text, .. } => {
                assert_eq!(media.kind, MediaKind::Pdf);
                assert!(text.is_none());
            }
            other => panic!("expected info payload with media, got {other:?}"),
        }
    }
}
