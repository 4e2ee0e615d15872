//! Terminal rendering for aula-core types.
//!
//! Extension traits that turn core types into colored terminal lines
//! using owo_colors. Subject colors come through as hex strings and are
//! mapped to truecolor escapes here.

use aula_core::playback::{ActiveEvent, EventDefinition, EventKind, EventPayload, MediaKind};
use aula_core::schedule::day::{CalendarDay, SubjectBlock};
use owo_colors::OwoColorize;

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarDay {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{}  {}",
            self.short_label().bold(),
            self.weekday_name().dimmed()
        )];

        if self.subjects.is_empty() {
            lines.push(format!("   {}", "no classes".dimmed()));
        } else {
            for block in &self.subjects {
                lines.push(block.render());
            }
        }

        lines.join("\n")
    }
}

impl Render for SubjectBlock {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "   {} {}  {}",
            paint(&self.color, "●"),
            paint(&self.color, &self.name),
            self.time_ranges.join(", ").dimmed()
        )];

        for class in &self.classes {
            let mut details = Vec::new();
            if let Some(topic) = &class.sub_subject {
                details.push(topic.clone());
            }
            if let Some(minutes) = class.duration_minutes {
                details.push(format!("{minutes} min"));
            }
            let suffix = if details.is_empty() {
                String::new()
            } else {
                format!(" ({})", details.join(", "))
            };
            lines.push(format!("      {}{}", class.id.dimmed(), suffix.dimmed()));
        }

        lines.join("\n")
    }
}

impl Render for EventDefinition {
    fn render(&self) -> String {
        let variants = match self.variants.len() {
            1 => "1 variant".to_string(),
            n => format!("{n} variants"),
        };
        format!(
            "{}  {}  {}  {}",
            clock(self.trigger_second).bold(),
            kind_label(self.kind),
            self.id,
            format!("({variants})").dimmed()
        )
    }
}

impl Render for ActiveEvent {
    fn render(&self) -> String {
        let header = format!(
            "{} {} {}",
            kind_label(self.definition.kind),
            "at".dimmed(),
            clock(self.definition.trigger_second).bold()
        );
        let mut lines = vec![header];

        match &self.variant.payload {
            EventPayload::Quiz {
                question,
                alternatives,
                ..
            } => {
                lines.push(format!("   {}", question.bold()));
                for (i, alternative) in alternatives.iter().enumerate() {
                    lines.push(format!("   {}) {}", i + 1, alternative));
                }
            }
            EventPayload::Info { title, text, media } => {
                if let Some(title) = title {
                    lines.push(format!("   {}", title.bold()));
                }
                if let Some(text) = text {
                    lines.push(format!("   {text}"));
                }
                if let Some(media) = media {
                    let tag = match media.kind {
                        MediaKind::Image => "image",
                        MediaKind::Video => "video",
                        MediaKind::Pdf => "pdf",
                    };
                    let alt = media.alt.as_deref().unwrap_or("");
                    lines.push(format!("   {} {}", format!("[{tag}] {}", media.src).dimmed(), alt));
                }
            }
        }

        lines.join("\n")
    }
}

fn kind_label(kind: EventKind) -> String {
    match kind {
        EventKind::Quiz => "quiz".magenta().to_string(),
        EventKind::Info => "info".cyan().to_string(),
    }
}

/// `mm:ss` from a playback offset.
fn clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    // len is bytes; the pair slices below are only safe on ASCII.
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Color `text` with a `#RRGGBB` hex color, falling back to plain text
/// when the hex does not parse.
fn paint(color: &str, text: &str) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors_parse() {
        assert_eq!(parse_hex("#3182CE"), Some((0x31, 0x82, 0xCE)));
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("3182CE"), None);
        // Config overrides are user input; a stray multi-byte char must
        // fall back to plain text, not slice mid-character.
        assert_eq!(parse_hex("#aécda"), None);
        assert_eq!(parse_hex("#ggggg1"), None);
    }

    #[test]
    fn test_clock_is_minutes_and_seconds() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(90), "01:30");
        assert_eq!(clock(615), "10:15");
    }
}
