use anyhow::Result;
use aula_core::playback::EventMatcher;
use owo_colors::OwoColorize;

use crate::demo::DemoBackend;
use crate::render::Render;
use crate::utils::tui::spinner;

pub async fn run(class: &str) -> Result<()> {
    let bar = spinner(format!("loading events for {class}"));
    let result = EventMatcher::load(&DemoBackend, class).await;
    bar.finish_and_clear();

    match result {
        Ok(matcher) => {
            if matcher.definitions().is_empty() {
                println!("{}", "no events attached to this class".dimmed());
                return Ok(());
            }
            for definition in matcher.definitions() {
                println!("{}", definition.render());
            }
        }
        Err(e) => println!("   {}", e.to_string().red()),
    }

    Ok(())
}
