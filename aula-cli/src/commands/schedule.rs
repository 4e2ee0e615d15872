use anyhow::Result;
use aula_core::config::AulaConfig;
use aula_core::error::QueryError;
use aula_core::schedule::ScheduleService;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::demo::DemoBackend;
use crate::render::Render;
use crate::utils::tui::spinner;

pub async fn run(user: &str, center: NaiveDate, days: Option<u32>, all: bool) -> Result<()> {
    let config = AulaConfig::load_or_default()?;
    let mut options = config.schedule_options()?;
    if let Some(days) = days {
        options.window_days = days;
    }
    let service = ScheduleService::with_options(DemoBackend, options);

    let bar = spinner(format!("loading schedule for {user}"));
    let result = service.window(user, center).await;
    bar.finish_and_clear();

    match result {
        Ok(window) => {
            let mut hidden = 0usize;
            for day in &window {
                if day.subjects.is_empty() && !all {
                    hidden += 1;
                    continue;
                }
                println!("{}", day.render());
                println!();
            }
            if hidden > 0 {
                println!(
                    "{}",
                    format!("({hidden} empty days hidden, use --all to show them)").dimmed()
                );
            }
        }
        Err(e) => {
            println!("   {}", e.to_string().red());
            if matches!(e.query_error(), QueryError::Auth(_)) {
                println!("   {}", "sua sessão expirou, entre novamente".dimmed());
            }
        }
    }

    Ok(())
}
