//! Simulated class playback.
//!
//! Advances a virtual playhead in real time (optionally faster), feeds
//! it to a `PlaybackWatcher`, and renders whatever event lands on
//! screen. Stdin drives the viewer side: empty line dismisses, a number
//! seeks, `q` quits.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use aula_core::playback::{EventMatcher, PlaybackWatcher, PositionSource};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::demo::DemoBackend;
use crate::render::Render;
use crate::utils::tui::spinner;

struct PlayState {
    origin: Instant,
    at_origin: f64,
}

/// Wall-clock playhead with seek support. Seeks go out on a change
/// feed so the watcher reacts immediately instead of on the next poll.
pub struct SimulatedPlayback {
    state: Mutex<PlayState>,
    speed: f64,
    seeks: watch::Sender<f64>,
}

impl SimulatedPlayback {
    pub fn new(from: f64, speed: f64) -> Arc<Self> {
        Arc::new(SimulatedPlayback {
            state: Mutex::new(PlayState {
                origin: Instant::now(),
                at_origin: from,
            }),
            speed,
            seeks: watch::channel(from).0,
        })
    }

    pub fn seek(&self, to: f64) {
        let mut state = self.state.lock().unwrap();
        state.at_origin = to;
        state.origin = Instant::now();
        drop(state);
        let _ = self.seeks.send(to);
    }

    fn position(&self) -> f64 {
        let state = self.state.lock().unwrap();
        state.at_origin + state.origin.elapsed().as_secs_f64() * self.speed
    }
}

impl PositionSource for SimulatedPlayback {
    fn position_secs(&self) -> f64 {
        self.position()
    }

    fn changes(&self) -> Option<watch::Receiver<f64>> {
        Some(self.seeks.subscribe())
    }
}

pub async fn run(class: &str, from: f64, speed: f64) -> Result<()> {
    anyhow::ensure!(speed > 0.0, "speed must be positive");

    let bar = spinner(format!("loading events for {class}"));
    let result = EventMatcher::load(&DemoBackend, class).await;
    bar.finish_and_clear();

    let matcher = match result {
        Ok(matcher) => matcher,
        Err(e) => {
            println!("   {}", e.to_string().red());
            return Ok(());
        }
    };
    if matcher.definitions().is_empty() {
        println!("{}", "no events attached to this class".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!("replaying {class} from {from:.0}s at {speed}x").bold()
    );
    println!("{}", "enter = dismiss, <seconds> = seek, q = quit".dimmed());

    let playback = SimulatedPlayback::new(from, speed);
    let watcher = PlaybackWatcher::spawn(matcher, playback.clone());
    let mut events = watcher.subscribe();

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = events.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(active) = events.borrow_and_update().clone() else {
                    continue;
                };
                println!();
                println!("{}", active.render());
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    break; // stdin closed
                };
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("q") {
                    break;
                }
                if trimmed.is_empty() {
                    watcher.dismiss().await;
                    println!("{}", "dismissed".dimmed());
                    continue;
                }
                match trimmed.parse::<f64>() {
                    Ok(to) => playback.seek(to),
                    Err(_) => {
                        println!("{}", "enter = dismiss, <seconds> = seek, q = quit".dimmed());
                    }
                }
            }
        }
    }

    // Dropping the watcher detaches the sampler task.
    Ok(())
}
