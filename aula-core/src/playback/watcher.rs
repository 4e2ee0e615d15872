//! Background playback sampling.
//!
//! `PlaybackWatcher` owns an [`EventMatcher`] and feeds it from two
//! signals: a once-per-second poll of the player position, plus the
//! source's own change notifications when it offers them (seeks land
//! faster that way). Transitions are published on a watch channel;
//! dropping the handle detaches the sampler.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Interval, interval};
use tracing::debug;

use crate::constants::POLL_PERIOD;
use crate::playback::event::ActiveEvent;
use crate::playback::matcher::EventMatcher;

/// Where playback positions come from.
///
/// Implementations wrap whatever player is in use. `position_secs` is
/// polled once per second; sources that can push seek notifications
/// return a receiver from [`PositionSource::changes`].
pub trait PositionSource: Send + Sync + 'static {
    /// Current playback position in seconds.
    fn position_secs(&self) -> f64;

    /// Optional change feed carrying new positions. The default is
    /// poll-only.
    fn changes(&self) -> Option<watch::Receiver<f64>> {
        None
    }
}

// A player handle is routinely shared between the UI and the watcher.
// Forwards `changes` as well: the default would hide a shared source's
// feed behind the poll.
impl<S: PositionSource + ?Sized> PositionSource for Arc<S> {
    fn position_secs(&self) -> f64 {
        (**self).position_secs()
    }

    fn changes(&self) -> Option<watch::Receiver<f64>> {
        (**self).changes()
    }
}

/// Handle to a running sampler task.
#[derive(Debug)]
pub struct PlaybackWatcher {
    matcher: Arc<Mutex<EventMatcher>>,
    events: Arc<watch::Sender<Option<ActiveEvent>>>,
    task: JoinHandle<()>,
}

impl PlaybackWatcher {
    /// Start sampling `source` against `matcher`. Must be called from
    /// within a tokio runtime.
    pub fn spawn<S: PositionSource>(matcher: EventMatcher, source: S) -> PlaybackWatcher {
        let matcher = Arc::new(Mutex::new(matcher));
        let events = Arc::new(watch::channel(None).0);

        let task = tokio::spawn(watch_loop(matcher.clone(), events.clone(), source));
        debug!("playback watcher started");

        PlaybackWatcher {
            matcher,
            events,
            task,
        }
    }

    /// Subscribe to overlay transitions. The channel holds the event
    /// currently on screen (`None` while idle).
    pub fn subscribe(&self) -> watch::Receiver<Option<ActiveEvent>> {
        self.events.subscribe()
    }

    /// Viewer closed the overlay: clear the matcher and tell
    /// subscribers.
    pub async fn dismiss(&self) {
        self.matcher.lock().await.dismiss();
        self.events.send_replace(None);
    }
}

impl Drop for PlaybackWatcher {
    fn drop(&mut self) {
        // The sampler must not outlive its handle.
        self.task.abort();
    }
}

async fn watch_loop<S: PositionSource>(
    matcher: Arc<Mutex<EventMatcher>>,
    events: Arc<watch::Sender<Option<ActiveEvent>>>,
    source: S,
) {
    let mut poll = interval(POLL_PERIOD);
    let mut changes = source.changes();

    loop {
        let position = next_position(&mut poll, &mut changes, &source).await;
        if let Some(active) = matcher.lock().await.sample(position) {
            events.send_replace(Some(active));
        }
    }
}

/// Wait for the next sample: whichever of the poll tick and the change
/// feed fires first. A closed change feed downgrades to poll-only.
async fn next_position<S: PositionSource>(
    poll: &mut Interval,
    changes: &mut Option<watch::Receiver<f64>>,
    source: &S,
) -> f64 {
    if let Some(receiver) = changes {
        tokio::select! {
            _ = poll.tick() => return source.position_secs(),
            changed = receiver.changed() => {
                if changed.is_ok() {
                    return *receiver.borrow_and_update();
                }
            }
        }
        debug!("position change feed closed, falling back to polling");
        *changes = None;
        return source.position_secs();
    }

    poll.tick().await;
    source.position_secs()
}
