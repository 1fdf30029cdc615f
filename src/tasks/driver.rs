use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{MAX_FRAME_INTERVAL, MIN_FRAME_INTERVAL};
use crate::events::{PreviewEvent, TimerCommand};
use crate::render::surface::PreviewSurface;
use crate::tasks::controller::PreviewSession;

/// Feeds host events into `session` and owns its animation timer.
///
/// At most one interval exists at a time; it is created on the session's
/// request and dropped when the session asks for a cancel. Returns the session
/// once the event channel closes or `cancel` fires.
pub async fn run<S: PreviewSurface>(
    mut session: PreviewSession<S>,
    mut events: Receiver<PreviewEvent>,
    cancel: CancellationToken,
) -> PreviewSession<S> {
    let mut timer: Option<Interval> = None;

    loop {
        let event = select! {
            _ = cancel.cancelled() => break,
            maybe_ev = events.recv() => match maybe_ev {
                Some(ev) => ev,
                None => {
                    debug!("preview event channel closed");
                    break;
                }
            },
            _ = next_tick(&mut timer) => PreviewEvent::Tick,
        };

        match session.handle(event) {
            Some(TimerCommand::Start(period)) => {
                if timer.is_none() {
                    let period = period.clamp(MIN_FRAME_INTERVAL, MAX_FRAME_INTERVAL);
                    debug!(period = ?period, "starting animation timer");
                    let mut interval = interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    timer = Some(interval);
                }
            }
            Some(TimerCommand::Cancel) => {
                debug!("stopping animation timer");
                timer = None;
            }
            None => {}
        }
    }

    session
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
