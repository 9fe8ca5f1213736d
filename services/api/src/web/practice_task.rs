//! services/api/src/web/practice_task.rs
//!
//! This module contains the asynchronous "worker" function behind the
//! rehearsal stopwatch: a one-second ticker that runs until it is cancelled.

use crate::web::{protocol::ServerMessage, state::WizardSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc::UnboundedSender, Mutex};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// The main asynchronous task for the rehearsal stopwatch.
///
/// Increments the session's elapsed time once per second and pushes a tick
/// message for the client. It is designed to be gracefully cancelled via a
/// `CancellationToken`; pause, reset, the full wizard reset and connection
/// teardown all cancel the same token, so exactly one release path exists.
pub async fn practice_ticker(
    session_lock: Arc<Mutex<WizardSession>>,
    ticks: UnboundedSender<ServerMessage>,
    cancellation_token: CancellationToken,
) {
    info!("Practice ticker started.");

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately; consume it so
    // the stopwatch advances one second per elapsed second.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Practice ticker cancelled.");
                return;
            }
            _ = interval.tick() => {}
        }

        let message = {
            let mut session = session_lock.lock().await;
            if !session.playback.running {
                info!("Playback no longer running. Stopping practice ticker.");
                return;
            }
            session.playback.elapsed_seconds += 1;
            ServerMessage::PracticeTick {
                elapsed_seconds: session.playback.elapsed_seconds,
                clock: session.playback.clock(),
            }
        };

        if ticks.send(message).is_err() {
            info!("Tick receiver dropped. Stopping practice ticker.");
            return;
        }
    }
}
