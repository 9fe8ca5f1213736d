//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a practice-mode
//! WebSocket connection. It binds the connection to a wizard session and
//! manages the stopwatch ticker's lifecycle.

use crate::web::{
    practice_task::practice_ticker,
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, WizardSession, WizardStep},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
};
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New practice-mode WebSocket connection established.");

    // The sender is wrapped in an Arc<Mutex<>> to allow for shared mutable access across tasks.
    let (sender, mut receiver) = socket.split();
    let ws_sender = Arc::new(Mutex::new(sender));

    // --- 1. Initialization Phase ---
    let session_lock: Arc<Mutex<WizardSession>>;
    if let Some(Ok(Message::Text(init_json))) = receiver.next().await {
        match serde_json::from_str::<ClientMessage>(&init_json) {
            Ok(ClientMessage::Init { session_id }) => {
                info!("Binding connection to wizard session {}.", session_id);
                match app_state.session(session_id).await {
                    Some(lock) => {
                        session_lock = lock;
                        let init_msg = ServerMessage::SessionInitialized { session_id };
                        if send_message(&ws_sender, &init_msg).await.is_err() {
                            error!("Failed to send session initialized message.");
                            return;
                        }
                    }
                    None => {
                        error!("Unknown wizard session: {}", session_id);
                        let err_msg = ServerMessage::Error {
                            message: "Unknown wizard session.".to_string(),
                        };
                        let _ = send_message(&ws_sender, &err_msg).await;
                        return;
                    }
                }
            }
            _ => {
                error!("First message was not a valid Init message.");
                return;
            }
        }
    } else {
        error!("Client disconnected before sending Init message.");
        return;
    }

    // Ticks flow through a channel so the ticker does not own the socket;
    // this task forwards them onto the wire.
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let forward_task = {
        let ws_sender = ws_sender.clone();
        tokio::spawn(async move {
            while let Some(message) = tick_rx.recv().await {
                if send_message(&ws_sender, &message).await.is_err() {
                    error!("Failed to forward practice tick to client.");
                    break;
                }
            }
        })
    };

    // --- 2. Main Message Loop ---
    let mut ticker_handle: Option<JoinHandle<()>> = None;
    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_text_message(
                        text.to_string(),
                        &session_lock,
                        &ws_sender,
                        &tick_tx,
                        &mut ticker_handle,
                    )
                    .await;
                }
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    // --- 3. Cleanup ---
    // The ticker must not outlive the view that started it.
    session_lock.lock().await.stop_practice();
    if let Some(handle) = ticker_handle {
        handle.abort();
    }
    forward_task.abort();
    info!("WebSocket connection closed.");
}

/// Helper function to handle the logic for different `ClientMessage` variants.
async fn handle_text_message(
    text: String,
    session_lock: &Arc<Mutex<WizardSession>>,
    ws_sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>,
    tick_tx: &mpsc::UnboundedSender<ServerMessage>,
    ticker_handle: &mut Option<JoinHandle<()>>,
) {
    match serde_json::from_str::<ClientMessage>(&text) {
        Ok(client_msg) => match client_msg {
            ClientMessage::StartPractice => {
                let token = {
                    let mut session = session_lock.lock().await;
                    if session.step != WizardStep::Generated {
                        drop(session);
                        let err_msg = ServerMessage::Error {
                            message: "Practice mode needs a generated draft.".to_string(),
                        };
                        let _ = send_message(ws_sender, &err_msg).await;
                        return;
                    }
                    session.begin_practice()
                };
                match token {
                    Some(token) => {
                        info!("StartPractice message received. Starting ticker.");
                        let task = tokio::spawn(practice_ticker(
                            session_lock.clone(),
                            tick_tx.clone(),
                            token,
                        ));
                        *ticker_handle = Some(task);
                        let _ = send_message(ws_sender, &ServerMessage::PracticeStarted).await;
                    }
                    None => {
                        warn!("StartPractice received while already running; ignoring.");
                    }
                }
            }
            ClientMessage::PausePractice => {
                info!("PausePractice message received.");
                let elapsed = {
                    let mut session = session_lock.lock().await;
                    let was_running = session.pause_practice();
                    was_running.then_some(session.playback.elapsed_seconds)
                };
                if let Some(elapsed_seconds) = elapsed {
                    let msg = ServerMessage::PracticePaused { elapsed_seconds };
                    let _ = send_message(ws_sender, &msg).await;
                }
            }
            ClientMessage::ResetPractice => {
                info!("ResetPractice message received.");
                session_lock.lock().await.reset_practice();
                let _ = send_message(ws_sender, &ServerMessage::PracticeReset).await;
            }
            ClientMessage::SelectSection { index } => {
                let selected = {
                    let mut session = session_lock.lock().await;
                    let section_count = session
                        .draft
                        .as_ref()
                        .map(|draft| draft.structure.len())
                        .unwrap_or(0);
                    if session.step == WizardStep::Generated && section_count > 0 {
                        Some(session.playback.select_section(index, section_count))
                    } else {
                        None
                    }
                };
                match selected {
                    Some(index) => {
                        let _ = send_message(ws_sender, &ServerMessage::SectionSelected { index })
                            .await;
                    }
                    None => {
                        let err_msg = ServerMessage::Error {
                            message: "No draft structure to select a section from.".to_string(),
                        };
                        let _ = send_message(ws_sender, &err_msg).await;
                    }
                }
            }
            ClientMessage::ToggleMute => {
                let muted = {
                    let mut session = session_lock.lock().await;
                    session.playback.muted = !session.playback.muted;
                    session.playback.muted
                };
                let _ = send_message(ws_sender, &ServerMessage::MuteChanged { muted }).await;
            }
            ClientMessage::SetSpeed { multiplier } => {
                if multiplier.is_finite() && multiplier > 0.0 {
                    session_lock.lock().await.playback.speed_multiplier = multiplier;
                    let _ =
                        send_message(ws_sender, &ServerMessage::SpeedChanged { multiplier }).await;
                } else {
                    let err_msg = ServerMessage::Error {
                        message: "Speed multiplier must be positive.".to_string(),
                    };
                    let _ = send_message(ws_sender, &err_msg).await;
                }
            }
            ClientMessage::Init { .. } => {
                warn!("Received subsequent Init message, which is ignored.");
            }
        },
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
        }
    }
}

async fn send_message(
    ws_sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(message).unwrap();
    ws_sender.lock().await.send(Message::Text(json.into())).await
}
