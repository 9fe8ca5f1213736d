//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! API server for the presentation practice mode.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Binds the connection to a wizard session. This must be the first
    /// message sent on the connection.
    Init { session_id: Uuid },

    /// Starts the rehearsal stopwatch. Ignored while it is already running.
    StartPractice,

    /// Stops the stopwatch, keeping the elapsed time.
    PausePractice,

    /// Cancels the stopwatch and zeroes the whole playback state.
    ResetPractice,

    /// Moves the section pointer. Out-of-range indices are clamped.
    SelectSection { index: usize },

    /// Flips the mute flag. Display-only; there is no audio in this system.
    ToggleMute,

    /// Sets the playback speed multiplier. Must be positive.
    SetSpeed { multiplier: f32 },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms successful session binding.
    SessionInitialized { session_id: Uuid },

    /// Reports an error to the client, which should display an error message.
    Error { message: String },

    /// Signals that the stopwatch is now ticking.
    PracticeStarted,

    /// One stopwatch tick. `clock` is the `minutes:seconds` display string.
    PracticeTick { elapsed_seconds: u64, clock: String },

    /// Signals that the stopwatch has been paused.
    PracticePaused { elapsed_seconds: u64 },

    /// Signals that the playback state has been zeroed.
    PracticeReset,

    /// Confirms a section selection, after clamping.
    SectionSelected { index: usize },

    /// Confirms a mute toggle.
    MuteChanged { muted: bool },

    /// Confirms a speed change.
    SpeedChanged { multiplier: f32 },
}
