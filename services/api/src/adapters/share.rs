//! services/api/src/adapters/share.rs
//!
//! Host share/export sinks. The share sheet itself is a host service this
//! process does not own, so `SystemShareAdapter` stands in for it the same way
//! the analysis adapters stand in for their backends; the clipboard adapter is
//! real and backs the share fallback.

use async_trait::async_trait;
use tracing::info;
use writing_assistant_core::ports::{ClipboardService, PortError, PortResult, ShareService};

//=========================================================================================
// Share Sheet
//=========================================================================================

/// Stands in for the host share sheet: accepts the payload and records the
/// delivery in the logs.
#[derive(Clone, Default)]
pub struct SystemShareAdapter;

impl SystemShareAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ShareService for SystemShareAdapter {
    async fn share(&self, title: &str, text: &str) -> PortResult<()> {
        info!(
            "Handing document '{}' ({} chars) to the host share sheet.",
            title,
            text.chars().count()
        );
        Ok(())
    }
}

//=========================================================================================
// Clipboard
//=========================================================================================

/// Copies text to the host clipboard via `arboard`. Clipboard access can fail
/// on headless hosts; the error is surfaced as a port error for the caller to
/// report.
#[derive(Clone, Default)]
pub struct SystemClipboardAdapter;

impl SystemClipboardAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardService for SystemClipboardAdapter {
    async fn copy_text(&self, text: &str) -> PortResult<()> {
        let text = text.to_string();
        // Clipboard access is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| PortError::Unexpected(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| PortError::Unexpected(e.to_string()))
        })
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
    }
}
