//! crates/writing_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like analysis backends
//! or host share sheets.

use async_trait::async_trait;

use crate::domain::{
    DocumentRequest, FileAnalysis, GeneratedDocument, ReferenceUpload, SavedDocument, ToneStyle,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., an
/// analysis backend or the host clipboard).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unsupported input: {0}")]
    Unsupported(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Analyzes one reference upload into a [`FileAnalysis`].
///
/// One implementation exists per [`crate::domain::FileCategory`]; the caller
/// classifies first and routes to the matching implementation. This repository
/// ships simulated implementations; a real content-analysis backend plugs in
/// behind the same contract.
#[async_trait]
pub trait FileAnalysisService: Send + Sync {
    async fn analyze(&self, upload: &ReferenceUpload) -> PortResult<FileAnalysis>;
}

/// Turns a completed request into a draft document.
///
/// The shipped implementation renders fixed templates; a text-generation
/// backend can replace it without touching the wizard.
#[async_trait]
pub trait DraftGenerationService: Send + Sync {
    async fn generate_draft(
        &self,
        request: &DocumentRequest,
        style: &ToneStyle,
        reference_key_points: &[String],
    ) -> PortResult<GeneratedDocument>;
}

/// Session-lifetime storage for documents the user decided to keep.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends a document and returns it as stored.
    async fn save(&self, document: SavedDocument) -> PortResult<SavedDocument>;

    /// Returns every saved document in insertion order.
    async fn list(&self) -> PortResult<Vec<SavedDocument>>;
}

/// The host share sheet. Failures are expected and non-fatal; callers fall
/// back to the clipboard.
#[async_trait]
pub trait ShareService: Send + Sync {
    async fn share(&self, title: &str, text: &str) -> PortResult<()>;
}

/// The host clipboard, used as the share fallback sink.
#[async_trait]
pub trait ClipboardService: Send + Sync {
    async fn copy_text(&self, text: &str) -> PortResult<()>;
}
