pub mod generation_task;
pub mod ingest_task;
pub mod practice_task;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export the main handler entry points to make them easily accessible
// to the binary that will build the web server router.
pub use state::AppState;
pub use ws_handler::ws_handler;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Builds the wizard router. The binary layers CORS and Swagger UI on top;
/// tests drive this router directly.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/wizard", post(rest::create_wizard_handler))
        .route(
            "/wizard/{session_id}",
            get(rest::wizard_snapshot_handler).delete(rest::teardown_wizard_handler),
        )
        .route(
            "/wizard/{session_id}/document-type",
            post(rest::select_document_type_handler),
        )
        .route("/wizard/{session_id}/back", post(rest::return_to_select_handler))
        .route("/wizard/{session_id}/fields", put(rest::update_fields_handler))
        .route(
            "/wizard/{session_id}/references",
            post(rest::upload_references_handler),
        )
        .route(
            "/wizard/{session_id}/references/{file_id}",
            delete(rest::remove_reference_handler),
        )
        .route(
            "/wizard/{session_id}/references/{file_id}/preview",
            get(rest::reference_preview_handler),
        )
        .route(
            "/wizard/{session_id}/tone-presets",
            post(rest::add_tone_preset_handler),
        )
        .route(
            "/wizard/{session_id}/tone-presets/{preset_id}",
            delete(rest::remove_tone_preset_handler),
        )
        .route("/wizard/{session_id}/generate", post(rest::generate_handler))
        .route("/wizard/{session_id}/content", put(rest::edit_content_handler))
        .route("/wizard/{session_id}/save", post(rest::save_document_handler))
        .route("/wizard/{session_id}/share", post(rest::share_document_handler))
        .route("/wizard/{session_id}/reset", post(rest::reset_wizard_handler))
        .route("/documents", get(rest::list_documents_handler))
        .route("/ws", get(ws_handler))
        .layer(DefaultBodyLimit::max(app_state.config.max_upload_bytes))
        .with_state(app_state)
}
