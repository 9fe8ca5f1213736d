//! services/api/src/web/testutil.rs
//!
//! Shared helpers for the service's test modules: a zero-delay config and an
//! `AppState` wired with the shipped adapters.

use crate::adapters::{
    CannedImageAnalysis, CannedPdfAnalysis, CannedSpreadsheetAnalysis, HeuristicTextAnalysis,
    InMemoryDocumentStore, SystemClipboardAdapter, SystemShareAdapter, TemplateDraftGenerator,
};
use crate::config::Config;
use crate::web::state::AppState;
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: tracing::Level::INFO,
        allowed_origin: "http://localhost:5173".to_string(),
        max_upload_bytes: 1024 * 1024,
        generation_delay: Duration::ZERO,
        image_analysis_delay: Duration::ZERO,
        pdf_analysis_delay: Duration::ZERO,
        spreadsheet_analysis_delay: Duration::ZERO,
        text_analysis_delay: Duration::ZERO,
    }
}

/// Builds an `AppState` with the shipped adapters, honoring the delays in the
/// given config.
pub(crate) fn app_state_from_config(config: Arc<Config>) -> Arc<AppState> {
    Arc::new(AppState::new(
        config.clone(),
        Arc::new(CannedImageAnalysis::new(config.image_analysis_delay)),
        Arc::new(CannedPdfAnalysis::new(config.pdf_analysis_delay)),
        Arc::new(CannedSpreadsheetAnalysis::new(
            config.spreadsheet_analysis_delay,
        )),
        Arc::new(HeuristicTextAnalysis::new(config.text_analysis_delay)),
        Arc::new(TemplateDraftGenerator::new(config.generation_delay)),
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(SystemShareAdapter::new()),
        Arc::new(SystemClipboardAdapter::new()),
    ))
}

pub(crate) fn test_app_state() -> Arc<AppState> {
    app_state_from_config(Arc::new(test_config()))
}
