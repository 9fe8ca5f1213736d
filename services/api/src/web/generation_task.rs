//! services/api/src/web/generation_task.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! a single draft-generation cycle.

use crate::web::state::{AppState, WizardError, WizardSession, WizardStep};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use writing_assistant_core::domain::GeneratedDocument;
use writing_assistant_core::ports::PortError;

/// Represents the outcome of the `generation_process` task.
/// This tells the handler what to report back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The draft was generated and the wizard moved to the generated step.
    Completed(GeneratedDocument),
    /// A prior generation is still in flight; this call changed nothing.
    AlreadyGenerating,
    /// The wizard was reset while the provider was working; the result was
    /// discarded.
    Stale,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Port(#[from] PortError),
}

/// The main asynchronous task for generating a draft.
///
/// Validates the wizard state, marks the generation in flight, gathers the
/// inputs under a short lock, and calls the generation provider with the lock
/// released. The completion is applied only if the session epoch is unchanged;
/// a reset that happened mid-flight wins over the stale result.
pub async fn generation_process(
    app_state: Arc<AppState>,
    session_lock: Arc<Mutex<WizardSession>>,
) -> Result<GenerationOutcome, GenerationError> {
    let (epoch, request, style, key_points) = {
        let mut session = session_lock.lock().await;
        if session.step != WizardStep::Input {
            return Err(WizardError::WrongStep(session.step.as_str()).into());
        }
        if session.is_generating {
            info!("Generation already in flight; ignoring the duplicate request.");
            return Ok(GenerationOutcome::AlreadyGenerating);
        }
        if !session.request.is_ready_for_generation() {
            return Err(WizardError::MissingFields.into());
        }
        session.is_generating = true;
        (
            session.generation_epoch,
            session.request.clone(),
            session.resolved_tone_style(),
            session.aggregated_key_points(),
        )
    };

    info!(
        "Generating a '{}' draft with {} aggregated key point(s).",
        request.document_type,
        key_points.len()
    );
    let result = app_state
        .generator
        .generate_draft(&request, &style, &key_points)
        .await;

    let mut session = session_lock.lock().await;
    if session.generation_epoch != epoch {
        info!("Wizard was reset while generating. Discarding the stale draft.");
        return Ok(GenerationOutcome::Stale);
    }
    session.is_generating = false;

    match result {
        Ok(draft) => {
            session.draft = Some(draft.clone());
            session.step = WizardStep::Generated;
            info!("Draft '{}' generated.", draft.title);
            Ok(GenerationOutcome::Completed(draft))
        }
        Err(e) => {
            warn!("Draft generation failed: {}", e);
            Err(e.into())
        }
    }
}
