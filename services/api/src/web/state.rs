//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-session wizard state.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use writing_assistant_core::domain::{
    DocumentRequest, FileCategory, GeneratedDocument, PlaybackState, ToneCatalog, ToneStyle,
};
use writing_assistant_core::ports::{
    ClipboardService, DocumentStore, DraftGenerationService, FileAnalysisService, ShareService,
};

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub config: Arc<Config>,
    pub image_analyzer: Arc<dyn FileAnalysisService>,
    pub pdf_analyzer: Arc<dyn FileAnalysisService>,
    pub spreadsheet_analyzer: Arc<dyn FileAnalysisService>,
    pub text_analyzer: Arc<dyn FileAnalysisService>,
    pub generator: Arc<dyn DraftGenerationService>,
    pub store: Arc<dyn DocumentStore>,
    pub share: Arc<dyn ShareService>,
    pub clipboard: Arc<dyn ClipboardService>,
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<WizardSession>>>>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<Config>,
        image_analyzer: Arc<dyn FileAnalysisService>,
        pdf_analyzer: Arc<dyn FileAnalysisService>,
        spreadsheet_analyzer: Arc<dyn FileAnalysisService>,
        text_analyzer: Arc<dyn FileAnalysisService>,
        generator: Arc<dyn DraftGenerationService>,
        store: Arc<dyn DocumentStore>,
        share: Arc<dyn ShareService>,
        clipboard: Arc<dyn ClipboardService>,
    ) -> Self {
        Self {
            config,
            image_analyzer,
            pdf_analyzer,
            spreadsheet_analyzer,
            text_analyzer,
            generator,
            store,
            share,
            clipboard,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Routes a classified upload to its analysis provider.
    pub fn analyzer_for(&self, category: FileCategory) -> Arc<dyn FileAnalysisService> {
        match category {
            FileCategory::Image => self.image_analyzer.clone(),
            FileCategory::Pdf => self.pdf_analyzer.clone(),
            FileCategory::Spreadsheet => self.spreadsheet_analyzer.clone(),
            FileCategory::Text => self.text_analyzer.clone(),
        }
    }

    pub async fn create_session(&self) -> (Uuid, Arc<Mutex<WizardSession>>) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(WizardSession::new(id)));
        self.sessions.lock().await.insert(id, session.clone());
        (id, session)
    }

    pub async fn session(&self, id: Uuid) -> Option<Arc<Mutex<WizardSession>>> {
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Detaches a session from the registry; the caller is responsible for
    /// stopping its practice ticker.
    pub async fn remove_session(&self, id: Uuid) -> Option<Arc<Mutex<WizardSession>>> {
        self.sessions.lock().await.remove(&id)
    }
}

//=========================================================================================
// WizardSession (Specific to One Wizard Run)
//=========================================================================================

/// The wizard's three steps. There is no terminal step; the user can always
/// return to `Select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Select,
    Input,
    Generated,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Input => "input",
            Self::Generated => "generated",
        }
    }
}

/// Errors for wizard operations attempted at the wrong time.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("this operation is not valid in the '{0}' step")]
    WrongStep(&'static str),
    #[error("document type must not be blank")]
    BlankDocumentType,
    #[error("purpose, audience and keywords must all be filled in before generation")]
    MissingFields,
    #[error("no draft has been generated yet")]
    NoDraft,
}

/// The state for a single wizard run: the step machine, the in-progress
/// request, the draft, the rehearsal stopwatch and the tone catalog, owned
/// as one object so reset and teardown are single code paths.
pub struct WizardSession {
    pub id: Uuid,
    pub step: WizardStep,
    pub request: DocumentRequest,
    pub draft: Option<GeneratedDocument>,
    pub playback: PlaybackState,
    pub tone_catalog: ToneCatalog,
    pub is_generating: bool,
    pub is_analyzing: bool,
    /// Bumped on every reset; async completions captured under an older epoch
    /// are discarded instead of applied.
    pub generation_epoch: u64,
    /// Cancels the practice ticker. Replaced with a fresh token on every
    /// start so a cancelled ticker can never be resumed by accident.
    practice_token: CancellationToken,
    /// Image preview bytes, keyed by reference file id. Removing the file
    /// revokes its preview.
    pub previews: HashMap<Uuid, Vec<u8>>,
}

impl WizardSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            step: WizardStep::Select,
            request: DocumentRequest::default(),
            draft: None,
            playback: PlaybackState::default(),
            tone_catalog: ToneCatalog::default(),
            is_generating: false,
            is_analyzing: false,
            generation_epoch: 0,
            practice_token: CancellationToken::new(),
            previews: HashMap::new(),
        }
    }

    /// `Select` -> `Input`, fixing the document type for this run.
    pub fn select_document_type(&mut self, raw: &str) -> Result<(), WizardError> {
        if self.step != WizardStep::Select {
            return Err(WizardError::WrongStep(self.step.as_str()));
        }
        if raw.trim().is_empty() {
            return Err(WizardError::BlankDocumentType);
        }
        self.request.document_type = raw.to_string();
        self.step = WizardStep::Input;
        Ok(())
    }

    /// `Input` -> `Select`. The partially-filled request is discarded; the
    /// caller gets a clean slate on re-entry.
    pub fn return_to_select(&mut self) -> Result<(), WizardError> {
        if self.step != WizardStep::Input {
            return Err(WizardError::WrongStep(self.step.as_str()));
        }
        self.request = DocumentRequest::default();
        self.previews.clear();
        self.step = WizardStep::Select;
        Ok(())
    }

    /// Resolves the selected tone preset against the catalog; missing or
    /// deleted selections degrade to the default style.
    pub fn resolved_tone_style(&self) -> ToneStyle {
        self.tone_catalog
            .resolve_style(self.request.tone_preset.as_deref())
    }

    /// Every analysis key point, flattened in upload order.
    pub fn aggregated_key_points(&self) -> Vec<String> {
        self.request
            .reference_files
            .iter()
            .filter_map(|file| file.analysis.as_ref())
            .flat_map(|analysis| analysis.key_points.iter().cloned())
            .collect()
    }

    /// Replaces the draft's content after generation. Title and structure are
    /// never recomputed.
    pub fn edit_content(&mut self, content: String) -> Result<(), WizardError> {
        if self.step != WizardStep::Generated {
            return Err(WizardError::WrongStep(self.step.as_str()));
        }
        let draft = self.draft.as_mut().ok_or(WizardError::NoDraft)?;
        draft.content = content;
        Ok(())
    }

    /// Removes a reference file and revokes its preview. Returns whether the
    /// id existed; other entries keep their ids and order.
    pub fn remove_reference(&mut self, file_id: Uuid) -> bool {
        let before = self.request.reference_files.len();
        self.request.reference_files.retain(|f| f.id != file_id);
        self.previews.remove(&file_id);
        self.request.reference_files.len() != before
    }

    /// Starts the rehearsal stopwatch. Returns the token the new ticker must
    /// watch, or `None` when one is already running (no second ticker).
    pub fn begin_practice(&mut self) -> Option<CancellationToken> {
        if self.playback.running {
            return None;
        }
        self.practice_token = CancellationToken::new();
        self.playback.running = true;
        Some(self.practice_token.clone())
    }

    /// Stops the stopwatch, keeping the elapsed time. Returns whether a
    /// ticker was actually running.
    pub fn pause_practice(&mut self) -> bool {
        let was_running = self.playback.running;
        self.stop_practice();
        was_running
    }

    /// Cancels any ticker and zeroes the whole playback state.
    pub fn reset_practice(&mut self) {
        self.stop_practice();
        self.playback = PlaybackState::default();
    }

    /// The single release path for the ticker. Reachable from pause, reset,
    /// the full wizard reset and session teardown.
    pub fn stop_practice(&mut self) {
        self.practice_token.cancel();
        self.playback.running = false;
    }

    /// Returns the wizard to its initial state. Idempotent. The tone catalog
    /// deliberately survives; everything else is cleared and in-flight async
    /// completions are invalidated via the epoch bump.
    pub fn reset_all(&mut self) {
        self.stop_practice();
        self.request = DocumentRequest::default();
        self.draft = None;
        self.playback = PlaybackState::default();
        self.is_generating = false;
        self.is_analyzing = false;
        self.generation_epoch += 1;
        self.previews.clear();
        self.step = WizardStep::Select;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> WizardSession {
        WizardSession::new(Uuid::new_v4())
    }

    #[test]
    fn document_type_selection_moves_to_input() {
        let mut session = session();
        session.select_document_type("presentation").unwrap();
        assert_eq!(session.step, WizardStep::Input);
        assert_eq!(session.request.document_type, "presentation");

        // Selecting again outside the select step is refused.
        assert_eq!(
            session.select_document_type("report"),
            Err(WizardError::WrongStep("input"))
        );
    }

    #[test]
    fn blank_document_type_is_rejected() {
        let mut session = session();
        assert_eq!(
            session.select_document_type("  "),
            Err(WizardError::BlankDocumentType)
        );
        assert_eq!(session.step, WizardStep::Select);
    }

    #[test]
    fn returning_to_select_clears_the_request() {
        let mut session = session();
        session.select_document_type("report").unwrap();
        session.request.purpose = "Q4".to_string();
        session.return_to_select().unwrap();
        assert_eq!(session.step, WizardStep::Select);
        assert!(session.request.purpose.is_empty());
        assert!(session.request.document_type.is_empty());
    }

    #[test]
    fn reset_all_is_idempotent_and_bumps_the_epoch() {
        let mut session = session();
        session.select_document_type("presentation").unwrap();
        session.request.purpose = "Q4".to_string();
        session.is_generating = true;
        session.playback.elapsed_seconds = 42;

        session.reset_all();
        let epoch_after_first = session.generation_epoch;
        assert_eq!(session.step, WizardStep::Select);
        assert!(!session.is_generating);
        assert_eq!(session.playback, PlaybackState::default());
        assert!(session.request.purpose.is_empty());

        session.reset_all();
        assert_eq!(session.step, WizardStep::Select);
        assert_eq!(session.playback, PlaybackState::default());
        assert_eq!(session.generation_epoch, epoch_after_first + 1);
    }

    #[test]
    fn begin_practice_refuses_a_second_ticker() {
        let mut session = session();
        let first = session.begin_practice();
        assert!(first.is_some());
        assert!(session.begin_practice().is_none());

        assert!(session.pause_practice());
        assert!(first.unwrap().is_cancelled());
        assert!(!session.pause_practice());
    }

    #[test]
    fn edit_content_requires_a_generated_draft() {
        let mut session = session();
        assert_eq!(
            session.edit_content("new".to_string()),
            Err(WizardError::WrongStep("select"))
        );
    }
}
