//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the wizard REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::generation_task::{generation_process, GenerationError, GenerationOutcome};
use crate::web::ingest_task::ingest_batch;
use crate::web::state::{AppState, WizardError, WizardSession, WizardStep};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;
use writing_assistant_core::domain::{
    DocumentRequest, DurationChoice, Formality, GeneratedDocument, PlaybackState, ReferenceFile,
    ReferenceUpload, SavedDocument, StructurePreference, Tone, TonePreset, ToneStyle,
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_wizard_handler,
        wizard_snapshot_handler,
        teardown_wizard_handler,
        select_document_type_handler,
        return_to_select_handler,
        update_fields_handler,
        upload_references_handler,
        remove_reference_handler,
        reference_preview_handler,
        add_tone_preset_handler,
        remove_tone_preset_handler,
        generate_handler,
        edit_content_handler,
        save_document_handler,
        list_documents_handler,
        share_document_handler,
        reset_wizard_handler,
    ),
    components(schemas(
        CreateWizardResponse,
        WizardSnapshot,
        DocumentRequestDto,
        ReferenceFileDto,
        FileAnalysisDto,
        SpreadsheetFiguresDto,
        GeneratedDocumentDto,
        PlaybackDto,
        TonePresetDto,
        SelectTypePayload,
        FieldsPayload,
        TonePresetPayload,
        GenerateResponse,
        EditContentPayload,
        SavedDocumentDto,
        ShareResponse,
    )),
    tags(
        (name = "Writing Assistant API", description = "API endpoints for the draft wizard.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload sent after successfully creating a wizard session.
#[derive(Serialize, ToSchema)]
pub struct CreateWizardResponse {
    session_id: Uuid,
}

/// A full view of one wizard session.
#[derive(Serialize, ToSchema)]
pub struct WizardSnapshot {
    session_id: Uuid,
    step: String,
    is_generating: bool,
    is_analyzing: bool,
    request: DocumentRequestDto,
    draft: Option<GeneratedDocumentDto>,
    playback: PlaybackDto,
    tone_presets: Vec<TonePresetDto>,
}

#[derive(Serialize, ToSchema)]
pub struct DocumentRequestDto {
    document_type: String,
    purpose: String,
    audience: String,
    keywords: String,
    duration_minutes: Option<u32>,
    tone_preset: Option<String>,
    custom_tone: Option<String>,
    reference_files: Vec<ReferenceFileDto>,
}

#[derive(Serialize, ToSchema)]
pub struct ReferenceFileDto {
    id: Uuid,
    name: String,
    media_type: String,
    size_bytes: u64,
    preview_url: Option<String>,
    analysis: Option<FileAnalysisDto>,
    analysis_error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct FileAnalysisDto {
    category: String,
    summary: String,
    key_points: Vec<String>,
    insights: Vec<String>,
    figures: Option<SpreadsheetFiguresDto>,
}

#[derive(Serialize, ToSchema)]
pub struct SpreadsheetFiguresDto {
    total_revenue: String,
    growth_rate: String,
    customer_count: u32,
}

#[derive(Serialize, ToSchema)]
pub struct GeneratedDocumentDto {
    title: String,
    structure: Vec<String>,
    content: String,
    estimated_duration: String,
    length_metric: u32,
    referenced_file_names: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PlaybackDto {
    running: bool,
    current_section_index: usize,
    elapsed_seconds: u64,
    clock: String,
    muted: bool,
    speed_multiplier: f32,
}

#[derive(Serialize, ToSchema)]
pub struct TonePresetDto {
    id: String,
    display_name: String,
    description: String,
    example_text: String,
    formality: String,
    tone: String,
    structure: String,
}

/// Selects the document type and enters the input step.
#[derive(Deserialize, ToSchema)]
pub struct SelectTypePayload {
    document_type: String,
}

/// A partial update of the input-step form fields. Absent fields are left
/// untouched; empty tone strings clear the selection.
#[derive(Deserialize, ToSchema)]
pub struct FieldsPayload {
    purpose: Option<String>,
    audience: Option<String>,
    keywords: Option<String>,
    duration_minutes: Option<u32>,
    tone_preset: Option<String>,
    custom_tone: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct TonePresetPayload {
    id: String,
    display_name: String,
    description: String,
    example_text: String,
    formality: String,
    tone: String,
    structure: String,
}

#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    status: String,
    draft: Option<GeneratedDocumentDto>,
}

#[derive(Deserialize, ToSchema)]
pub struct EditContentPayload {
    content: String,
}

#[derive(Serialize, ToSchema)]
pub struct SavedDocumentDto {
    id: Uuid,
    title: String,
    content: String,
    document_type: String,
    created_at: String,
    length_metric: u32,
    referenced_file_names: Vec<String>,
}

/// Reports which sink actually delivered the shared content.
#[derive(Serialize, ToSchema)]
pub struct ShareResponse {
    delivered_via: String,
}

//=========================================================================================
// DTO Conversion Helpers
//=========================================================================================

fn reference_file_dto(file: &ReferenceFile) -> ReferenceFileDto {
    ReferenceFileDto {
        id: file.id,
        name: file.name.clone(),
        media_type: file.declared_media_type.clone(),
        size_bytes: file.size_bytes,
        preview_url: file.preview_url.clone(),
        analysis: file.analysis.as_ref().map(|analysis| FileAnalysisDto {
            category: analysis.category.as_str().to_string(),
            summary: analysis.summary.clone(),
            key_points: analysis.key_points.clone(),
            insights: analysis.insights.clone(),
            figures: analysis.figures.as_ref().map(|figures| SpreadsheetFiguresDto {
                total_revenue: figures.total_revenue.clone(),
                growth_rate: figures.growth_rate.clone(),
                customer_count: figures.customer_count,
            }),
        }),
        analysis_error: file.analysis_error.clone(),
    }
}

fn request_dto(request: &DocumentRequest) -> DocumentRequestDto {
    DocumentRequestDto {
        document_type: request.document_type.clone(),
        purpose: request.purpose.clone(),
        audience: request.audience.clone(),
        keywords: request.keywords.clone(),
        duration_minutes: request.duration.map(|d| d.minutes()),
        tone_preset: request.tone_preset.clone(),
        custom_tone: request.custom_tone.clone(),
        reference_files: request.reference_files.iter().map(reference_file_dto).collect(),
    }
}

fn draft_dto(draft: &GeneratedDocument) -> GeneratedDocumentDto {
    GeneratedDocumentDto {
        title: draft.title.clone(),
        structure: draft.structure.clone(),
        content: draft.content.clone(),
        estimated_duration: draft.estimated_duration.clone(),
        length_metric: draft.length_metric,
        referenced_file_names: draft.referenced_file_names.clone(),
    }
}

fn playback_dto(playback: &PlaybackState) -> PlaybackDto {
    PlaybackDto {
        running: playback.running,
        current_section_index: playback.current_section_index,
        elapsed_seconds: playback.elapsed_seconds,
        clock: playback.clock(),
        muted: playback.muted,
        speed_multiplier: playback.speed_multiplier,
    }
}

fn preset_dto(preset: &TonePreset) -> TonePresetDto {
    TonePresetDto {
        id: preset.id.clone(),
        display_name: preset.display_name.clone(),
        description: preset.description.clone(),
        example_text: preset.example_text.clone(),
        formality: preset.style.formality.as_str().to_string(),
        tone: preset.style.tone.as_str().to_string(),
        structure: preset.style.structure.as_str().to_string(),
    }
}

fn snapshot(session: &WizardSession) -> WizardSnapshot {
    WizardSnapshot {
        session_id: session.id,
        step: session.step.as_str().to_string(),
        is_generating: session.is_generating,
        is_analyzing: session.is_analyzing,
        request: request_dto(&session.request),
        draft: session.draft.as_ref().map(draft_dto),
        playback: playback_dto(&session.playback),
        tone_presets: session.tone_catalog.iter().map(preset_dto).collect(),
    }
}

fn saved_dto(document: &SavedDocument) -> SavedDocumentDto {
    SavedDocumentDto {
        id: document.id,
        title: document.title.clone(),
        content: document.content.clone(),
        document_type: document.document_type.clone(),
        created_at: document.created_at.to_rfc3339(),
        length_metric: document.length_metric,
        referenced_file_names: document.referenced_file_names.clone(),
    }
}

//=========================================================================================
// Shared Handler Plumbing
//=========================================================================================

async fn load_session(
    app_state: &Arc<AppState>,
    session_id: Uuid,
) -> Result<Arc<Mutex<WizardSession>>, (StatusCode, String)> {
    app_state.session(session_id).await.ok_or((
        StatusCode::NOT_FOUND,
        "Unknown wizard session".to_string(),
    ))
}

fn wizard_error_response(error: WizardError) -> (StatusCode, String) {
    let status = match error {
        WizardError::WrongStep(_) | WizardError::NoDraft => StatusCode::CONFLICT,
        WizardError::BlankDocumentType | WizardError::MissingFields => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    (status, error.to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new wizard session, starting at the select step.
#[utoipa::path(
    post,
    path = "/wizard",
    responses(
        (status = 201, description = "Wizard session created", body = CreateWizardResponse)
    )
)]
pub async fn create_wizard_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let (session_id, _) = app_state.create_session().await;
    (StatusCode::CREATED, Json(CreateWizardResponse { session_id }))
}

/// Fetch the full state of one wizard session.
#[utoipa::path(
    get,
    path = "/wizard/{session_id}",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    responses(
        (status = 200, description = "Current wizard state", body = WizardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn wizard_snapshot_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let session = session_lock.lock().await;
    Ok(Json(snapshot(&session)))
}

/// Tear a wizard session down, releasing its practice ticker.
#[utoipa::path(
    delete,
    path = "/wizard/{session_id}",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    responses(
        (status = 204, description = "Session removed"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn teardown_wizard_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.remove_session(session_id).await {
        Some(session_lock) => {
            session_lock.lock().await.stop_practice();
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err((
            StatusCode::NOT_FOUND,
            "Unknown wizard session".to_string(),
        )),
    }
}

/// Pick a document type and enter the input step.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/document-type",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    request_body = SelectTypePayload,
    responses(
        (status = 200, description = "Document type selected", body = WizardSnapshot),
        (status = 409, description = "Not in the select step"),
        (status = 422, description = "Blank document type")
    )
)]
pub async fn select_document_type_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<SelectTypePayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    session
        .select_document_type(&payload.document_type)
        .map_err(wizard_error_response)?;
    Ok(Json(snapshot(&session)))
}

/// Return from the input step to the select step, discarding the request.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/back",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    responses(
        (status = 200, description = "Back at the select step", body = WizardSnapshot),
        (status = 409, description = "Not in the input step")
    )
)]
pub async fn return_to_select_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    session.return_to_select().map_err(wizard_error_response)?;
    Ok(Json(snapshot(&session)))
}

/// Update the input-step form fields.
#[utoipa::path(
    put,
    path = "/wizard/{session_id}/fields",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    request_body = FieldsPayload,
    responses(
        (status = 200, description = "Fields updated", body = WizardSnapshot),
        (status = 409, description = "Not in the input step"),
        (status = 422, description = "Invalid duration")
    )
)]
pub async fn update_fields_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<FieldsPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    if session.step != WizardStep::Input {
        return Err(wizard_error_response(WizardError::WrongStep(
            session.step.as_str(),
        )));
    }

    if let Some(minutes) = payload.duration_minutes {
        let duration = DurationChoice::parse(minutes).ok_or((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is not an offered duration", minutes),
        ))?;
        session.request.duration = Some(duration);
    }
    if let Some(purpose) = payload.purpose {
        session.request.purpose = purpose;
    }
    if let Some(audience) = payload.audience {
        session.request.audience = audience;
    }
    if let Some(keywords) = payload.keywords {
        session.request.keywords = keywords;
    }
    if let Some(tone_preset) = payload.tone_preset {
        session.request.tone_preset = (!tone_preset.is_empty()).then_some(tone_preset);
    }
    if let Some(custom_tone) = payload.custom_tone {
        session.request.custom_tone = (!custom_tone.is_empty()).then_some(custom_tone);
    }

    Ok(Json(snapshot(&session)))
}

/// Upload a batch of reference files.
///
/// Files are analyzed strictly in upload order; the response is sent once the
/// whole batch has been ingested.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/references",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    request_body(content_type = "multipart/form-data", description = "The reference files to upload."),
    responses(
        (status = 200, description = "Batch ingested", body = WizardSnapshot),
        (status = 409, description = "Not in the input step"),
        (status = 500, description = "Malformed multipart body")
    )
)]
pub async fn upload_references_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    {
        let session = session_lock.lock().await;
        if session.step != WizardStep::Input {
            return Err(wizard_error_response(WizardError::WrongStep(
                session.step.as_str(),
            )));
        }
    }

    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let file_name = field.file_name().unwrap_or("untitled").to_string();
        let declared_media_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        uploads.push(ReferenceUpload {
            file_name,
            declared_media_type,
            bytes: data.to_vec(),
        });
    }
    if uploads.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include at least one file".to_string(),
        ));
    }

    ingest_batch(app_state.clone(), session_lock.clone(), uploads).await;

    let session = session_lock.lock().await;
    Ok(Json(snapshot(&session)))
}

/// Remove a reference file and revoke its preview.
#[utoipa::path(
    delete,
    path = "/wizard/{session_id}/references/{file_id}",
    params(
        ("session_id" = Uuid, Path, description = "The wizard session id"),
        ("file_id" = Uuid, Path, description = "The reference file id")
    ),
    responses(
        (status = 204, description = "Reference removed"),
        (status = 404, description = "Unknown session or file")
    )
)]
pub async fn remove_reference_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    if session.remove_reference(file_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            "Unknown reference file".to_string(),
        ))
    }
}

/// Serve the preview bytes of an uploaded image.
#[utoipa::path(
    get,
    path = "/wizard/{session_id}/references/{file_id}/preview",
    params(
        ("session_id" = Uuid, Path, description = "The wizard session id"),
        ("file_id" = Uuid, Path, description = "The reference file id")
    ),
    responses(
        (status = 200, description = "The image bytes"),
        (status = 404, description = "No preview for this file")
    )
)]
pub async fn reference_preview_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let session = session_lock.lock().await;
    let bytes = session.previews.get(&file_id).cloned().ok_or((
        StatusCode::NOT_FOUND,
        "No preview for this file".to_string(),
    ))?;
    let media_type = session
        .request
        .reference_files
        .iter()
        .find(|f| f.id == file_id)
        .map(|f| f.declared_media_type.clone())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(([(header::CONTENT_TYPE, media_type)], bytes))
}

/// Add a tone preset to this session's catalog.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/tone-presets",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    request_body = TonePresetPayload,
    responses(
        (status = 201, description = "Preset added", body = TonePresetDto),
        (status = 409, description = "Duplicate preset id"),
        (status = 422, description = "Unknown style value")
    )
)]
pub async fn add_tone_preset_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<TonePresetPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let style = ToneStyle {
        formality: Formality::parse(&payload.formality).ok_or((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is not a formality", payload.formality),
        ))?,
        tone: Tone::parse(&payload.tone).ok_or((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is not a tone", payload.tone),
        ))?,
        structure: StructurePreference::parse(&payload.structure).ok_or((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is not a structure preference", payload.structure),
        ))?,
    };
    let preset = TonePreset {
        id: payload.id,
        display_name: payload.display_name,
        description: payload.description,
        example_text: payload.example_text,
        style,
    };

    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    session
        .tone_catalog
        .add(preset.clone())
        .map_err(|e| (StatusCode::CONFLICT, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(preset_dto(&preset))))
}

/// Delete a tone preset. Requests still pointing at it fall back to the
/// default style.
#[utoipa::path(
    delete,
    path = "/wizard/{session_id}/tone-presets/{preset_id}",
    params(
        ("session_id" = Uuid, Path, description = "The wizard session id"),
        ("preset_id" = String, Path, description = "The preset id")
    ),
    responses(
        (status = 204, description = "Preset removed"),
        (status = 404, description = "Unknown session or preset")
    )
)]
pub async fn remove_tone_preset_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, preset_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    if session.tone_catalog.remove(&preset_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Unknown tone preset".to_string()))
    }
}

/// Generate the draft from the current request.
///
/// A second call while a generation is in flight is a no-op and reports
/// `already_generating`.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/generate",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    responses(
        (status = 200, description = "Draft generated (or generation already in flight)", body = GenerateResponse),
        (status = 409, description = "Not in the input step"),
        (status = 422, description = "Required fields are missing"),
        (status = 500, description = "The generation provider failed")
    )
)]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    match generation_process(app_state.clone(), session_lock).await {
        Ok(GenerationOutcome::Completed(draft)) => Ok(Json(GenerateResponse {
            status: "generated".to_string(),
            draft: Some(draft_dto(&draft)),
        })),
        Ok(GenerationOutcome::AlreadyGenerating) => Ok(Json(GenerateResponse {
            status: "already_generating".to_string(),
            draft: None,
        })),
        Ok(GenerationOutcome::Stale) => Ok(Json(GenerateResponse {
            status: "discarded".to_string(),
            draft: None,
        })),
        Err(GenerationError::Wizard(e)) => Err(wizard_error_response(e)),
        Err(GenerationError::Port(e)) => {
            error!("Draft generation failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Draft generation failed".to_string(),
            ))
        }
    }
}

/// Replace the draft's content after generation.
#[utoipa::path(
    put,
    path = "/wizard/{session_id}/content",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    request_body = EditContentPayload,
    responses(
        (status = 200, description = "Content updated", body = GeneratedDocumentDto),
        (status = 409, description = "No generated draft to edit")
    )
)]
pub async fn edit_content_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<EditContentPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    session
        .edit_content(payload.content)
        .map_err(wizard_error_response)?;
    let draft = session
        .draft
        .as_ref()
        .ok_or_else(|| wizard_error_response(WizardError::NoDraft))?;
    Ok(Json(draft_dto(draft)))
}

/// Save the current draft into the session-lifetime store.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/save",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    responses(
        (status = 201, description = "Draft saved", body = SavedDocumentDto),
        (status = 409, description = "No generated draft to save"),
        (status = 500, description = "The store rejected the document")
    )
)]
pub async fn save_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let document = {
        let session = session_lock.lock().await;
        let draft = session
            .draft
            .as_ref()
            .ok_or_else(|| wizard_error_response(WizardError::NoDraft))?;
        SavedDocument {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            document_type: session.request.document_type.clone(),
            created_at: Utc::now(),
            length_metric: draft.length_metric,
            referenced_file_names: draft.referenced_file_names.clone(),
        }
    };

    match app_state.store.save(document).await {
        Ok(saved) => Ok((StatusCode::CREATED, Json(saved_dto(&saved)))),
        Err(e) => {
            error!("Failed to save document: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save document".to_string(),
            ))
        }
    }
}

/// List every document saved in this process.
#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "The saved documents in insertion order", body = [SavedDocumentDto])
    )
)]
pub async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.store.list().await {
        Ok(documents) => Ok(Json(
            documents.iter().map(saved_dto).collect::<Vec<_>>(),
        )),
        Err(e) => {
            error!("Failed to list documents: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list documents".to_string(),
            ))
        }
    }
}

/// Share the current draft, falling back to the clipboard if the share sheet
/// refuses it.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/share",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    responses(
        (status = 200, description = "Content delivered", body = ShareResponse),
        (status = 409, description = "No generated draft to share"),
        (status = 502, description = "Both share and clipboard sinks failed")
    )
)]
pub async fn share_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let (title, content) = {
        let session = session_lock.lock().await;
        let draft = session
            .draft
            .as_ref()
            .ok_or_else(|| wizard_error_response(WizardError::NoDraft))?;
        (draft.title.clone(), draft.content.clone())
    };

    match app_state.share.share(&title, &content).await {
        Ok(()) => Ok(Json(ShareResponse {
            delivered_via: "share".to_string(),
        })),
        Err(share_err) => {
            warn!("Share failed: {}. Falling back to the clipboard.", share_err);
            match app_state.clipboard.copy_text(&content).await {
                Ok(()) => Ok(Json(ShareResponse {
                    delivered_via: "clipboard".to_string(),
                })),
                Err(clipboard_err) => {
                    error!("Clipboard fallback failed: {}", clipboard_err);
                    Err((
                        StatusCode::BAD_GATEWAY,
                        "Could not deliver the document to any sink".to_string(),
                    ))
                }
            }
        }
    }
}

/// Reset the wizard to its initial state. Idempotent.
#[utoipa::path(
    post,
    path = "/wizard/{session_id}/reset",
    params(("session_id" = Uuid, Path, description = "The wizard session id")),
    responses(
        (status = 200, description = "Wizard back at the select step", body = WizardSnapshot),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn reset_wizard_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = load_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;
    session.reset_all();
    Ok(Json(snapshot(&session)))
}
