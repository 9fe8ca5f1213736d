//! services/api/src/web/ingest_task.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! ingesting a batch of uploaded reference files.

use crate::web::state::{AppState, WizardSession};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;
use writing_assistant_core::domain::{FileCategory, ReferenceFile, ReferenceUpload};

/// Ingests a batch of uploads, strictly in the order supplied.
///
/// Each file is classified, analyzed by the matching provider and appended to
/// the request as its own analysis completes, so partial results are visible
/// mid-batch. A provider failure marks that file and the batch continues.
/// `is_analyzing` is true for exactly the duration of the batch. If the
/// wizard is reset mid-batch the remaining uploads are abandoned.
///
/// Returns the number of files appended.
pub async fn ingest_batch(
    app_state: Arc<AppState>,
    session_lock: Arc<Mutex<WizardSession>>,
    uploads: Vec<ReferenceUpload>,
) -> usize {
    let total = uploads.len();
    info!("Ingesting a batch of {} reference file(s).", total);

    let epoch = {
        let mut session = session_lock.lock().await;
        session.is_analyzing = true;
        session.generation_epoch
    };

    let mut ingested = 0;
    for upload in uploads {
        let file_id = Uuid::new_v4();
        let mut reference = ReferenceFile {
            id: file_id,
            name: upload.file_name.clone(),
            declared_media_type: upload.declared_media_type.clone(),
            size_bytes: upload.bytes.len() as u64,
            extracted_text: None,
            analysis: None,
            analysis_error: None,
            preview_url: None,
        };

        let category = FileCategory::classify(&upload.declared_media_type, &upload.file_name);
        let mut preview_bytes = None;
        match category {
            Some(category) => {
                if category == FileCategory::Text {
                    reference.extracted_text =
                        Some(String::from_utf8_lossy(&upload.bytes).into_owned());
                }

                match app_state.analyzer_for(category).analyze(&upload).await {
                    Ok(analysis) => reference.analysis = Some(analysis),
                    Err(e) => {
                        warn!(
                            "Analysis failed for '{}': {}. Continuing with the rest of the batch.",
                            upload.file_name, e
                        );
                        reference.analysis_error = Some(e.to_string());
                    }
                }

                if category == FileCategory::Image {
                    preview_bytes = Some(upload.bytes.clone());
                }
            }
            None => {
                warn!(
                    "No analyzer for '{}' ({}); attaching it without analysis.",
                    upload.file_name, upload.declared_media_type
                );
            }
        }

        let mut session = session_lock.lock().await;
        if session.generation_epoch != epoch {
            info!("Wizard was reset mid-batch. Abandoning the remaining uploads.");
            return ingested;
        }
        if let Some(bytes) = preview_bytes {
            reference.preview_url = Some(format!(
                "/wizard/{}/references/{}/preview",
                session.id, file_id
            ));
            session.previews.insert(file_id, bytes);
        }
        session.request.reference_files.push(reference);
        ingested += 1;
    }

    let mut session = session_lock.lock().await;
    if session.generation_epoch == epoch {
        session.is_analyzing = false;
    }
    info!("Reference batch complete: {}/{} ingested.", ingested, total);
    ingested
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::web::testutil::{app_state_from_config, test_app_state, test_config};
    use async_trait::async_trait;
    use std::time::Duration;
    use writing_assistant_core::domain::FileAnalysis;
    use writing_assistant_core::ports::{FileAnalysisService, PortError, PortResult};

    struct FailingAnalysis;

    #[async_trait]
    impl FileAnalysisService for FailingAnalysis {
        async fn analyze(&self, _upload: &ReferenceUpload) -> PortResult<FileAnalysis> {
            Err(PortError::Unexpected("backend unavailable".to_string()))
        }
    }

    fn upload(name: &str, media_type: &str, bytes: &[u8]) -> ReferenceUpload {
        ReferenceUpload {
            file_name: name.to_string(),
            declared_media_type: media_type.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn mixed_batch_ingests_every_file_in_upload_order() {
        let app_state = test_app_state();
        let (_, session_lock) = app_state.create_session().await;

        let uploads = vec![
            upload("chart.png", "image/png", b"png-bytes"),
            upload("market.pdf", "application/pdf", b"%PDF"),
            upload("notes.txt", "text/plain", "하나. 둘. 셋. 넷.".as_bytes()),
            upload("raw.bin", "application/octet-stream", b"\x00"),
        ];
        let ingested = ingest_batch(app_state, session_lock.clone(), uploads).await;
        assert_eq!(ingested, 4);

        let session = session_lock.lock().await;
        assert!(!session.is_analyzing);
        let files = &session.request.reference_files;
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["chart.png", "market.pdf", "notes.txt", "raw.bin"]);

        assert!(files[0].analysis.is_some());
        assert!(files[0].preview_url.is_some());
        assert!(session.previews.contains_key(&files[0].id));
        assert!(files[1].analysis.is_some());
        assert_eq!(files[2].extracted_text.as_deref(), Some("하나. 둘. 셋. 넷."));
        assert_eq!(
            files[2].analysis.as_ref().unwrap().key_points,
            vec!["하나", "둘", "셋"]
        );
        // Unsupported media gets attached without analysis.
        assert!(files[3].analysis.is_none());
        assert!(files[3].analysis_error.is_none());
    }

    #[tokio::test]
    async fn a_failing_provider_marks_the_file_and_the_batch_continues() {
        let app_state = test_app_state();
        let app_state = Arc::new(AppState::new(
            app_state.config.clone(),
            Arc::new(FailingAnalysis),
            app_state.pdf_analyzer.clone(),
            app_state.spreadsheet_analyzer.clone(),
            app_state.text_analyzer.clone(),
            app_state.generator.clone(),
            app_state.store.clone(),
            app_state.share.clone(),
            app_state.clipboard.clone(),
        ));
        let (_, session_lock) = app_state.create_session().await;

        let uploads = vec![
            upload("broken.png", "image/png", b""),
            upload("notes.txt", "text/plain", "문장 하나.".as_bytes()),
        ];
        let ingested = ingest_batch(app_state, session_lock.clone(), uploads).await;
        assert_eq!(ingested, 2);

        let session = session_lock.lock().await;
        let files = &session.request.reference_files;
        assert!(files[0].analysis.is_none());
        assert!(files[0]
            .analysis_error
            .as_deref()
            .unwrap()
            .contains("backend unavailable"));
        assert!(files[1].analysis.is_some());
        assert!(!session.is_analyzing);
    }

    #[tokio::test]
    async fn removing_a_file_leaves_the_others_untouched() {
        let app_state = test_app_state();
        let (_, session_lock) = app_state.create_session().await;

        let uploads = vec![
            upload("a.txt", "text/plain", b"a."),
            upload("b.txt", "text/plain", b"b."),
            upload("c.txt", "text/plain", b"c."),
        ];
        ingest_batch(app_state, session_lock.clone(), uploads).await;

        let mut session = session_lock.lock().await;
        let victim = session.request.reference_files[1].id;
        let keep_first = session.request.reference_files[0].id;
        let keep_last = session.request.reference_files[2].id;

        assert!(session.remove_reference(victim));
        assert!(!session.remove_reference(victim));

        let ids: Vec<Uuid> = session.request.reference_files.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![keep_first, keep_last]);
    }

    #[tokio::test(start_paused = true)]
    async fn is_analyzing_spans_exactly_the_batch_and_files_appear_sequentially() {
        // Real (simulated) delays so the batch is observable mid-flight.
        let config = Arc::new(Config {
            image_analysis_delay: Duration::from_millis(1000),
            pdf_analysis_delay: Duration::from_millis(1500),
            text_analysis_delay: Duration::from_millis(800),
            ..test_config()
        });
        let app_state = app_state_from_config(config);
        let (_, session_lock) = app_state.create_session().await;

        let uploads = vec![
            upload("photo.png", "image/png", b"img"),
            upload("notes.txt", "text/plain", "문장.".as_bytes()),
        ];
        let task = tokio::spawn(ingest_batch(app_state, session_lock.clone(), uploads));

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(session_lock.lock().await.is_analyzing);
        assert!(session_lock
            .lock()
            .await
            .request
            .reference_files
            .is_empty());

        // After the image's 1000 ms the first file is visible, the second is not.
        tokio::time::advance(Duration::from_millis(1000)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        {
            let session = session_lock.lock().await;
            assert_eq!(session.request.reference_files.len(), 1);
            assert!(session.is_analyzing);
        }

        tokio::time::advance(Duration::from_millis(800)).await;
        assert_eq!(task.await.unwrap(), 2);
        {
            let session = session_lock.lock().await;
            assert_eq!(session.request.reference_files.len(), 2);
            assert!(!session.is_analyzing);
        }
    }
}
