//! Wizard REST API integration tests.
//!
//! Run with: `cargo test -p api --test wizard_flow`
//! The simulated provider delays are set to zero so the flows run instantly.

use api_lib::adapters::{
    CannedImageAnalysis, CannedPdfAnalysis, CannedSpreadsheetAnalysis, HeuristicTextAnalysis,
    InMemoryDocumentStore, SystemClipboardAdapter, SystemShareAdapter, TemplateDraftGenerator,
};
use api_lib::config::Config;
use api_lib::web::{build_router, state::AppState};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn test_server() -> TestServer {
    let config = Arc::new(Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: tracing::Level::INFO,
        allowed_origin: "http://localhost:5173".to_string(),
        max_upload_bytes: 1024 * 1024,
        generation_delay: Duration::ZERO,
        image_analysis_delay: Duration::ZERO,
        pdf_analysis_delay: Duration::ZERO,
        spreadsheet_analysis_delay: Duration::ZERO,
        text_analysis_delay: Duration::ZERO,
    });
    let app_state = Arc::new(AppState::new(
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
    ));
    TestServer::new(build_router(app_state)).unwrap()
}

async fn create_session(server: &TestServer) -> String {
    let response = server.post("/wizard").await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    body["session_id"].as_str().unwrap().to_string()
}

async fn fill_fields(server: &TestServer, sid: &str, purpose: &str, audience: &str, keywords: &str) {
    let response = server
        .put(&format!("/wizard/{}/fields", sid))
        .json(&json!({
            "purpose": purpose,
            "audience": audience,
            "keywords": keywords,
        }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn full_presentation_flow_generates_saves_and_shares() {
    let server = test_server();
    let sid = create_session(&server).await;

    let response = server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "presentation"}))
        .await;
    assert_eq!(response.status_code(), 200);
    let snapshot: Value = response.json();
    assert_eq!(snapshot["step"], "input");

    fill_fields(&server, &sid, "신제품 런칭 전략", "팀 리더들", "전환율, A/B 테스트").await;

    let response = server.post(&format!("/wizard/{}/generate", sid)).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "generated");
    let draft = &body["draft"];
    assert_eq!(draft["title"], "신제품 런칭 전략 발표");
    assert_eq!(draft["structure"].as_array().unwrap().len(), 5);
    assert_eq!(draft["structure"][0], "인사 및 소개");
    assert!(draft["content"]
        .as_str()
        .unwrap()
        .contains("신제품 런칭 전략"));

    // Post-generation edits stick, without touching title or structure.
    let response = server
        .put(&format!("/wizard/{}/content", sid))
        .json(&json!({"content": "수정된 본문"}))
        .await;
    assert_eq!(response.status_code(), 200);
    let edited: Value = response.json();
    assert_eq!(edited["content"], "수정된 본문");
    assert_eq!(edited["title"], "신제품 런칭 전략 발표");

    let response = server.post(&format!("/wizard/{}/save", sid)).await;
    assert_eq!(response.status_code(), 201);

    let response = server.get("/documents").await;
    assert_eq!(response.status_code(), 200);
    let documents: Value = response.json();
    assert_eq!(documents.as_array().unwrap().len(), 1);
    assert_eq!(documents[0]["content"], "수정된 본문");

    let response = server.post(&format!("/wizard/{}/share", sid)).await;
    assert_eq!(response.status_code(), 200);
    let shared: Value = response.json();
    assert_eq!(shared["delivered_via"], "share");
}

#[tokio::test]
async fn formal_report_contains_every_field_and_the_heading() {
    let server = test_server();
    let sid = create_session(&server).await;

    server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "report"}))
        .await;
    fill_fields(&server, &sid, "Q4", "Team", "growth").await;
    // The corporate preset is formal/professional/detailed.
    let response = server
        .put(&format!("/wizard/{}/fields", sid))
        .json(&json!({"tone_preset": "corporate"}))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server.post(&format!("/wizard/{}/generate", sid)).await;
    let body: Value = response.json();
    let content = body["draft"]["content"].as_str().unwrap();
    assert!(content.starts_with("# Q4 보고서"));
    assert!(content.contains("Q4"));
    assert!(content.contains("growth"));
    assert_eq!(body["draft"]["title"], "Q4 보고서");
    assert_eq!(body["draft"]["structure"][0], "요약");
}

#[tokio::test]
async fn unknown_document_type_generates_the_presentation_fallback() {
    let server = test_server();
    let sid = create_session(&server).await;

    server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "memo"}))
        .await;
    fill_fields(&server, &sid, "Q4", "Team", "growth").await;

    let response = server.post(&format!("/wizard/{}/generate", sid)).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let structure: Vec<&str> = body["draft"]["structure"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(
        structure,
        vec!["인사 및 소개", "현황 분석", "핵심 메시지", "실행 계획", "질의응답"]
    );
}

#[tokio::test]
async fn generation_requires_the_three_fields() {
    let server = test_server();
    let sid = create_session(&server).await;

    server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "report"}))
        .await;
    fill_fields(&server, &sid, "Q4", "", "").await;

    let response = server.post(&format!("/wizard/{}/generate", sid)).await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn wizard_refuses_out_of_step_operations() {
    let server = test_server();
    let sid = create_session(&server).await;

    // Field updates and generation need the input step.
    let response = server
        .put(&format!("/wizard/{}/fields", sid))
        .json(&json!({"purpose": "Q4"}))
        .await;
    assert_eq!(response.status_code(), 409);
    let response = server.post(&format!("/wizard/{}/generate", sid)).await;
    assert_eq!(response.status_code(), 409);

    // A second type selection needs a trip back to the select step.
    server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "report"}))
        .await;
    let response = server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "greeting"}))
        .await;
    assert_eq!(response.status_code(), 409);

    let response = server.post(&format!("/wizard/{}/back", sid)).await;
    assert_eq!(response.status_code(), 200);
    let response = server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "greeting"}))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn reference_batch_uploads_in_order_and_removal_is_precise() {
    let server = test_server();
    let sid = create_session(&server).await;
    server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "presentation"}))
        .await;

    let form = MultipartForm::new()
        .add_part(
            "files",
            Part::bytes(b"img".to_vec())
                .file_name("growth-chart.png")
                .mime_type("image/png"),
        )
        .add_part(
            "files",
            Part::bytes("첫 문장. 둘째 문장. 셋째 문장. 넷째 문장.".as_bytes().to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        )
        .add_part(
            "files",
            Part::bytes(b"%PDF".to_vec())
                .file_name("market.pdf")
                .mime_type("application/pdf"),
        );
    let response = server
        .post(&format!("/wizard/{}/references", sid))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 200);
    let snapshot: Value = response.json();
    assert_eq!(snapshot["is_analyzing"], false);

    let files = snapshot["request"]["reference_files"].as_array().unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files[0]["name"], "growth-chart.png");
    assert_eq!(files[1]["name"], "notes.txt");
    assert_eq!(files[2]["name"], "market.pdf");
    for file in files {
        assert!(!file["analysis"].is_null());
    }
    assert_eq!(files[0]["analysis"]["category"], "chart");
    assert_eq!(files[1]["analysis"]["key_points"][0], "첫 문장");

    // The image preview is served until the file is removed.
    let preview_url = files[0]["preview_url"].as_str().unwrap().to_string();
    let response = server.get(&preview_url).await;
    assert_eq!(response.status_code(), 200);

    let removed_id = files[1]["id"].as_str().unwrap().to_string();
    let response = server
        .delete(&format!("/wizard/{}/references/{}", sid, removed_id))
        .await;
    assert_eq!(response.status_code(), 204);
    let response = server
        .delete(&format!("/wizard/{}/references/{}", sid, removed_id))
        .await;
    assert_eq!(response.status_code(), 404);

    let snapshot: Value = server.get(&format!("/wizard/{}", sid)).await.json();
    let files = snapshot["request"]["reference_files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["name"], "growth-chart.png");
    assert_eq!(files[1]["name"], "market.pdf");

    // Generating now injects the analysis results into the draft.
    fill_fields(&server, &sid, "Q4", "Team", "growth").await;
    let body: Value = server
        .post(&format!("/wizard/{}/generate", sid))
        .await
        .json();
    let content = body["draft"]["content"].as_str().unwrap();
    assert!(content.contains("참고 자료 분석 결과"));
    assert!(content.contains("- 매출 증가 추세"));
    let referenced = body["draft"]["referenced_file_names"].as_array().unwrap();
    assert_eq!(referenced.len(), 2);
}

#[tokio::test]
async fn tone_presets_can_be_added_once_and_deleted() {
    let server = test_server();
    let sid = create_session(&server).await;

    let payload = json!({
        "id": "casual-team",
        "display_name": "팀 내부",
        "description": "가볍게 쓰는 팀 내부 공유 톤",
        "example_text": "오늘도 고생 많았어요!",
        "formality": "casual",
        "tone": "friendly",
        "structure": "concise"
    });
    let response = server
        .post(&format!("/wizard/{}/tone-presets", sid))
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), 201);

    let response = server
        .post(&format!("/wizard/{}/tone-presets", sid))
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), 409);

    let response = server
        .delete(&format!("/wizard/{}/tone-presets/casual-team", sid))
        .await;
    assert_eq!(response.status_code(), 204);

    // A selection pointing at the deleted preset degrades to the default
    // style, which renders the casual presentation branch.
    server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "presentation"}))
        .await;
    fill_fields(&server, &sid, "Q4", "Team", "growth").await;
    server
        .put(&format!("/wizard/{}/fields", sid))
        .json(&json!({"tone_preset": "casual-team"}))
        .await;
    let body: Value = server
        .post(&format!("/wizard/{}/generate", sid))
        .await
        .json();
    assert!(body["draft"]["content"]
        .as_str()
        .unwrap()
        .contains("안녕하세요, Team 여러분!"));
}

#[tokio::test]
async fn reset_is_idempotent_and_returns_to_select() {
    let server = test_server();
    let sid = create_session(&server).await;

    server
        .post(&format!("/wizard/{}/document-type", sid))
        .json(&json!({"document_type": "report"}))
        .await;
    fill_fields(&server, &sid, "Q4", "Team", "growth").await;
    server.post(&format!("/wizard/{}/generate", sid)).await;

    for _ in 0..2 {
        let snapshot: Value = server
            .post(&format!("/wizard/{}/reset", sid))
            .await
            .json();
        assert_eq!(snapshot["step"], "select");
        assert_eq!(snapshot["request"]["purpose"], "");
        assert_eq!(snapshot["request"]["document_type"], "");
        assert!(snapshot["draft"].is_null());
        assert_eq!(snapshot["playback"]["elapsed_seconds"], 0);
        assert_eq!(snapshot["playback"]["running"], false);
    }
}

#[tokio::test]
async fn unknown_sessions_return_not_found() {
    let server = test_server();
    let response = server
        .get("/wizard/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status_code(), 404);

    let response = server
        .delete("/wizard/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status_code(), 404);
}
