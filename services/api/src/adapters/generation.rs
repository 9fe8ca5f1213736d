//! services/api/src/adapters/generation.rs
//!
//! The template-backed draft generator. It implements the
//! `DraftGenerationService` port from the `core` crate by interpolating the
//! request fields into fixed per-type templates; the configured delay is the
//! only thing separating it from a pure function.

const PRESENTATION_FORMAL: &str = r#"# {purpose} 발표

## 1. 인사 및 소개 (30초)
존경하는 {audience} 여러분, 안녕하십니까.
오늘 {purpose}에 관하여 보고드리는 시간을 갖도록 하겠습니다.

## 2. 현황 분석 (1분)
현재 상황을 면밀히 검토한 결과, {keywords}와 관련하여
다음과 같은 핵심 사항들을 확인할 수 있었습니다.{reference_section}

## 3. 핵심 메시지 (1분 30초)
{keywords}를 중심으로 한 저희의 전략적 방향성은
다음과 같이 정리할 수 있겠습니다...

## 4. 실행 계획 (1분)
구체적인 실행 방안을 다음과 같이 제안드립니다...

## 5. 질의응답 (30초)
발표 내용에 대해 궁금한 사항이 있으시면 언제든 말씀해 주시기 바랍니다."#;

const PRESENTATION_CASUAL: &str = r#"# {purpose} 발표

## 1. 인사 및 소개 (30초)
안녕하세요, {audience} 여러분!
오늘은 {purpose}에 대해 함께 이야기해보려고 해요.

## 2. 현황 분석 (1분)
먼저 현재 상황을 살펴보면, {keywords}와 관련해서
정말 흥미로운 포인트들이 있어요.{reference_section}

## 3. 핵심 메시지 (1분 30초)
{keywords}를 중심으로 우리가 집중해야 할 부분은...

## 4. 실행 계획 (1분)
그래서 우리가 실제로 해야 할 일들을 정리해보면...

## 5. 질의응답 (30초)
궁금한 점이나 의견이 있으시면 편하게 말씀해 주세요!"#;

const REPORT_FORMAL: &str = r#"# {purpose} 보고서

## 요약
{keywords}와 관련된 주요 성과와 향후 계획을 보고드립니다.{reference_section}

## 배경 및 목적
{purpose}의 배경과 목적은...

## 주요 성과
{keywords} 관련 주요 성과:
- 성과 1
- 성과 2
- 성과 3

## 분석 결과
데이터 분석 결과...

## 향후 계획
다음 단계 실행 계획..."#;

const REPORT_CASUAL: &str = r#"# {purpose} 보고서

## 요약
{keywords}에 대한 이번 분기 성과를 정리해봤어요!{reference_section}

## 배경 및 목적
{purpose}를 시작하게 된 배경은...

## 주요 성과
이번에 달성한 주요 성과들:
- 성과 1
- 성과 2
- 성과 3

## 분석 결과
데이터를 분석해보니...

## 향후 계획
앞으로 이렇게 진행할 예정이에요..."#;

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;
use writing_assistant_core::domain::{
    DocumentRequest, DocumentType, Formality, GeneratedDocument, ToneStyle,
};
use writing_assistant_core::ports::{DraftGenerationService, PortResult};

//=========================================================================================
// Template Bundles
//=========================================================================================

/// The fixed per-type frame around the rendered body. Section structure and
/// length figures are static per document type, not measured from the text.
struct TemplateBundle {
    title: fn(&DocumentRequest) -> String,
    structure: [&'static str; 5],
    estimated_duration: &'static str,
    length_metric: u32,
}

fn bundle_for(kind: DocumentType) -> TemplateBundle {
    match kind {
        DocumentType::Presentation => TemplateBundle {
            title: |request| format!("{} 발표", request.purpose),
            structure: ["인사 및 소개", "현황 분석", "핵심 메시지", "실행 계획", "질의응답"],
            estimated_duration: "4분 30초",
            length_metric: 450,
        },
        DocumentType::Report => TemplateBundle {
            title: |request| format!("{} 보고서", request.purpose),
            structure: ["요약", "배경 및 목적", "주요 성과", "분석 결과", "향후 계획"],
            estimated_duration: "3분 읽기",
            length_metric: 380,
        },
        DocumentType::Retrospective => TemplateBundle {
            title: |request| format!("{} 회고", request.purpose),
            structure: [
                "프로젝트 개요",
                "Keep (잘한 점)",
                "Problem (문제점)",
                "Try (개선안)",
                "액션 아이템",
            ],
            estimated_duration: "2분 30초 읽기",
            length_metric: 320,
        },
        DocumentType::Greeting => TemplateBundle {
            title: |request| format!("{}님께 드리는 인사", request.audience),
            structure: ["정중한 인사", "안부 문의", "근황 공유", "감사 인사", "마무리 인사"],
            estimated_duration: "1분 30초 읽기",
            length_metric: 280,
        },
    }
}

/// Picks the body template. Only presentation and report carry distinct
/// formal/casual bodies; everything else, including unknown document types,
/// renders the formal presentation body.
fn body_template(kind: Option<DocumentType>, formality: Formality) -> &'static str {
    match (kind, formality) {
        (Some(DocumentType::Presentation), Formality::Formal) => PRESENTATION_FORMAL,
        (Some(DocumentType::Presentation), _) => PRESENTATION_CASUAL,
        (Some(DocumentType::Report), Formality::Formal) => REPORT_FORMAL,
        (Some(DocumentType::Report), _) => REPORT_CASUAL,
        _ => PRESENTATION_FORMAL,
    }
}

fn reference_section(reference_key_points: &[String]) -> String {
    if reference_key_points.is_empty() {
        return String::new();
    }
    let bullets = reference_key_points
        .iter()
        .map(|point| format!("- {}", point))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\n## 참고 자료 분석 결과\n{}\n", bullets)
}

/// Renders a draft deterministically from its inputs. Field values are
/// interpolated verbatim, without escaping or truncation.
pub(crate) fn render_draft(
    request: &DocumentRequest,
    style: &ToneStyle,
    reference_key_points: &[String],
) -> GeneratedDocument {
    let kind = DocumentType::parse(&request.document_type);
    if kind.is_none() {
        warn!(
            "Unknown document type '{}'; falling back to the presentation template.",
            request.document_type
        );
    }
    let bundle = bundle_for(kind.unwrap_or(DocumentType::Presentation));

    let content = body_template(kind, style.formality)
        .replace("{reference_section}", &reference_section(reference_key_points))
        .replace("{purpose}", &request.purpose)
        .replace("{audience}", &request.audience)
        .replace("{keywords}", &request.keywords);

    let referenced_file_names = request
        .reference_files
        .iter()
        .filter(|file| file.analysis.is_some())
        .map(|file| file.name.clone())
        .collect();

    GeneratedDocument {
        title: (bundle.title)(request),
        structure: bundle.structure.iter().map(|s| s.to_string()).collect(),
        content,
        estimated_duration: bundle.estimated_duration.to_string(),
        length_metric: bundle.length_metric,
        referenced_file_names,
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `DraftGenerationService` port by rendering
/// the fixed templates after a simulated generation delay.
#[derive(Clone)]
pub struct TemplateDraftGenerator {
    delay: Duration,
}

impl TemplateDraftGenerator {
    /// Creates a new `TemplateDraftGenerator`.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl DraftGenerationService for TemplateDraftGenerator {
    async fn generate_draft(
        &self,
        request: &DocumentRequest,
        style: &ToneStyle,
        reference_key_points: &[String],
    ) -> PortResult<GeneratedDocument> {
        tokio::time::sleep(self.delay).await;
        Ok(render_draft(request, style, reference_key_points))
    }
}
