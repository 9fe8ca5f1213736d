//! services/api/src/adapters/analysis.rs
//!
//! Simulated analysis providers, one per file category. Each implements the
//! `FileAnalysisService` port from the `core` crate with a configured delay
//! and canned findings; a real content-analysis backend replaces these
//! adapters without touching the wizard.

use async_trait::async_trait;
use std::time::Duration;
use writing_assistant_core::domain::{
    AnalysisCategory, FileAnalysis, ReferenceUpload, SpreadsheetFigures,
};
use writing_assistant_core::ports::{FileAnalysisService, PortResult};

fn canned(points: &[&str]) -> Vec<String> {
    points.iter().map(|p| p.to_string()).collect()
}

//=========================================================================================
// Image Analysis
//=========================================================================================

/// Simulates an image-understanding backend. The filename steers which canned
/// reading the "model" produces.
#[derive(Clone)]
pub struct CannedImageAnalysis {
    delay: Duration,
}

impl CannedImageAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl FileAnalysisService for CannedImageAnalysis {
    async fn analyze(&self, upload: &ReferenceUpload) -> PortResult<FileAnalysis> {
        tokio::time::sleep(self.delay).await;

        let file_name = upload.file_name.to_lowercase();
        let analysis = if file_name.contains("chart") || file_name.contains("graph") {
            FileAnalysis {
                category: AnalysisCategory::Chart,
                summary: "차트/그래프 이미지로 데이터 시각화 자료입니다.".to_string(),
                key_points: canned(&["매출 증가 추세", "Q4 성과 향상", "목표 달성률 85%"]),
                insights: canned(&["전년 대비 20% 성장", "모바일 채널 성과 우수"]),
                figures: None,
            }
        } else if file_name.contains("screenshot") || file_name.contains("ui") {
            FileAnalysis {
                category: AnalysisCategory::Image,
                summary: "UI/UX 스크린샷 또는 제품 화면입니다.".to_string(),
                key_points: canned(&["사용자 인터페이스", "기능 개선사항", "디자인 변경점"]),
                insights: canned(&["사용성 개선", "시각적 일관성 확보"]),
                figures: None,
            }
        } else {
            FileAnalysis {
                category: AnalysisCategory::Image,
                summary: "참고용 이미지 자료입니다.".to_string(),
                key_points: canned(&["시각적 참고자료", "컨텍스트 제공"]),
                insights: canned(&["문서 이해도 향상에 도움"]),
                figures: None,
            }
        };

        Ok(analysis)
    }
}

//=========================================================================================
// PDF Analysis
//=========================================================================================

/// Simulates PDF text extraction and summarization.
#[derive(Clone)]
pub struct CannedPdfAnalysis {
    delay: Duration,
}

impl CannedPdfAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl FileAnalysisService for CannedPdfAnalysis {
    async fn analyze(&self, _upload: &ReferenceUpload) -> PortResult<FileAnalysis> {
        tokio::time::sleep(self.delay).await;

        Ok(FileAnalysis {
            category: AnalysisCategory::Text,
            summary: "PDF 문서에서 추출한 주요 내용입니다.".to_string(),
            key_points: canned(&["시장 분석 보고서", "경쟁사 현황", "향후 전략 방향", "예산 계획"]),
            insights: canned(&[
                "시장 성장률 12% 예상",
                "디지털 전환 가속화",
                "고객 만족도 개선 필요",
            ]),
            figures: None,
        })
    }
}

//=========================================================================================
// Spreadsheet Analysis
//=========================================================================================

/// Simulates tabular-data analysis, including a few headline figures.
#[derive(Clone)]
pub struct CannedSpreadsheetAnalysis {
    delay: Duration,
}

impl CannedSpreadsheetAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl FileAnalysisService for CannedSpreadsheetAnalysis {
    async fn analyze(&self, _upload: &ReferenceUpload) -> PortResult<FileAnalysis> {
        tokio::time::sleep(self.delay).await;

        Ok(FileAnalysis {
            category: AnalysisCategory::Data,
            summary: "스프레드시트 데이터 분석 결과입니다.".to_string(),
            key_points: canned(&["월별 매출 데이터", "고객 세그먼트 분석", "성과 지표 추이"]),
            insights: canned(&[
                "3분기 매출 15% 증가",
                "신규 고객 획득률 상승",
                "리텐션율 개선 필요",
            ]),
            figures: Some(SpreadsheetFigures {
                total_revenue: "₩1,250,000,000".to_string(),
                growth_rate: "15.3%".to_string(),
                customer_count: 1847,
            }),
        })
    }
}

//=========================================================================================
// Text Analysis
//=========================================================================================

/// Derives key points from the upload's own text: the first few sentences,
/// split on periods. A placeholder heuristic, not semantic extraction.
#[derive(Clone)]
pub struct HeuristicTextAnalysis {
    delay: Duration,
}

impl HeuristicTextAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

/// The number of leading sentences promoted to key points.
const KEY_POINT_LIMIT: usize = 3;

fn leading_sentences(text: &str, limit: usize) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl FileAnalysisService for HeuristicTextAnalysis {
    async fn analyze(&self, upload: &ReferenceUpload) -> PortResult<FileAnalysis> {
        tokio::time::sleep(self.delay).await;

        let text = String::from_utf8_lossy(&upload.bytes);
        Ok(FileAnalysis {
            category: AnalysisCategory::Text,
            summary: "텍스트 문서의 주요 내용을 분석했습니다.".to_string(),
            key_points: leading_sentences(&text, KEY_POINT_LIMIT),
            insights: canned(&["문서 톤 분석 완료", "핵심 키워드 추출", "구조 패턴 파악"]),
            figures: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, media_type: &str, bytes: &[u8]) -> ReferenceUpload {
        ReferenceUpload {
            file_name: name.to_string(),
            declared_media_type: media_type.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn image_analysis_branches_on_filename() {
        let adapter = CannedImageAnalysis::new(Duration::from_millis(1000));

        let chart = adapter
            .analyze(&upload("revenue-chart.png", "image/png", b""))
            .await
            .unwrap();
        assert_eq!(chart.category, AnalysisCategory::Chart);

        let screenshot = adapter
            .analyze(&upload("login-screenshot.png", "image/png", b""))
            .await
            .unwrap();
        assert_eq!(screenshot.category, AnalysisCategory::Image);
        assert_eq!(screenshot.summary, "UI/UX 스크린샷 또는 제품 화면입니다.");

        let generic = adapter
            .analyze(&upload("team.jpg", "image/jpeg", b""))
            .await
            .unwrap();
        assert_eq!(generic.summary, "참고용 이미지 자료입니다.");
    }

    #[tokio::test(start_paused = true)]
    async fn text_analysis_takes_first_three_sentences_as_key_points() {
        let adapter = HeuristicTextAnalysis::new(Duration::from_millis(800));
        let body = "첫 번째 문장. 두 번째 문장.  세 번째 문장. 네 번째 문장.";
        let analysis = adapter
            .analyze(&upload("notes.txt", "text/plain", body.as_bytes()))
            .await
            .unwrap();

        assert_eq!(
            analysis.key_points,
            vec!["첫 번째 문장", "두 번째 문장", "세 번째 문장"]
        );
        assert_eq!(analysis.category, AnalysisCategory::Text);
    }

    #[tokio::test(start_paused = true)]
    async fn text_analysis_handles_short_documents() {
        let adapter = HeuristicTextAnalysis::new(Duration::ZERO);
        let analysis = adapter
            .analyze(&upload("short.md", "text/markdown", "한 문장뿐.".as_bytes()))
            .await
            .unwrap();
        assert_eq!(analysis.key_points, vec!["한 문장뿐"]);
    }

    #[tokio::test(start_paused = true)]
    async fn spreadsheet_analysis_reports_figures() {
        let adapter = CannedSpreadsheetAnalysis::new(Duration::from_millis(1200));
        let analysis = adapter
            .analyze(&upload("q3.xlsx", "application/vnd.spreadsheet", b""))
            .await
            .unwrap();
        let figures = analysis.figures.expect("spreadsheet analysis carries figures");
        assert_eq!(figures.customer_count, 1847);
        assert_eq!(analysis.category, AnalysisCategory::Data);
    }
}
