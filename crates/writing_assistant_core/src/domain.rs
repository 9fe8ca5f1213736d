//! crates/writing_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the drafting wizard.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The kinds of documents the wizard knows how to draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Presentation,
    Report,
    Retrospective,
    Greeting,
}

impl DocumentType {
    /// Parses the loosely-typed keys callers send. Unknown keys return `None`
    /// so the caller can decide between rejecting and falling back.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "presentation" => Some(Self::Presentation),
            "report" => Some(Self::Report),
            "retrospective" => Some(Self::Retrospective),
            "greeting" => Some(Self::Greeting),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presentation => "presentation",
            Self::Report => "report",
            Self::Retrospective => "retrospective",
            Self::Greeting => "greeting",
        }
    }
}

/// The expected talk length offered for presentation drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationChoice {
    ThreeMinutes,
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
}

impl DurationChoice {
    pub fn parse(minutes: u32) -> Option<Self> {
        match minutes {
            3 => Some(Self::ThreeMinutes),
            5 => Some(Self::FiveMinutes),
            10 => Some(Self::TenMinutes),
            15 => Some(Self::FifteenMinutes),
            _ => None,
        }
    }

    pub fn minutes(&self) -> u32 {
        match self {
            Self::ThreeMinutes => 3,
            Self::FiveMinutes => 5,
            Self::TenMinutes => 10,
            Self::FifteenMinutes => 15,
        }
    }
}

/// Everything the user has entered for the draft being built.
///
/// `document_type` keeps the raw key the caller supplied; template selection
/// tolerates unknown keys by falling back, so the raw value must survive
/// end to end.
#[derive(Debug, Clone, Default)]
pub struct DocumentRequest {
    pub document_type: String,
    pub purpose: String,
    pub audience: String,
    pub keywords: String,
    pub duration: Option<DurationChoice>,
    pub tone_preset: Option<String>,
    pub custom_tone: Option<String>,
    pub reference_files: Vec<ReferenceFile>,
}

impl DocumentRequest {
    /// Generation is only allowed once purpose, audience and keywords are all
    /// filled in.
    pub fn is_ready_for_generation(&self) -> bool {
        !self.purpose.trim().is_empty()
            && !self.audience.trim().is_empty()
            && !self.keywords.trim().is_empty()
    }
}

/// A raw uploaded file, before classification and analysis.
#[derive(Debug, Clone)]
pub struct ReferenceUpload {
    pub file_name: String,
    pub declared_media_type: String,
    pub bytes: Vec<u8>,
}

/// A user-uploaded artifact attached to the request, together with whatever
/// the analysis provider produced for it.
#[derive(Debug, Clone)]
pub struct ReferenceFile {
    pub id: Uuid,
    pub name: String,
    pub declared_media_type: String,
    pub size_bytes: u64,
    pub extracted_text: Option<String>,
    pub analysis: Option<FileAnalysis>,
    /// Set when the analysis provider failed; the batch continues regardless.
    pub analysis_error: Option<String>,
    pub preview_url: Option<String>,
}

/// The classification buckets uploads are sorted into. Each bucket maps to
/// one analysis provider; anything else receives no analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Pdf,
    Spreadsheet,
    Text,
}

impl FileCategory {
    /// Classifies by declared media type first, filename suffix second.
    pub fn classify(declared_media_type: &str, file_name: &str) -> Option<Self> {
        let name = file_name.to_ascii_lowercase();
        if declared_media_type.starts_with("image/") {
            Some(Self::Image)
        } else if declared_media_type == "application/pdf" || name.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if declared_media_type.contains("spreadsheet")
            || name.ends_with(".xlsx")
            || name.ends_with(".csv")
        {
            Some(Self::Spreadsheet)
        } else if declared_media_type.starts_with("text/")
            || name.ends_with(".txt")
            || name.ends_with(".md")
        {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// What kind of content an analysis describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisCategory {
    Text,
    Image,
    Data,
    Chart,
}

impl AnalysisCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Data => "data",
            Self::Chart => "chart",
        }
    }
}

/// The outcome of analyzing a single reference file. Produced once and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    pub category: AnalysisCategory,
    pub summary: String,
    pub key_points: Vec<String>,
    pub insights: Vec<String>,
    pub figures: Option<SpreadsheetFigures>,
}

/// Headline numbers extracted from spreadsheet uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetFigures {
    pub total_revenue: String,
    pub growth_rate: String,
    pub customer_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formality {
    Formal,
    Casual,
    SemiFormal,
}

impl Formality {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "formal" => Some(Self::Formal),
            "casual" => Some(Self::Casual),
            "semi-formal" => Some(Self::SemiFormal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Casual => "casual",
            Self::SemiFormal => "semi-formal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Professional,
    Friendly,
    Authoritative,
    Humble,
}

impl Tone {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "professional" => Some(Self::Professional),
            "friendly" => Some(Self::Friendly),
            "authoritative" => Some(Self::Authoritative),
            "humble" => Some(Self::Humble),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Friendly => "friendly",
            Self::Authoritative => "authoritative",
            Self::Humble => "humble",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructurePreference {
    Detailed,
    Concise,
    Storytelling,
}

impl StructurePreference {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "detailed" => Some(Self::Detailed),
            "concise" => Some(Self::Concise),
            "storytelling" => Some(Self::Storytelling),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Concise => "concise",
            Self::Storytelling => "storytelling",
        }
    }
}

/// The (formality, tone, structure) triple that steers template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStyle {
    pub formality: Formality,
    pub tone: Tone,
    pub structure: StructurePreference,
}

impl Default for ToneStyle {
    /// The style applied when no preset is selected or the selected preset
    /// has been deleted.
    fn default() -> Self {
        Self {
            formality: Formality::SemiFormal,
            tone: Tone::Professional,
            structure: StructurePreference::Detailed,
        }
    }
}

/// A named, reusable tone the user can pick from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct TonePreset {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub example_text: String,
    pub style: ToneStyle,
}

/// Errors raised by [`ToneCatalog`] mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("a tone preset with id '{0}' already exists")]
    DuplicateId(String),
}

/// An insertion-ordered collection of tone presets. Insertion order is
/// display order.
#[derive(Debug, Clone)]
pub struct ToneCatalog {
    presets: Vec<TonePreset>,
}

impl ToneCatalog {
    pub fn add(&mut self, preset: TonePreset) -> Result<(), CatalogError> {
        if self.presets.iter().any(|p| p.id == preset.id) {
            return Err(CatalogError::DuplicateId(preset.id));
        }
        self.presets.push(preset);
        Ok(())
    }

    /// Removes the preset with the given id. Returns whether anything was
    /// removed; selections pointing at a removed preset degrade to the
    /// default style via [`ToneCatalog::resolve_style`].
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.id != id);
        self.presets.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&TonePreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Resolves a possibly-stale preset selection to a concrete style.
    pub fn resolve_style(&self, preset_id: Option<&str>) -> ToneStyle {
        preset_id
            .and_then(|id| self.get(id))
            .map(|p| p.style)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TonePreset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for ToneCatalog {
    /// Seeds the catalog with the three built-in presets every new wizard
    /// session starts with.
    fn default() -> Self {
        Self {
            presets: vec![
                TonePreset {
                    id: "corporate".to_string(),
                    display_name: "기업 공식".to_string(),
                    description: "정중하고 전문적인 기업 커뮤니케이션 톤".to_string(),
                    example_text: "안녕하세요. 저희 회사의 Q4 성과에 대해 보고드리겠습니다..."
                        .to_string(),
                    style: ToneStyle {
                        formality: Formality::Formal,
                        tone: Tone::Professional,
                        structure: StructurePreference::Detailed,
                    },
                },
                TonePreset {
                    id: "startup".to_string(),
                    display_name: "스타트업".to_string(),
                    description: "혁신적이고 친근한 스타트업 문화 톤".to_string(),
                    example_text: "안녕하세요! 이번 스프린트에서 정말 멋진 성과를 거뒀어요..."
                        .to_string(),
                    style: ToneStyle {
                        formality: Formality::Casual,
                        tone: Tone::Friendly,
                        structure: StructurePreference::Concise,
                    },
                },
                TonePreset {
                    id: "consulting".to_string(),
                    display_name: "컨설팅".to_string(),
                    description: "분석적이고 권위있는 컨설팅 톤".to_string(),
                    example_text:
                        "현재 시장 상황을 분석한 결과, 다음과 같은 전략적 접근이 필요합니다..."
                            .to_string(),
                    style: ToneStyle {
                        formality: Formality::Formal,
                        tone: Tone::Authoritative,
                        structure: StructurePreference::Detailed,
                    },
                },
            ],
        }
    }
}

/// The draft produced by one generation call. `content` stays editable;
/// title and structure are never recomputed after edits.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub title: String,
    pub structure: Vec<String>,
    pub content: String,
    pub estimated_duration: String,
    pub length_metric: u32,
    pub referenced_file_names: Vec<String>,
}

/// The rehearsal stopwatch state. Transient; reset whenever the wizard
/// restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub running: bool,
    pub current_section_index: usize,
    pub elapsed_seconds: u64,
    pub muted: bool,
    pub speed_multiplier: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            running: false,
            current_section_index: 0,
            elapsed_seconds: 0,
            muted: false,
            speed_multiplier: 1.0,
        }
    }
}

impl PlaybackState {
    /// Moves the section pointer, clamped to the structure bounds. Timing is
    /// unaffected.
    pub fn select_section(&mut self, index: usize, section_count: usize) -> usize {
        self.current_section_index = if section_count == 0 {
            0
        } else {
            index.min(section_count - 1)
        };
        self.current_section_index
    }

    /// Formats the elapsed time as `minutes:seconds`, seconds zero-padded.
    pub fn clock(&self) -> String {
        format!(
            "{}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }
}

/// A document the user chose to keep. Lives in the in-memory store for the
/// lifetime of the process only.
#[derive(Debug, Clone)]
pub struct SavedDocument {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub document_type: String,
    pub created_at: DateTime<Utc>,
    pub length_metric: u32,
    pub referenced_file_names: Vec<String>,
}
