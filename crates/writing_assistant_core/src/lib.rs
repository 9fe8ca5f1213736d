pub mod domain;
pub mod ports;

pub use domain::{
    AnalysisCategory, CatalogError, DocumentRequest, DocumentType, DurationChoice, FileAnalysis,
    FileCategory, Formality, GeneratedDocument, PlaybackState, ReferenceFile, ReferenceUpload,
    SavedDocument, SpreadsheetFigures, StructurePreference, Tone, ToneCatalog, TonePreset,
    ToneStyle,
};
pub use ports::{
    ClipboardService, DocumentStore, DraftGenerationService, FileAnalysisService, PortError,
    PortResult, ShareService,
};
