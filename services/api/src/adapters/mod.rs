pub mod analysis;
pub mod generation;
pub mod share;
pub mod store;

pub use analysis::{
    CannedImageAnalysis, CannedPdfAnalysis, CannedSpreadsheetAnalysis, HeuristicTextAnalysis,
};
pub use generation::TemplateDraftGenerator;
pub use share::{SystemClipboardAdapter, SystemShareAdapter};
pub use store::InMemoryDocumentStore;
