pub mod analysis;
pub mod catalog;
pub mod config;
pub mod enhance;
pub mod error;
pub mod point;
pub mod rank;
pub mod schema;
pub mod text;

pub use analysis::{AnalysisMetadata, AnalysisResult, Mode};
pub use catalog::{PatternCatalog, PatternCatalogEntry};
pub use config::{AnalyzerConfig, RemoteCredentials};
pub use enhance::enhance_summary;
pub use error::AnalysisError;
pub use point::{CandidatePoint, Category};
pub use rank::rank_candidates;
pub use text::Sentence;
