//! Local analysis: ONNX embeddings and NER, rule-based clause extraction,
//! semantic phrase matching, critical-point patterns, extractive summaries.

pub mod clauses;
pub mod entities;
pub mod memo;
pub mod model;
pub mod ner;
pub mod parser;
pub mod patterns;
pub mod semantic;
pub mod summarize;

#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
mod token_classifier;

#[cfg(feature = "onnx")]
pub use embedder::Embedder;
#[cfg(feature = "onnx")]
pub use token_classifier::OnnxNer;

pub use entities::EntityRecognizer;
pub use memo::CachedEmbedder;
pub use model::{EntityModel, EntitySpan, SentenceEmbedder};
pub use ner::PatternNer;
pub use parser::Parser;
pub use semantic::{PhraseCatalog, SemanticMatcher};
