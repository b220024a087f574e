//! Analysis pipeline: provider registry, fallback orchestration, and the
//! process-wide shared orchestrator.

pub mod fallback;
pub mod local;
pub mod orchestrator;
pub mod provider;
pub mod registry;
pub mod remote;

pub use local::{LocalHybrid, LocalModels};
pub use orchestrator::{Orchestrator, load_shared, shared};
pub use provider::{AnalysisProvider, Capabilities, ProviderDescriptor, ProviderKind};
pub use registry::Registry;
