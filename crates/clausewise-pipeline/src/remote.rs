//! Remote LLM providers.

use std::time::Duration;

use async_trait::async_trait;

use clausewise_core::point::PROVIDER_CONFIDENCE;
use clausewise_core::{AnalysisError, CandidatePoint, Category, RemoteCredentials};
use clausewise_remote::{RemoteBackend, RemoteClient, RemoteError};

use crate::provider::{AnalysisProvider, Capabilities, ProviderDescriptor, ProviderKind};

pub struct RemoteLlmProvider {
    client: RemoteClient,
    descriptor: ProviderDescriptor,
}

impl RemoteLlmProvider {
    pub fn new(
        backend: RemoteBackend,
        credentials: &RemoteCredentials,
        timeout: Duration,
        priority: u32,
    ) -> Result<Self, AnalysisError> {
        let client = RemoteClient::new(backend, credentials, timeout).map_err(|e| to_analysis_error(backend, e))?;
        let descriptor = ProviderDescriptor {
            name: format!("{}:{}", backend.name(), client.model()),
            priority,
            capability: Capabilities::BOTH,
        };
        Ok(Self { client, descriptor })
    }
}

fn to_analysis_error(backend: RemoteBackend, err: RemoteError) -> AnalysisError {
    match err {
        RemoteError::Json(_) | RemoteError::EmptyResponse(_) => AnalysisError::invalid(backend.name(), err),
        _ => AnalysisError::unavailable(backend.name(), err),
    }
}

#[async_trait]
impl AnalysisProvider for RemoteLlmProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::RemoteLlm
    }

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError> {
        self.client
            .summarize(text)
            .await
            .map_err(|e| to_analysis_error(self.client.backend(), e))
    }

    async fn extract(&self, text: &str) -> Result<Vec<CandidatePoint>, AnalysisError> {
        let points = self
            .client
            .extract_points(text)
            .await
            .map_err(|e| to_analysis_error(self.client.backend(), e))?;
        // Generated text has no source offset.
        Ok(points
            .into_iter()
            .map(|p| CandidatePoint::new(p, Category::ProviderExtracted, PROVIDER_CONFIDENCE, 0))
            .collect())
    }
}
