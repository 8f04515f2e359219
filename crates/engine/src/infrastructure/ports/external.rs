//! External generative-service port.

use async_trait::async_trait;
use phishsim_domain::{ScenarioDescriptor, ScenarioKind, ScenarioPayload};

use super::error::GeneratorError;

/// A validated scenario returned by the generative service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedScenario {
    pub descriptor: ScenarioDescriptor,
    /// The `phishingType` label, absent when the service omitted it.
    pub category: Option<String>,
    /// Payload matching the requested kind, validated by the client.
    pub payload: ScenarioPayload,
}

/// Capability interface over the external generative service.
///
/// Pure request/validate: implementations perform no persistence and no
/// retries. Substitutable in tests with a deterministic stub.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeneratorPort: Send + Sync {
    async fn request_scenario(
        &self,
        prompt: &str,
        kind: ScenarioKind,
    ) -> Result<GeneratedScenario, GeneratorError>;
}
