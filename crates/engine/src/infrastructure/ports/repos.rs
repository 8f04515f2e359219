// Port traits define the full contract - some methods are for future use
#![allow(dead_code)]

//! Repository port traits for the document store.

use async_trait::async_trait;
use phishsim_domain::{ScenarioTemplate, Simulation, SimulationId, TemplateId};

use super::error::RepoError;

/// Durable storage for scenario templates.
///
/// Templates are written once per generation call and never mutated, so the
/// port has no update or delete operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TemplateRepo: Send + Sync {
    async fn get(&self, id: TemplateId) -> Result<Option<ScenarioTemplate>, RepoError>;

    /// Insert a new template. Fails with `ConstraintViolation` when another
    /// template already carries the same external generation id.
    async fn save(&self, template: &ScenarioTemplate) -> Result<(), RepoError>;
}

/// Durable storage for live simulations.
///
/// Simulations are never deleted; `save` upserts so lifecycle updates
/// (interaction appends, status changes) go through the same operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimulationRepo: Send + Sync {
    async fn get(&self, id: SimulationId) -> Result<Option<Simulation>, RepoError>;
    async fn save(&self, simulation: &Simulation) -> Result<(), RepoError>;
    async fn list_all(&self) -> Result<Vec<Simulation>, RepoError>;
}
