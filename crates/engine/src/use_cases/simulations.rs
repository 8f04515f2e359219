//! Simulation lifecycle operations: read, interaction append, status update.

use std::sync::Arc;

use serde_json::Value;

use phishsim_domain::{ScenarioTemplate, Simulation, SimulationId};

use crate::infrastructure::ports::{ClockPort, RepoError, SimulationRepo, TemplateRepo};

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl LifecycleError {
    fn simulation_not_found(id: SimulationId) -> Self {
        Self::NotFound {
            entity_type: "Simulation",
            id: id.to_string(),
        }
    }
}

/// A simulation annotated with its paired template's content (read-side join).
#[derive(Debug, Clone)]
pub struct JoinedSimulation {
    pub simulation: Simulation,
    /// None only if the referenced template row is missing from the store.
    pub template: Option<ScenarioTemplate>,
}

/// Operations over existing simulation records.
///
/// A record is never closed: interactions keep appending and status updates
/// keep applying for as long as the record exists.
pub struct SimulationLifecycle {
    simulations: Arc<dyn SimulationRepo>,
    templates: Arc<dyn TemplateRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SimulationLifecycle {
    pub fn new(
        simulations: Arc<dyn SimulationRepo>,
        templates: Arc<dyn TemplateRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            simulations,
            templates,
            clock,
        }
    }

    /// All simulations, each joined with its template.
    pub async fn list(&self) -> Result<Vec<JoinedSimulation>, LifecycleError> {
        let simulations = self.simulations.list_all().await?;

        let mut joined = Vec::with_capacity(simulations.len());
        for simulation in simulations {
            let template = self.join_template(&simulation).await?;
            joined.push(JoinedSimulation {
                simulation,
                template,
            });
        }
        Ok(joined)
    }

    pub async fn get(&self, id: SimulationId) -> Result<JoinedSimulation, LifecycleError> {
        let simulation = self
            .simulations
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::simulation_not_found(id))?;
        let template = self.join_template(&simulation).await?;
        Ok(JoinedSimulation {
            simulation,
            template,
        })
    }

    /// Append one interaction event with a server-assigned timestamp.
    pub async fn record_interaction(
        &self,
        id: SimulationId,
        action: &str,
        details: Option<Value>,
    ) -> Result<Simulation, LifecycleError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(LifecycleError::InvalidInput("Action is required".to_string()));
        }

        let mut simulation = self
            .simulations
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::simulation_not_found(id))?;

        simulation.record_interaction(action, details.unwrap_or(Value::Null), self.clock.now());
        self.simulations.save(&simulation).await?;

        tracing::debug!(
            simulation_id = %id,
            action = %action,
            interactions = simulation.interactions.len(),
            "interaction recorded"
        );
        Ok(simulation)
    }

    /// Partial status update; wrong-typed fields are silently skipped.
    pub async fn update_status(
        &self,
        id: SimulationId,
        phished: Option<Value>,
        score: Option<Value>,
    ) -> Result<Simulation, LifecycleError> {
        let mut simulation = self
            .simulations
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::simulation_not_found(id))?;

        simulation.apply_status(phished.as_ref(), score.as_ref());
        self.simulations.save(&simulation).await?;

        Ok(simulation)
    }

    async fn join_template(
        &self,
        simulation: &Simulation,
    ) -> Result<Option<ScenarioTemplate>, LifecycleError> {
        let template = self.templates.get(simulation.template_id).await?;
        if template.is_none() {
            tracing::warn!(
                simulation_id = %simulation.id,
                template_id = %simulation.template_id,
                "simulation references a missing template"
            );
        }
        Ok(template)
    }
}
