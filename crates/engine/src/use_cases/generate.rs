//! Scenario generation orchestration.
//!
//! Validates caller input, calls the generative service, and persists the
//! template record followed by its paired simulation record.

use std::sync::Arc;

use phishsim_domain::{ScenarioKind, ScenarioTemplate, Simulation};

use crate::infrastructure::ports::{
    ClockPort, GeneratorError, GeneratorPort, RepoError, SimulationRepo, TemplateRepo,
};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Both records created by one successful generation call.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub template: ScenarioTemplate,
    pub simulation: Simulation,
}

/// The single entry point for scenario generation.
pub struct GenerateScenario {
    generator: Arc<dyn GeneratorPort>,
    templates: Arc<dyn TemplateRepo>,
    simulations: Arc<dyn SimulationRepo>,
    clock: Arc<dyn ClockPort>,
}

impl GenerateScenario {
    pub fn new(
        generator: Arc<dyn GeneratorPort>,
        templates: Arc<dyn TemplateRepo>,
        simulations: Arc<dyn SimulationRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            generator,
            templates,
            simulations,
            clock,
        }
    }

    /// Generate a scenario and persist the template + simulation pair.
    ///
    /// Input rejections happen before any outbound call or write. The
    /// template write happens-before the simulation write; a simulation-save
    /// failure after the template committed leaves an orphaned template,
    /// which is logged and surfaced but not rolled back.
    pub async fn execute(
        &self,
        prompt: &str,
        kind_raw: &str,
    ) -> Result<GenerationOutcome, GenerateError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::InvalidInput("Prompt is required".to_string()));
        }
        let kind = ScenarioKind::parse(kind_raw).ok_or_else(|| {
            GenerateError::InvalidInput(
                "Invalid generation type. Must be \"email\" or \"sms\"".to_string(),
            )
        })?;

        let generated = self.generator.request_scenario(prompt, kind).await?;

        let now = self.clock.now();
        let template =
            ScenarioTemplate::new(generated.descriptor, generated.category, generated.payload, now);
        self.templates.save(&template).await?;

        let simulation = Simulation::new(&template, now);
        if let Err(e) = self.simulations.save(&simulation).await {
            tracing::warn!(
                template_id = %template.id,
                error = %e,
                "simulation save failed after template commit, orphaned template remains"
            );
            return Err(e.into());
        }

        tracing::info!(
            template_id = %template.id,
            simulation_id = %simulation.id,
            kind = %kind,
            category = %template.category,
            "generated scenario persisted"
        );

        Ok(GenerationOutcome {
            template,
            simulation,
        })
    }
}
