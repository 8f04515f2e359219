//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, GeneratorPort, SimulationRepo, TemplateRepo};
use crate::use_cases::{GenerateScenario, SimulationLifecycle};

/// Main application state.
///
/// Holds the use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub generate: GenerateScenario,
    pub simulations: SimulationLifecycle,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        generator: Arc<dyn GeneratorPort>,
        templates: Arc<dyn TemplateRepo>,
        simulations: Arc<dyn SimulationRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let generate = GenerateScenario::new(
            generator,
            templates.clone(),
            simulations.clone(),
            clock.clone(),
        );
        let lifecycle = SimulationLifecycle::new(simulations, templates, clock);

        Self {
            use_cases: UseCases {
                generate,
                simulations: lifecycle,
            },
        }
    }
}
