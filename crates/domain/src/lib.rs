//! PhishSim domain types.
//!
//! Pure data model for the scenario-generation tool: typed IDs, the
//! bifurcated scenario payload, the scenario template, and the live
//! simulation a trainee interacts with. No I/O lives here.

pub mod ids;
pub mod scenario;
pub mod simulation;

pub use ids::{SimulationId, TemplateId};
pub use scenario::{
    MailPayload, MessagePayload, ScenarioDescriptor, ScenarioKind, ScenarioLink, ScenarioPayload,
    ScenarioTemplate, UNKNOWN_CATEGORY,
};
pub use simulation::{Simulation, UserInteraction};
