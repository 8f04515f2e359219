//! Use cases - orchestration of ports to fulfill caller operations.

pub mod generate;
pub mod simulations;

pub use generate::{GenerateError, GenerateScenario, GenerationOutcome};
pub use simulations::{JoinedSimulation, LifecycleError, SimulationLifecycle};
