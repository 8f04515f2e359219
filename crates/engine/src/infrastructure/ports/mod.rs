//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Database access (could swap SQLite -> Mongo/Postgres)
//! - The external generative service (could swap backends)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::{GeneratorError, RepoError};
pub use external::{GeneratedScenario, GeneratorPort};
pub use repos::{SimulationRepo, TemplateRepo};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockGeneratorPort;
#[cfg(test)]
pub use repos::{MockSimulationRepo, MockTemplateRepo};
#[cfg(test)]
pub use testing::MockClockPort;
