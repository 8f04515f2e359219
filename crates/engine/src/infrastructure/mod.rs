//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod ai_service;
pub mod clock;
pub mod ports;
pub mod sqlite;
