//! Simulation - one live instance of a template handed to a trainee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ScenarioPayload, ScenarioTemplate, SimulationId, TemplateId};

/// One user-interaction event. Entries are append-only, never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInteraction {
    pub action: String,
    /// Opaque caller-supplied detail payload.
    #[serde(default)]
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

/// A live simulation tracking a trainee's interactions and outcome.
///
/// Carries a snapshot copy of the template payload taken at creation time, so
/// the record stays self-contained even if templates ever become editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: SimulationId,
    /// Non-owning reference to the paired template.
    pub template_id: TemplateId,
    pub payload: ScenarioPayload,
    #[serde(default)]
    pub interactions: Vec<UserInteraction>,
    pub phished: bool,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

impl Simulation {
    /// Create the simulation paired with a freshly generated template,
    /// snapshotting its payload.
    pub fn new(template: &ScenarioTemplate, now: DateTime<Utc>) -> Self {
        Self {
            id: SimulationId::new(),
            template_id: template.id,
            payload: template.payload.clone(),
            interactions: Vec::new(),
            phished: false,
            score: 0.0,
            created_at: now,
        }
    }

    /// Append one interaction event with a server-assigned timestamp.
    /// No deduplication: re-invocation appends a new entry.
    pub fn record_interaction(
        &mut self,
        action: impl Into<String>,
        details: Value,
        now: DateTime<Utc>,
    ) {
        self.interactions.push(UserInteraction {
            action: action.into(),
            details,
            timestamp: now,
        });
    }

    /// Partial status update: a field is applied only when the JSON value has
    /// the expected primitive type; wrong-typed fields are silently ignored
    /// rather than failing the whole call.
    pub fn apply_status(&mut self, phished: Option<&Value>, score: Option<&Value>) {
        if let Some(value) = phished.and_then(Value::as_bool) {
            self.phished = value;
        }
        if let Some(value) = score.and_then(Value::as_f64) {
            self.score = value;
        }
    }
}
