//! HTTP routes.

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use phishsim_domain::{
    MailPayload, MessagePayload, ScenarioDescriptor, ScenarioPayload, ScenarioTemplate,
    Simulation, SimulationId, TemplateId, UserInteraction,
};

use crate::app::App;
use crate::infrastructure::ports::GeneratorError;
use crate::use_cases::{GenerateError, JoinedSimulation, LifecycleError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/generate", post(generate))
        .route("/api/simulations", get(list_simulations))
        .route("/api/simulations/{id}", get(get_simulation))
        .route("/api/simulations/{id}/interact", post(record_interaction))
        .route("/api/simulations/{id}/update-status", patch(update_status))
}

async fn root() -> &'static str {
    "Phishing Simulator Backend is running!"
}

async fn health() -> &'static str {
    "OK"
}

async fn generate(
    State(app): State<Arc<App>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let outcome = app
        .use_cases
        .generate
        .execute(
            request.prompt.as_deref().unwrap_or_default(),
            request.kind.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(GenerateResponse::from_outcome(
        outcome.template,
        outcome.simulation.id,
    )))
}

async fn list_simulations(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<SimulationDto>>, ApiError> {
    let simulations = app.use_cases.simulations.list().await?;
    Ok(Json(
        simulations.into_iter().map(SimulationDto::joined).collect(),
    ))
}

async fn get_simulation(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SimulationDto>, ApiError> {
    let joined = app
        .use_cases
        .simulations
        .get(SimulationId::from_uuid(id))
        .await?;
    Ok(Json(SimulationDto::joined(joined)))
}

async fn record_interaction(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<InteractRequest>,
) -> Result<Json<SimulationActionResponse>, ApiError> {
    let simulation = app
        .use_cases
        .simulations
        .record_interaction(
            SimulationId::from_uuid(id),
            request.action.as_deref().unwrap_or_default(),
            request.details,
        )
        .await?;

    Ok(Json(SimulationActionResponse {
        message: "Interaction recorded successfully",
        simulation: SimulationDto::unjoined(simulation),
    }))
}

async fn update_status(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<SimulationActionResponse>, ApiError> {
    let simulation = app
        .use_cases
        .simulations
        .update_status(SimulationId::from_uuid(id), request.phished, request.score)
        .await?;

    Ok(Json(SimulationActionResponse {
        message: "Simulation status updated",
        simulation: SimulationDto::unjoined(simulation),
    }))
}

// =============================================================================
// Request/response DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    prompt: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    message: &'static str,
    scenario: ScenarioDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_details: Option<MailPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sms_details: Option<MessagePayload>,
    phishing_type: String,
    prompt_id: TemplateId,
    simulation_id: SimulationId,
}

impl GenerateResponse {
    fn from_outcome(template: ScenarioTemplate, simulation_id: SimulationId) -> Self {
        let scenario = ScenarioDescriptor {
            id: template.external_generation_id,
            description: template.description,
            goal: template.goal,
        };
        let (email_details, sms_details) = split_payload(template.payload);

        Self {
            message: "Phishing scenario generated successfully!",
            scenario,
            email_details,
            sms_details,
            phishing_type: template.category,
            prompt_id: template.id,
            simulation_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InteractRequest {
    action: Option<String>,
    details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    phished: Option<Value>,
    score: Option<Value>,
}

#[derive(Debug, Serialize)]
struct SimulationActionResponse {
    message: &'static str,
    simulation: SimulationDto,
}

/// Wire view of a simulation. `prompt_id` carries either the bare template
/// reference or, for read-side joins, the full template content.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationDto {
    id: SimulationId,
    prompt_id: PromptRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_email: Option<MailPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_sms: Option<MessagePayload>,
    user_interactions: Vec<UserInteraction>,
    phished: bool,
    score: f64,
    created_at: DateTime<Utc>,
}

impl SimulationDto {
    fn joined(joined: JoinedSimulation) -> Self {
        let prompt_ref = match joined.template {
            Some(template) => PromptRef::Joined(Box::new(TemplateDto::from(template))),
            None => PromptRef::Id(joined.simulation.template_id),
        };
        Self::build(joined.simulation, prompt_ref)
    }

    fn unjoined(simulation: Simulation) -> Self {
        let prompt_ref = PromptRef::Id(simulation.template_id);
        Self::build(simulation, prompt_ref)
    }

    fn build(simulation: Simulation, prompt_id: PromptRef) -> Self {
        let (generated_email, generated_sms) = split_payload(simulation.payload);
        Self {
            id: simulation.id,
            prompt_id,
            generated_email,
            generated_sms,
            user_interactions: simulation.interactions,
            phished: simulation.phished,
            score: simulation.score,
            created_at: simulation.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PromptRef {
    Id(TemplateId),
    Joined(Box<TemplateDto>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDto {
    id: TemplateId,
    scenario: String,
    #[serde(rename = "type")]
    kind: &'static str,
    ai_generated_id: String,
    phishing_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_details: Option<MailPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sms_details: Option<MessagePayload>,
    created_at: DateTime<Utc>,
}

impl From<ScenarioTemplate> for TemplateDto {
    fn from(template: ScenarioTemplate) -> Self {
        let kind = template.kind().as_str();
        let (email_details, sms_details) = split_payload(template.payload);
        Self {
            id: template.id,
            scenario: template.description,
            kind,
            ai_generated_id: template.external_generation_id,
            phishing_type: template.category,
            goal: template.goal,
            email_details,
            sms_details,
            created_at: template.created_at,
        }
    }
}

fn split_payload(payload: ScenarioPayload) -> (Option<MailPayload>, Option<MessagePayload>) {
    match payload {
        ScenarioPayload::Mail(mail) => (Some(mail), None),
        ScenarioPayload::Message(sms) => (None, Some(sms)),
    }
}

// =============================================================================
// Error mapping
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Generative-service failure; forwarded diagnostics in `details`.
    ServiceFailure {
        error: String,
        details: Option<Value>,
    },
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "message": message })),
            )
                .into_response(),
            ApiError::ServiceFailure { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": error, "details": details })),
            )
                .into_response(),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::InvalidInput(message) => ApiError::BadRequest(message),
            GenerateError::Generator(GeneratorError::Transport(message)) => {
                ApiError::ServiceFailure {
                    error: format!("No response from the AI service: {message}"),
                    details: None,
                }
            }
            GenerateError::Generator(GeneratorError::Upstream { status, details }) => {
                // Forward the upstream body verbatim, parsed when it is JSON.
                let details = serde_json::from_str(&details)
                    .unwrap_or(Value::String(details));
                ApiError::ServiceFailure {
                    error: format!("Error from the AI service (status {status})"),
                    details: Some(details),
                }
            }
            GenerateError::Generator(GeneratorError::MalformedResponse(message)) => {
                ApiError::ServiceFailure {
                    error: message,
                    details: None,
                }
            }
            GenerateError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::NotFound { .. } => {
                ApiError::NotFound("Simulation not found".to_string())
            }
            LifecycleError::InvalidInput(message) => ApiError::BadRequest(message),
            LifecycleError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use phishsim_domain::{ScenarioDescriptor, ScenarioLink};

    fn test_template() -> ScenarioTemplate {
        ScenarioTemplate::new(
            ScenarioDescriptor {
                id: "abc123".to_string(),
                description: "Software update lure".to_string(),
                goal: None,
            },
            Some("Urgency".to_string()),
            ScenarioPayload::Mail(MailPayload {
                sender: "it@corp.com".to_string(),
                recipient: "user@corp.com".to_string(),
                subject: "Update Required".to_string(),
                body: "Please update now.".to_string(),
                links: vec![ScenarioLink {
                    text: "Update now".to_string(),
                    url: "http://evil.example".to_string(),
                    is_phishing: true,
                }],
                attachments: vec![],
            }),
            Utc::now(),
        )
    }

    #[test]
    fn generate_response_carries_scenario_and_kind_specific_details() {
        let template = test_template();
        let simulation_id = SimulationId::new();
        let response = GenerateResponse::from_outcome(template, simulation_id);
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(json["scenario"]["id"], "abc123");
        assert_eq!(json["phishingType"], "Urgency");
        assert_eq!(json["emailDetails"]["subject"], "Update Required");
        assert!(json.get("smsDetails").is_none());
        assert_eq!(json["simulationId"], simulation_id.to_string());
    }

    #[test]
    fn joined_simulation_embeds_full_template_content() {
        let template = test_template();
        let simulation = Simulation::new(&template, Utc::now());
        let dto = SimulationDto::joined(JoinedSimulation {
            simulation,
            template: Some(template),
        });
        let json = serde_json::to_value(&dto).expect("serialize");

        assert_eq!(json["promptId"]["aiGeneratedId"], "abc123");
        assert_eq!(json["promptId"]["type"], "email");
        assert_eq!(json["generatedEmail"]["links"][0]["isPhishing"], true);
        assert!(json.get("generatedSms").is_none());
        assert_eq!(json["phished"], false);
    }

    #[test]
    fn unjoined_simulation_keeps_the_bare_template_reference() {
        let template = test_template();
        let simulation = Simulation::new(&template, Utc::now());
        let template_id = template.id;
        let dto = SimulationDto::unjoined(simulation);
        let json = serde_json::to_value(&dto).expect("serialize");

        assert_eq!(json["promptId"], template_id.to_string());
    }

    #[test]
    fn upstream_error_forwards_json_details() {
        let api_error: ApiError = GenerateError::Generator(GeneratorError::Upstream {
            status: 503,
            details: r#"{"error": "model overloaded"}"#.to_string(),
        })
        .into();

        match api_error {
            ApiError::ServiceFailure { error, details } => {
                assert!(error.contains("503"));
                let details = details.expect("details forwarded");
                assert_eq!(details["error"], "model overloaded");
            }
            other => panic!("expected ServiceFailure, got {other:?}"),
        }
    }
}
