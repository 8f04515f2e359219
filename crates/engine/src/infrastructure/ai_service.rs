//! HTTP client for the external scenario-generation service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use phishsim_domain::{
    MailPayload, MessagePayload, ScenarioDescriptor, ScenarioKind, ScenarioPayload,
};

use crate::infrastructure::ports::{GeneratedScenario, GeneratorError, GeneratorPort};

/// Default generation endpoint.
pub const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:5001/generate_phishing_scenario";

/// Default request timeout. Generation can be slow, so this is generous;
/// without it an unresponsive service would hold the request until the OS
/// network stack gives up.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Client for the generative service's JSON API.
#[derive(Clone)]
pub struct AiServiceClient {
    client: Client,
    url: String,
}

impl AiServiceClient {
    pub fn new(url: &str) -> Self {
        Self::with_timeout(url, DEFAULT_TIMEOUT_SECS)
    }

    /// Create client with custom timeout (for testing).
    pub fn with_timeout(url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Create client from the `AI_SERVICE_URL` environment variable,
    /// falling back to the default endpoint.
    pub fn from_env() -> Self {
        let url =
            std::env::var("AI_SERVICE_URL").unwrap_or_else(|_| DEFAULT_AI_SERVICE_URL.to_string());
        Self::new(&url)
    }
}

#[async_trait]
impl GeneratorPort for AiServiceClient {
    async fn request_scenario(
        &self,
        prompt: &str,
        kind: ScenarioKind,
    ) -> Result<GeneratedScenario, GeneratorError> {
        let request = GenerateScenarioRequest {
            user_prompt: prompt,
            scenario_type: kind.as_str(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let details = response
                .text()
                .await
                .map_err(|e| GeneratorError::Transport(e.to_string()))?;
            return Err(GeneratorError::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let body: GenerateScenarioResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))?;

        validate_response(body, kind)
    }
}

/// Check structural completeness for the requested kind: the scenario
/// descriptor and the matching payload field must both be present.
fn validate_response(
    body: GenerateScenarioResponse,
    kind: ScenarioKind,
) -> Result<GeneratedScenario, GeneratorError> {
    let descriptor = body.scenario.ok_or_else(|| {
        GeneratorError::MalformedResponse("response is missing the scenario descriptor".to_string())
    })?;

    let payload = match kind {
        ScenarioKind::Mail => body.email_details.map(ScenarioPayload::Mail).ok_or_else(|| {
            GeneratorError::MalformedResponse(
                "response is missing emailDetails for email generation".to_string(),
            )
        })?,
        ScenarioKind::Message => body.sms_details.map(ScenarioPayload::Message).ok_or_else(|| {
            GeneratorError::MalformedResponse(
                "response is missing smsDetails for sms generation".to_string(),
            )
        })?,
    };

    Ok(GeneratedScenario {
        descriptor,
        category: body.phishing_type,
        payload,
    })
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateScenarioRequest<'a> {
    user_prompt: &'a str,
    scenario_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateScenarioResponse {
    scenario: Option<ScenarioDescriptor>,
    phishing_type: Option<String>,
    email_details: Option<MailPayload>,
    sms_details: Option<MessagePayload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_response_json() -> &'static str {
        r#"{
            "scenario": {"id": "abc123", "description": "Software update lure", "goal": "credential harvesting"},
            "phishingType": "Urgency",
            "emailDetails": {
                "subject": "Update Required",
                "sender": "it@corp.com",
                "recipient": "user@corp.com",
                "body": "Please update now.",
                "links": [{"text": "Update now", "url": "http://evil.example", "isPhishing": true}],
                "attachments": []
            }
        }"#
    }

    #[test]
    fn validates_email_response_for_email_kind() {
        let body: GenerateScenarioResponse =
            serde_json::from_str(email_response_json()).expect("parse");
        let generated = validate_response(body, ScenarioKind::Mail).expect("valid");

        assert_eq!(generated.descriptor.id, "abc123");
        assert_eq!(generated.category.as_deref(), Some("Urgency"));
        let mail = generated.payload.as_mail().expect("mail payload");
        assert_eq!(mail.subject, "Update Required");
        assert!(mail.links[0].is_phishing);
    }

    #[test]
    fn email_response_is_malformed_for_sms_kind() {
        let body: GenerateScenarioResponse =
            serde_json::from_str(email_response_json()).expect("parse");
        let err = validate_response(body, ScenarioKind::Message).expect_err("mismatched kind");
        assert!(matches!(err, GeneratorError::MalformedResponse(_)));
    }

    #[test]
    fn missing_descriptor_is_malformed() {
        let body: GenerateScenarioResponse = serde_json::from_str(
            r#"{"phishingType": "Urgency", "emailDetails": {
                "subject": "s", "sender": "a", "recipient": "b", "body": "c"
            }}"#,
        )
        .expect("parse");
        let err = validate_response(body, ScenarioKind::Mail).expect_err("no descriptor");
        assert!(matches!(err, GeneratorError::MalformedResponse(_)));
    }

    #[test]
    fn sms_response_parses_with_defaulted_links() {
        let body: GenerateScenarioResponse = serde_json::from_str(
            r#"{
                "scenario": {"id": "sms1", "description": "Package scam"},
                "smsDetails": {
                    "senderPhone": "88976",
                    "recipientPhone": "+1-555-123-4567",
                    "message": "Your package is held"
                }
            }"#,
        )
        .expect("parse");
        let generated = validate_response(body, ScenarioKind::Message).expect("valid");

        assert_eq!(generated.category, None);
        let sms = generated.payload.as_message().expect("sms payload");
        assert_eq!(sms.sender_phone, "88976");
        assert!(sms.links.is_empty());
    }
}
