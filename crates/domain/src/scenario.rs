//! Scenario template - the persisted result of one generation call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TemplateId;

/// Category label used when the generative service omits `phishingType`.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Which delivery channel a scenario targets.
///
/// The wire names match the external service contract ("email" / "sms").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    #[serde(rename = "email")]
    Mail,
    #[serde(rename = "sms")]
    Message,
}

impl ScenarioKind {
    /// Parse a caller-supplied kind string. Only "email" and "sms" are valid.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "email" => Some(Self::Mail),
            "sms" => Some(Self::Message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mail => "email",
            Self::Message => "sms",
        }
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hyperlink embedded in generated content. Order is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioLink {
    pub text: String,
    pub url: String,
    pub is_phishing: bool,
}

/// Mail-style scenario content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailPayload {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub links: Vec<ScenarioLink>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Message-style (SMS) scenario content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub sender_phone: String,
    pub recipient_phone: String,
    pub message: String,
    #[serde(default)]
    pub links: Vec<ScenarioLink>,
}

/// The bifurcated scenario content.
///
/// Exactly one variant exists per record, and the kind is derived from the
/// variant rather than stored alongside it, so a mismatched kind/payload
/// combination is unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScenarioPayload {
    #[serde(rename = "email")]
    Mail(MailPayload),
    #[serde(rename = "sms")]
    Message(MessagePayload),
}

impl ScenarioPayload {
    pub fn kind(&self) -> ScenarioKind {
        match self {
            Self::Mail(_) => ScenarioKind::Mail,
            Self::Message(_) => ScenarioKind::Message,
        }
    }

    pub fn as_mail(&self) -> Option<&MailPayload> {
        match self {
            Self::Mail(payload) => Some(payload),
            Self::Message(_) => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessagePayload> {
        match self {
            Self::Message(payload) => Some(payload),
            Self::Mail(_) => None,
        }
    }
}

/// Scenario descriptor returned by the generative service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    /// Identifier assigned by the generative service.
    pub id: String,
    pub description: String,
    /// The attacker's objective, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// Persisted result of one generation call, the reusable scenario template.
///
/// Immutable after creation. `external_generation_id` is unique across all
/// templates (enforced by the store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTemplate {
    pub id: TemplateId,
    /// Free-text description of the scenario.
    pub description: String,
    /// Identifier the generative service assigned to this scenario.
    pub external_generation_id: String,
    /// Classification label, e.g. "Urgency" or "Impersonation".
    pub category: String,
    /// The attacker's objective, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub payload: ScenarioPayload,
    pub created_at: DateTime<Utc>,
}

impl ScenarioTemplate {
    pub fn new(
        descriptor: ScenarioDescriptor,
        category: Option<String>,
        payload: ScenarioPayload,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TemplateId::new(),
            description: descriptor.description,
            external_generation_id: descriptor.id,
            category: category.unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            goal: descriptor.goal,
            payload,
            created_at: now,
        }
    }

    pub fn kind(&self) -> ScenarioKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_payload() -> ScenarioPayload {
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
        })
    }

    #[test]
    fn kind_is_derived_from_payload_variant() {
        assert_eq!(mail_payload().kind(), ScenarioKind::Mail);

        let sms = ScenarioPayload::Message(MessagePayload {
            sender_phone: "88976".to_string(),
            recipient_phone: "+1-555-123-4567".to_string(),
            message: "Your package is waiting".to_string(),
            links: vec![],
        });
        assert_eq!(sms.kind(), ScenarioKind::Message);
    }

    #[test]
    fn parse_accepts_only_the_two_wire_kinds() {
        assert_eq!(ScenarioKind::parse("email"), Some(ScenarioKind::Mail));
        assert_eq!(ScenarioKind::parse("sms"), Some(ScenarioKind::Message));
        assert_eq!(ScenarioKind::parse("letter"), None);
        assert_eq!(ScenarioKind::parse(""), None);
    }

    #[test]
    fn category_defaults_to_unknown_when_service_omits_it() {
        let descriptor = ScenarioDescriptor {
            id: "abc123".to_string(),
            description: "A software update lure".to_string(),
            goal: None,
        };
        let template = ScenarioTemplate::new(descriptor, None, mail_payload(), Utc::now());
        assert_eq!(template.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn payload_serializes_with_kind_discriminant() {
        let json = serde_json::to_value(mail_payload()).expect("serialize");
        assert_eq!(json["type"], "email");
        assert_eq!(json["subject"], "Update Required");
        assert_eq!(json["links"][0]["isPhishing"], true);

        let back: ScenarioPayload = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, mail_payload());
    }
}
