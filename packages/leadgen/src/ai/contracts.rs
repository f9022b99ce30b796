//! Typed JSON contracts for completion-service responses.
//!
//! Every contract has a deterministic fallback of the same shape; a
//! malformed response degrades to the fallback instead of an error.

use serde::{Deserialize, Serialize};

/// Company analysis: what they do, where it hurts, what to pitch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyAnalysis {
    pub summary: String,
    pub pain_points: Vec<String>,
    pub suggested_services: Vec<String>,
    pub proposal_points: Vec<String>,
    pub outreach_angle: String,
}

impl CompanyAnalysis {
    /// Generic-but-plausible default, with the raw response preserved as
    /// the summary so a non-JSON answer is not lost entirely.
    pub fn fallback(raw_response: String) -> Self {
        Self {
            summary: raw_response,
            pain_points: vec![
                "Scaling operations cost-effectively".to_string(),
                "Managing customer support".to_string(),
                "Content creation at scale".to_string(),
            ],
            suggested_services: vec![
                "Customer Support & Ticket Management".to_string(),
                "Social Media Management".to_string(),
                "Content Generation & Management".to_string(),
            ],
            proposal_points: vec![
                "Reduce operational costs by 60-70%".to_string(),
                "Scale support team without hiring overhead".to_string(),
                "Focus on core business while we handle operations".to_string(),
            ],
            outreach_angle:
                "Help them scale their operations efficiently with dedicated offshore resources."
                    .to_string(),
        }
    }
}

/// Lead analysis: profile plus concrete sales guidance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadAnalysis {
    pub summary: String,
    pub recommended_approach: String,
    pub talking_points: Vec<String>,
    pub objection_handling: Vec<String>,
    pub next_steps: Vec<String>,
}

impl LeadAnalysis {
    pub fn fallback(first_name: &str, last_name: &str, company_name: &str) -> Self {
        Self {
            summary: format!(
                "{} {} at {} - potential prospect for our services.",
                first_name, last_name, company_name
            ),
            recommended_approach:
                "Reach out with a personalized message highlighting cost savings and scalability."
                    .to_string(),
            talking_points: vec![
                "Cost savings of 60-70% compared to local hiring".to_string(),
                "Skilled, dedicated team members".to_string(),
                "Quick ramp-up time (1-2 weeks)".to_string(),
            ],
            objection_handling: vec![
                "Quality concerns: Our teams are trained and monitored for quality".to_string(),
                "Communication: We work in overlapping hours and use async tools".to_string(),
            ],
            next_steps: vec![
                "Send personalized outreach email".to_string(),
                "Connect on LinkedIn".to_string(),
                "Schedule discovery call".to_string(),
            ],
        }
    }

    /// The JSON blob stored on the lead's `aiRecommendedApproach` field.
    pub fn approach_json(&self) -> String {
        serde_json::json!({
            "approach": self.recommended_approach,
            "talkingPoints": self.talking_points,
            "objectionHandling": self.objection_handling,
            "nextSteps": self.next_steps,
        })
        .to_string()
    }
}

/// One person discovered during the contact search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveredContact {
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
}

/// Contact extraction result: decision makers plus outreach guidance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactReport {
    pub ceo: Option<String>,
    pub ceo_email: Option<String>,
    pub ceo_linkedin: Option<String>,
    pub contacts: Vec<DiscoveredContact>,
    pub company_insights: Option<String>,
    pub recommended_approach: Option<String>,
    pub talking_points: Vec<String>,
}

impl ContactReport {
    /// Empty-but-valid report, with any pattern-extracted CEO name kept.
    pub fn fallback(ceo: Option<String>) -> Self {
        Self {
            ceo,
            recommended_approach: Some(
                "Reach out through the company's public contact channels.".to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Full catalog details attached to a ranked suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDetails {
    pub name: String,
    pub description: String,
}

/// One ranked entry of the service catalog for a company.
///
/// The model returns `service`/`relevance`/`reason`; the orchestrator
/// attaches the catalog details afterwards, `None` when the model
/// invents a key outside the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceSuggestion {
    pub service: String,
    pub relevance: u8,
    pub reason: String,
    pub service_details: Option<ServiceDetails>,
}

impl ServiceSuggestion {
    /// Generic ranking used when the model's answer is unusable.
    pub fn fallback_set() -> Vec<Self> {
        vec![
            Self {
                service: "customerSupport".to_string(),
                relevance: 8,
                reason: "Most startups need scalable support".to_string(),
                service_details: None,
            },
            Self {
                service: "socialMedia".to_string(),
                relevance: 7,
                reason: "Growing brand presence is crucial".to_string(),
                service_details: None,
            },
            Self {
                service: "contentManagement".to_string(),
                relevance: 7,
                reason: "Content helps with growth".to_string(),
                service_details: None,
            },
        ]
    }
}

/// Structured profile extracted from a company's website text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub description: String,
    pub industry: String,
    pub services: Vec<String>,
    pub target_market: String,
    pub company_size: String,
    pub relevant_services: Vec<String>,
}

impl CompanyProfile {
    pub fn fallback() -> Self {
        Self {
            description: "Unable to analyze company at this time.".to_string(),
            industry: "Unknown".to_string(),
            services: Vec::new(),
            target_market: "Unknown".to_string(),
            company_size: "Unknown".to_string(),
            relevant_services: vec![
                "Customer Support & Ticket Management".to_string(),
                "Social Media Management".to_string(),
            ],
        }
    }
}

/// Generated outreach email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    pub fn fallback(company_name: &str, contact_name: &str, suggested_services: &[String]) -> Self {
        let services = if suggested_services.is_empty() {
            "customer support and social media management".to_string()
        } else {
            suggested_services
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(" and ")
        };
        Self {
            subject: format!("Partnership opportunity for {}", company_name),
            body: format!(
                "<p>Hi {contact},</p>\n\
                 <p>I came across {company} and was impressed by what you're building.</p>\n\
                 <p>At Outrinsic, we help Scandinavian startups scale their operations \
                 cost-effectively with our talented teams in India and Indonesia.</p>\n\
                 <p>We specialize in: {services}.</p>\n\
                 <p>Would you be open to a quick 15-minute call to explore if we could help \
                 {company}?</p>\n\
                 <p>Best regards,<br/>Outrinsic Team</p>",
                contact = contact_name,
                company = company_name,
                services = services,
            ),
        }
    }
}
