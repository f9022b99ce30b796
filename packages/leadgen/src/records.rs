//! Domain records: candidates, companies, leads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ephemeral, in-memory output of the detail harvester.
///
/// Has no identity until the dedup gate persists it as a [`Company`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl CandidateRecord {
    /// Minimal record carrying only a URL-derived name.
    ///
    /// Returned when a detail page is unreachable so one dead link
    /// never aborts the whole pipeline.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A persisted company row.
///
/// Uniqueness is soft: enforced by the dedup gate via name or
/// source-URL lookup, not by a store constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub source_url: Option<String>,
    pub scraped_at: Option<DateTime<Utc>>,
    /// Opaque JSON blob used to stash AI-analysis results.
    pub raw_data: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Build a company row from a harvested candidate.
    pub fn from_candidate(candidate: CandidateRecord, source_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: candidate.name,
            description: candidate.description,
            email: candidate.email,
            phone: candidate.phone,
            website: candidate.website,
            industry: candidate.industry,
            employee_count: candidate.employee_count,
            linkedin_url: candidate.linkedin_url,
            twitter_url: candidate.twitter_url,
            city: candidate.city,
            country: candidate.country,
            source_url: Some(source_url.into()),
            scraped_at: Some(Utc::now()),
            raw_data: None,
            created_at: Utc::now(),
        }
    }
}

/// A persisted lead row.
///
/// `company_id` is a weak back-reference: the company may later be
/// deleted independently and the dangling reference is tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub company_id: Option<Uuid>,
    pub company_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    /// Provenance tag: `thehub.io`, `web_scrape`, `manual`, ...
    pub source: Option<String>,
    pub notes: Option<String>,
    pub ai_summary: Option<String>,
    /// JSON-encoded structured recommendation.
    pub ai_recommended_approach: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Build a lead derived from a freshly persisted company.
    pub fn for_company(
        company: &Company,
        email: Option<String>,
        source: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_id: Some(company.id),
            company_name: Some(company.name.clone()),
            first_name: None,
            last_name: None,
            job_title: None,
            email,
            phone: company.phone.clone(),
            linkedin_url: None,
            source: Some(source.into()),
            notes: Some(notes.into()),
            ai_summary: None,
            ai_recommended_approach: None,
            created_at: Utc::now(),
        }
    }

    /// Display name assembled from first/last, falling back to "there".
    pub fn contact_name(&self) -> String {
        let name = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let name = name.trim();
        if name.is_empty() {
            "there".to_string()
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_from_candidate_keeps_fields() {
        let candidate = CandidateRecord {
            name: "Acme".into(),
            email: Some("hi@acme.se".into()),
            ..Default::default()
        };
        let company = Company::from_candidate(candidate, "https://thehub.io/startups/acme");
        assert_eq!(company.name, "Acme");
        assert_eq!(company.email.as_deref(), Some("hi@acme.se"));
        assert_eq!(
            company.source_url.as_deref(),
            Some("https://thehub.io/startups/acme")
        );
        assert!(company.scraped_at.is_some());
    }

    #[test]
    fn test_lead_contact_name_fallback() {
        let mut lead = Lead::for_company(
            &Company::from_candidate(CandidateRecord::name_only("Acme"), "https://a"),
            None,
            "web_scrape",
            "notes",
        );
        assert_eq!(lead.contact_name(), "there");
        lead.first_name = Some("Jane".into());
        assert_eq!(lead.contact_name(), "Jane");
    }
}
