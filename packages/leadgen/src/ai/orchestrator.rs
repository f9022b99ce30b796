//! Enrichment orchestration: build context, call the completion
//! service, and merge results back into leads and companies.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::contacts::ContactSearcher;
use crate::ai::contracts::{
    CompanyAnalysis, CompanyProfile, ContactReport, EmailDraft, LeadAnalysis, ServiceDetails,
    ServiceSuggestion,
};
use crate::ai::parse::{parse_json_or, strip_code_fences};
use crate::ai::{prompts, ChatCompletion};
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::extract::html_to_text;
use crate::fetch::PageFetcher;
use crate::records::{Company, Lead};
use crate::store::{CompanyStore, LeadStore};

/// Website text pulled into a company analysis is capped here.
const MAX_WEBSITE_CONTEXT: usize = 5000;

/// Drives all AI enrichment flows against the completion service.
pub struct EnrichmentOrchestrator<S> {
    store: Arc<S>,
    chat: Arc<dyn ChatCompletion>,
    fetcher: Arc<dyn PageFetcher>,
    config: ScraperConfig,
}

impl<S> EnrichmentOrchestrator<S>
where
    S: CompanyStore + LeadStore + Send + Sync,
{
    pub fn new(
        store: Arc<S>,
        chat: Arc<dyn ChatCompletion>,
        fetcher: Arc<dyn PageFetcher>,
        config: ScraperConfig,
    ) -> Self {
        Self {
            store,
            chat,
            fetcher,
            config,
        }
    }

    /// Analyze a company and stash the result on its `rawData` blob.
    pub async fn analyze_company(&self, company_id: Uuid) -> Result<CompanyAnalysis> {
        let mut company = self.load_company(company_id).await?;

        // Prefer the stored description; fall back to live website text.
        let description = match company.description.clone() {
            Some(d) if !d.is_empty() => d,
            _ => self.fetch_website_text(&company).await.unwrap_or_default(),
        };

        let messages = prompts::company_analysis(
            &company.name,
            &description,
            company.industry.as_deref(),
            company.website.as_deref().or(company.source_url.as_deref()),
        );
        let response = self.chat.complete(messages, 0.5).await?;
        let analysis: CompanyAnalysis =
            parse_json_or(&response, || CompanyAnalysis::fallback(response.clone()));

        company.raw_data = Some(
            serde_json::json!({
                "aiAnalysis": analysis,
                "analyzedAt": Utc::now().to_rfc3339(),
            })
            .to_string(),
        );
        self.store.update_company(company).await?;

        info!(company_id = %company_id, "company analysis stored");
        Ok(analysis)
    }

    /// Summarize a company from its live website text into a structured
    /// profile. Unlike [`analyze_company`](Self::analyze_company) this
    /// extracts facts rather than sales guidance and stores nothing.
    pub async fn profile_company(&self, company_id: Uuid) -> Result<CompanyProfile> {
        let company = self.load_company(company_id).await?;
        let content = self.fetch_website_text(&company).await.unwrap_or_default();

        let messages = prompts::company_profile(&company.name, &content);
        let response = self.chat.complete(messages, 0.3).await?;
        Ok(parse_json_or(&response, CompanyProfile::fallback))
    }

    /// Rank the service catalog by relevance for one company.
    ///
    /// Takes the describing fields directly rather than a stored row so
    /// callers can rank companies that were never persisted.
    pub async fn suggest_services(
        &self,
        company_name: &str,
        description: &str,
        industry: Option<&str>,
    ) -> Result<Vec<ServiceSuggestion>> {
        let messages = prompts::service_suggestions(company_name, description, industry);
        let response = self.chat.complete(messages, 0.4).await?;
        let mut suggestions: Vec<ServiceSuggestion> =
            parse_json_or(&response, ServiceSuggestion::fallback_set);

        for suggestion in &mut suggestions {
            suggestion.service_details =
                prompts::service_by_key(&suggestion.service).map(|s| ServiceDetails {
                    name: s.name.to_string(),
                    description: s.description.to_string(),
                });
        }
        Ok(suggestions)
    }

    /// Full lead analysis: profile, approach, talking points.
    pub async fn analyze_lead(&self, lead_id: Uuid) -> Result<LeadAnalysis> {
        let mut lead = self.load_lead(lead_id).await?;
        let company = self.company_of(&lead).await?;
        let company_info = company_context(company.as_ref());

        let messages = prompts::lead_analysis(
            lead.first_name.as_deref().unwrap_or(""),
            lead.last_name.as_deref().unwrap_or(""),
            lead.company_name.as_deref().unwrap_or(""),
            lead.job_title.as_deref().unwrap_or(""),
            lead.email.as_deref().unwrap_or(""),
            lead.notes.as_deref().unwrap_or(""),
            &company_info,
        );
        let response = self.chat.complete(messages, 0.6).await?;
        let analysis: LeadAnalysis = parse_json_or(&response, || {
            LeadAnalysis::fallback(
                lead.first_name.as_deref().unwrap_or(""),
                lead.last_name.as_deref().unwrap_or(""),
                lead.company_name.as_deref().unwrap_or(""),
            )
        });

        lead.ai_summary = Some(analysis.summary.clone());
        lead.ai_recommended_approach = Some(analysis.approach_json());
        self.store.update_lead(lead).await?;

        info!(lead_id = %lead_id, "lead analysis stored");
        Ok(analysis)
    }

    /// Lightweight summary/approach enrichment.
    ///
    /// Leniently parsed: a non-JSON answer becomes the summary verbatim
    /// rather than an error.
    pub async fn enrich_lead(&self, lead_id: Uuid) -> Result<(String, String)> {
        let mut lead = self.load_lead(lead_id).await?;
        let company = self.company_of(&lead).await?;

        let context = format!(
            "Name: {} {}\nCompany: {}\nJob Title: {}\nEmail: {}\nSource: {}\nNotes: {}\nCompany Description: {}",
            lead.first_name.as_deref().unwrap_or(""),
            lead.last_name.as_deref().unwrap_or(""),
            lead.company_name.as_deref().unwrap_or(""),
            lead.job_title.as_deref().unwrap_or(""),
            lead.email.as_deref().unwrap_or(""),
            lead.source.as_deref().unwrap_or(""),
            lead.notes.as_deref().unwrap_or(""),
            company.as_ref().and_then(|c| c.description.as_deref()).unwrap_or(""),
        );

        let messages = vec![
            deepseek_client::Message::system(
                "You are a sales expert. Analyze this lead and provide:\n\
                 1. A brief summary of the lead (2-3 sentences)\n\
                 2. Recommended approach for outreach (3-4 bullet points)\n\n\
                 Format your response as JSON with keys: summary, recommendedApproach",
            ),
            deepseek_client::Message::user(context),
        ];
        let response = self.chat.complete(messages, 0.7).await?;

        let cleaned = strip_code_fences(&response);
        let (summary, approach) = match serde_json::from_str::<serde_json::Value>(&cleaned) {
            Ok(value) => {
                let summary = value
                    .get("summary")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                let approach = match value.get("recommendedApproach") {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                (summary, approach)
            }
            Err(_) => (response.clone(), String::new()),
        };

        lead.ai_summary = Some(summary.clone());
        lead.ai_recommended_approach = Some(approach.clone());
        self.store.update_lead(lead).await?;

        Ok((summary, approach))
    }

    /// Generate a personalized outreach email for a lead.
    ///
    /// Reuses a stored company analysis when one exists; otherwise runs
    /// one first.
    pub async fn generate_email(&self, lead_id: Uuid) -> Result<EmailDraft> {
        let lead = self.load_lead(lead_id).await?;
        let company = self.company_of(&lead).await?;

        let mut suggested_services: Vec<String> = Vec::new();
        let mut proposal_points: Vec<String> = Vec::new();
        let mut company_info = company
            .as_ref()
            .and_then(|c| c.description.clone())
            .or_else(|| lead.notes.clone())
            .unwrap_or_default();

        if let Some(analysis) = company.as_ref().and_then(stored_analysis) {
            suggested_services = analysis.suggested_services;
            proposal_points = analysis.proposal_points;
        }

        if suggested_services.is_empty() {
            let messages = prompts::company_analysis(
                lead.company_name.as_deref().unwrap_or("Unknown Company"),
                &company_info,
                company.as_ref().and_then(|c| c.industry.as_deref()),
                company.as_ref().and_then(|c| c.website.as_deref()),
            );
            let response = self.chat.complete(messages, 0.5).await?;
            let analysis: CompanyAnalysis =
                parse_json_or(&response, || CompanyAnalysis::fallback(response.clone()));
            suggested_services = analysis.suggested_services;
            proposal_points = analysis.proposal_points;
            company_info = analysis.summary;
        }

        let company_name = lead.company_name.clone().unwrap_or_else(|| "your company".to_string());
        let contact_name = lead.first_name.clone().unwrap_or_default();

        let messages = prompts::personalized_email(
            &company_name,
            &contact_name,
            &company_info,
            &suggested_services,
            &proposal_points,
        );
        let response = self.chat.complete(messages, 0.7).await?;
        let draft = parse_json_or(&response, || {
            EmailDraft::fallback(
                &company_name,
                if contact_name.is_empty() { "there" } else { &contact_name },
                &suggested_services,
            )
        });
        Ok(draft)
    }

    /// Contact search: pool the company's web presence, extract decision
    /// makers, and merge them into the lead.
    ///
    /// Contact fields (email, phone, LinkedIn) are only filled when
    /// currently empty; operator-entered data is never clobbered.
    pub async fn search_contacts(&self, lead_id: Uuid) -> Result<ContactReport> {
        let mut lead = self.load_lead(lead_id).await?;
        let company = self.company_of(&lead).await?;
        let company_name = lead
            .company_name
            .clone()
            .or_else(|| company.as_ref().map(|c| c.name.clone()))
            .unwrap_or_default();
        let website = company
            .as_ref()
            .and_then(|c| c.website.as_deref().or(c.source_url.as_deref()))
            .map(String::from);

        let searcher = ContactSearcher::new(self.fetcher.as_ref(), &self.config);
        let context = searcher.gather(&company_name, website.as_deref()).await;

        let report = if context.pooled_text.is_empty() {
            ContactReport::fallback(context.ceo_name.clone())
        } else {
            let messages = prompts::contact_extraction(&company_name, &context.pooled_text);
            let response = self.chat.complete(messages, 0.3).await?;
            let mut report: ContactReport =
                parse_json_or(&response, || ContactReport::fallback(context.ceo_name.clone()));
            // Pattern extraction backs up the model.
            if report.ceo.is_none() {
                report.ceo = context.ceo_name.clone();
            }
            report
        };

        merge_report_into_lead(&mut lead, &report);
        self.store.update_lead(lead).await?;

        debug!(lead_id = %lead_id, ceo = ?report.ceo, "contact search merged");
        Ok(report)
    }

    async fn fetch_website_text(&self, company: &Company) -> Option<String> {
        let url = company.website.as_deref().or(company.source_url.as_deref())?;
        let page = timeout(self.config.enrichment_timeout, self.fetcher.fetch(url))
            .await
            .ok()?
            .ok()?;
        let mut text = html_to_text(&page.html);
        if text.len() > MAX_WEBSITE_CONTEXT {
            let mut cut = MAX_WEBSITE_CONTEXT;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
        }
        Some(text)
    }

    async fn load_company(&self, id: Uuid) -> Result<Company> {
        self.store
            .get_company(id)
            .await?
            .ok_or(ScrapeError::NotFound {
                kind: "company",
                id: id.to_string(),
            })
    }

    async fn load_lead(&self, id: Uuid) -> Result<Lead> {
        self.store.get_lead(id).await?.ok_or(ScrapeError::NotFound {
            kind: "lead",
            id: id.to_string(),
        })
    }

    async fn company_of(&self, lead: &Lead) -> Result<Option<Company>> {
        match lead.company_id {
            Some(id) => Ok(self.store.get_company(id).await?),
            None => Ok(None),
        }
    }
}

/// Description plus any stored analysis, as prompt context.
fn company_context(company: Option<&Company>) -> String {
    let Some(company) = company else {
        return String::new();
    };
    let mut info = company.description.clone().unwrap_or_default();
    if let Some(analysis) = stored_analysis(company) {
        if let Ok(json) = serde_json::to_string(&analysis) {
            if !info.is_empty() {
                info.push('\n');
            }
            info.push_str(&json);
        }
    }
    info
}

/// Pull a previously stored analysis out of the `rawData` blob.
fn stored_analysis(company: &Company) -> Option<CompanyAnalysis> {
    let raw = company.raw_data.as_deref()?;
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    serde_json::from_value(value.get("aiAnalysis")?.clone()).ok()
}

/// Merge a contact report into a lead.
///
/// Summary-ish fields overwrite; contact fields fill only when empty.
fn merge_report_into_lead(lead: &mut Lead, report: &ContactReport) {
    if let Some(ceo) = &report.ceo {
        if lead.first_name.is_none() && lead.last_name.is_none() {
            let mut parts = ceo.splitn(2, ' ');
            lead.first_name = parts.next().map(String::from);
            lead.last_name = parts.next().map(String::from);
            if lead.job_title.is_none() {
                lead.job_title = Some("CEO".to_string());
            }
        }
    }
    if lead.email.is_none() {
        lead.email = report.ceo_email.clone();
    }
    if lead.linkedin_url.is_none() {
        lead.linkedin_url = report.ceo_linkedin.clone();
    }
    if let Some(insights) = &report.company_insights {
        lead.ai_summary = Some(insights.clone());
    }
    if report.recommended_approach.is_some() || !report.talking_points.is_empty() {
        lead.ai_recommended_approach = Some(
            serde_json::json!({
                "approach": report.recommended_approach,
                "talkingPoints": report.talking_points,
                "contacts": report.contacts,
            })
            .to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::CandidateRecord;

    fn lead_with_email(email: Option<&str>) -> Lead {
        let company = Company::from_candidate(CandidateRecord::name_only("Acme"), "https://a");
        let mut lead = Lead::for_company(&company, email.map(String::from), "thehub.io", "n");
        lead.first_name = None;
        lead
    }

    #[test]
    fn test_merge_never_clobbers_existing_email() {
        let mut lead = lead_with_email(Some("kept@acme.se"));
        let report = ContactReport {
            ceo: Some("Erik Lindqvist".to_string()),
            ceo_email: Some("other@acme.se".to_string()),
            ..Default::default()
        };
        merge_report_into_lead(&mut lead, &report);
        assert_eq!(lead.email.as_deref(), Some("kept@acme.se"));
        assert_eq!(lead.first_name.as_deref(), Some("Erik"));
        assert_eq!(lead.last_name.as_deref(), Some("Lindqvist"));
    }

    #[test]
    fn test_merge_fills_empty_contact_fields() {
        let mut lead = lead_with_email(None);
        let report = ContactReport {
            ceo_email: Some("found@acme.se".to_string()),
            ceo_linkedin: Some("https://linkedin.com/in/erik".to_string()),
            company_insights: Some("Raised a seed round in 2024.".to_string()),
            ..Default::default()
        };
        merge_report_into_lead(&mut lead, &report);
        assert_eq!(lead.email.as_deref(), Some("found@acme.se"));
        assert_eq!(lead.linkedin_url.as_deref(), Some("https://linkedin.com/in/erik"));
        assert_eq!(lead.ai_summary.as_deref(), Some("Raised a seed round in 2024."));
    }

    #[test]
    fn test_stored_analysis_roundtrip() {
        let mut company = Company::from_candidate(CandidateRecord::name_only("Acme"), "https://a");
        let analysis = CompanyAnalysis::fallback("Does solar.".to_string());
        company.raw_data = Some(
            serde_json::json!({"aiAnalysis": analysis, "analyzedAt": "2026-01-01T00:00:00Z"})
                .to_string(),
        );
        let loaded = stored_analysis(&company).unwrap();
        assert_eq!(loaded.summary, "Does solar.");
        assert!(stored_analysis(&lead_company_without_raw()).is_none());
    }

    fn lead_company_without_raw() -> Company {
        Company::from_candidate(CandidateRecord::name_only("Bare"), "https://b")
    }
}
