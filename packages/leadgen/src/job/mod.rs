//! Scrape-job rows and the state machine they move through.
//!
//! A job is owned exclusively by the [`controller`]; everything else
//! (HTTP pollers included) reads it through the job store.

pub mod controller;

pub use controller::JobController;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job kind, `jobType` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    /// Paginated multi-company crawl of a listing site.
    #[serde(rename = "thehub")]
    ListingCrawl,
    /// Single-page scrape: emails straight out of one page's body.
    #[serde(rename = "general")]
    SinglePage,
}

/// Job status. `Completed` and `Failed` are terminal; a job reaches a
/// terminal state exactly once and is never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Phase-dependent snapshot written into `resultSummary`.
///
/// Keys vary by phase, so every field is optional and absent fields are
/// omitted from the JSON; pollers must treat missing keys as absent,
/// not as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    /// Human-readable phase string, present mid-crawl.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads_created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails_found: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_processed: Option<usize>,
}

impl ResultSummary {
    /// Mid-discovery snapshot.
    pub fn discovering(urls_found: usize) -> Self {
        Self {
            status: Some("discovering company pages".to_string()),
            urls_found: Some(urls_found),
            ..Default::default()
        }
    }

    /// Mid-processing snapshot with running counts.
    pub fn processing(companies: usize, leads: usize, emails: usize) -> Self {
        Self {
            status: Some("processing company pages".to_string()),
            companies_found: Some(companies),
            leads_created: Some(leads),
            emails_found: Some(emails),
            ..Default::default()
        }
    }

    /// Final snapshot for a completed job.
    pub fn completed(companies: usize, leads: usize, emails: usize, processed: usize) -> Self {
        Self {
            companies_found: Some(companies),
            leads_created: Some(leads),
            emails_found: Some(emails),
            total_processed: Some(processed),
            ..Default::default()
        }
    }

    /// Encode as the JSON string stored on the job row.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// One scrape invocation, stable poll contract of the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeJob {
    pub id: Uuid,
    pub url: String,
    pub job_type: JobKind,
    pub status: JobStatus,
    /// Completion percentage derived from the counters below.
    pub progress: u8,
    /// Expected item count; mutable as discovery proceeds.
    pub total_items: Option<usize>,
    /// Monotonic progress counter; never exceeds `total_items` once known.
    pub items_scraped: usize,
    /// Set only on failure.
    pub error_message: Option<String>,
    /// JSON-encoded [`ResultSummary`].
    pub result_summary: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ScrapeJob {
    /// Create a job row, immediately running with `startedAt` stamped.
    pub fn start(url: impl Into<String>, job_type: JobKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            job_type,
            status: JobStatus::Running,
            progress: 0,
            total_items: None,
            items_scraped: 0,
            error_message: None,
            result_summary: None,
            started_at: Some(now),
            completed_at: None,
            created_at: now,
        }
    }

    /// Record discovery outcome: the expected item count.
    pub fn set_total_items(&mut self, total: usize) {
        self.total_items = Some(total);
        self.recompute_progress();
    }

    /// Advance the progress counter.
    ///
    /// The counter is monotonic and clamped to `total_items` once known,
    /// so a stray late or duplicate update can never move it backwards
    /// or past the end.
    pub fn record_items_scraped(&mut self, items: usize) {
        let mut items = items.max(self.items_scraped);
        if let Some(total) = self.total_items {
            items = items.min(total);
        }
        self.items_scraped = items;
        self.recompute_progress();
    }

    /// Attach a progress snapshot for pollers.
    pub fn set_summary(&mut self, summary: &ResultSummary) {
        self.result_summary = Some(summary.to_json());
    }

    /// Move to the `Completed` terminal state.
    pub fn complete(&mut self, summary: &ResultSummary) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.set_summary(summary);
    }

    /// Move to the `Failed` terminal state.
    ///
    /// Already-created companies and leads are retained; there is no
    /// partial rollback.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(message.into());
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn recompute_progress(&mut self) {
        self.progress = match self.total_items {
            Some(total) if total > 0 => ((self.items_scraped * 100) / total).min(100) as u8,
            _ => 0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_starts_running_with_timestamps() {
        let job = ScrapeJob::start("https://thehub.io/startups", JobKind::ListingCrawl);
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_none());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_items_scraped_monotonic_and_clamped() {
        let mut job = ScrapeJob::start("https://a", JobKind::ListingCrawl);
        job.set_total_items(10);
        job.record_items_scraped(4);
        assert_eq!(job.items_scraped, 4);
        assert_eq!(job.progress, 40);

        // Lower value never moves the counter backwards.
        job.record_items_scraped(2);
        assert_eq!(job.items_scraped, 4);

        // Overshoot clamps to total.
        job.record_items_scraped(25);
        assert_eq!(job.items_scraped, 10);
        assert_eq!(job.progress, 100);
    }

    #[test]
    fn test_terminal_states() {
        let mut job = ScrapeJob::start("https://a", JobKind::SinglePage);
        job.fail("HTTP 500");
        assert!(job.is_terminal());
        assert_eq!(job.error_message.as_deref(), Some("HTTP 500"));
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_summary_serializes_phase_keys_only() {
        let mid = ResultSummary::discovering(12).to_json();
        assert!(mid.contains("urlsFound"));
        assert!(!mid.contains("companiesFound"));

        let done = ResultSummary::completed(3, 3, 2, 5).to_json();
        assert!(done.contains("companiesFound"));
        assert!(done.contains("totalProcessed"));
        assert!(!done.contains("urlsFound"));
    }

    #[test]
    fn test_job_wire_shape_is_camel_case() {
        let job = ScrapeJob::start("https://a", JobKind::ListingCrawl);
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["jobType"], "thehub");
        assert_eq!(json["status"], "running");
        assert!(json.get("itemsScraped").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
