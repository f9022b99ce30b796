//! Background scrape jobs: submission, the detached pipeline, and
//! progress write-back.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::ScraperConfig;
use crate::dedup::{GateOutcome, PersistGate};
use crate::error::{Result, ScrapeError};
use crate::extract::{extract_title, html_to_text, PageSignals};
use crate::fetch::PageFetcher;
use crate::harvest::DetailHarvester;
use crate::job::{JobKind, ResultSummary, ScrapeJob};
use crate::paginate::{absolutize, ListingPaginator};
use crate::records::{CandidateRecord, Company, Lead};
use crate::store::{CompanyStore, JobStore, LeadStore};
use uuid::Uuid;

/// Company names are stored in a 255-char column.
const MAX_COMPANY_NAME_LEN: usize = 255;

/// Ceiling on a page-text-derived company description.
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Running counters carried across the processing loop.
#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    companies: usize,
    leads: usize,
    emails: usize,
}

/// Owns scrape jobs end to end.
///
/// `submit` persists a job row and detaches the pipeline onto the
/// runtime; callers observe progress only by polling the job store.
pub struct JobController<S> {
    store: Arc<S>,
    fetcher: Arc<dyn PageFetcher>,
    config: ScraperConfig,
}

impl<S> Clone for JobController<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fetcher: Arc::clone(&self.fetcher),
            config: self.config.clone(),
        }
    }
}

impl<S> JobController<S>
where
    S: CompanyStore + LeadStore + JobStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, fetcher: Arc<dyn PageFetcher>, config: ScraperConfig) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    /// Create a job row and detach the pipeline.
    ///
    /// Returns the freshly inserted row synchronously; the actual crawl
    /// runs out-of-band and reports only through the job store.
    pub async fn submit(
        &self,
        url: impl Into<String>,
        kind: JobKind,
        max_pages: Option<usize>,
    ) -> Result<ScrapeJob> {
        let url = url.into();
        let job = self
            .store
            .insert_job(ScrapeJob::start(url.clone(), kind))
            .await?;
        info!(job_id = %job.id, url = %url, kind = ?kind, "scrape job submitted");

        let controller = self.clone();
        let job_id = job.id;
        let max_pages = max_pages.unwrap_or(self.config.max_pages);
        tokio::spawn(async move {
            let outcome = match kind {
                JobKind::ListingCrawl => controller.run_listing_crawl(job_id, &url, max_pages).await,
                JobKind::SinglePage => controller.run_single_page(job_id, &url).await,
            };
            if let Err(e) = outcome {
                error!(job_id = %job_id, error = %e, "scrape job failed");
                controller.mark_failed(job_id, e.to_string()).await;
            }
        });

        Ok(job)
    }

    /// Run the whole pipeline inline. Test seam; production goes
    /// through [`submit`](Self::submit).
    pub async fn run_to_completion(
        &self,
        url: impl Into<String>,
        kind: JobKind,
        max_pages: Option<usize>,
    ) -> Result<ScrapeJob> {
        let url = url.into();
        let job = self
            .store
            .insert_job(ScrapeJob::start(url.clone(), kind))
            .await?;
        let max_pages = max_pages.unwrap_or(self.config.max_pages);
        let outcome = match kind {
            JobKind::ListingCrawl => self.run_listing_crawl(job.id, &url, max_pages).await,
            JobKind::SinglePage => self.run_single_page(job.id, &url).await,
        };
        if let Err(e) = outcome {
            self.mark_failed(job.id, e.to_string()).await;
        }
        Ok(self
            .store
            .get_job(job.id)
            .await?
            .ok_or_else(|| ScrapeError::NotFound {
                kind: "job",
                id: job.id.to_string(),
            })?)
    }

    /// Paginated multi-company crawl of a listing site.
    async fn run_listing_crawl(&self, job_id: Uuid, url: &str, max_pages: usize) -> Result<()> {
        let paginator = ListingPaginator::new(self.fetcher.as_ref(), &self.config);

        // Pagination reports per-page counts through a sync callback;
        // bridge them onto the store via a channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<usize>();
        let store = Arc::clone(&self.store);
        let progress_writer = tokio::spawn(async move {
            while let Some(urls_found) = rx.recv().await {
                write_summary(store.as_ref(), job_id, &ResultSummary::discovering(urls_found))
                    .await;
            }
        });

        let discovered = paginator
            .discover(url, max_pages, |urls_found| {
                let _ = tx.send(urls_found);
            })
            .await;
        drop(tx);
        let _ = progress_writer.await;

        if discovered.first_page_failed {
            return Err(ScrapeError::ListingUnreachable {
                url: url.to_string(),
            });
        }

        let mut urls = discovered.urls;
        urls.truncate(self.config.max_items);
        let total = urls.len();
        info!(
            job_id = %job_id,
            urls = total,
            pages = discovered.pages_processed,
            "discovery complete"
        );

        self.mutate_job(job_id, |job| job.set_total_items(total))
            .await?;

        let harvester = DetailHarvester::new(self.fetcher.as_ref(), &self.config);
        let gate = PersistGate::new(self.store.as_ref(), self.store.as_ref());
        let mut counters = Counters::default();

        for (index, detail_url) in urls.iter().enumerate() {
            let absolute = absolutize(detail_url, url);
            let candidate = harvester.harvest(&absolute).await;

            match gate
                .persist_candidate(candidate, &absolute, "thehub.io")
                .await
            {
                Ok(GateOutcome::Created { had_email, .. }) => {
                    counters.companies += 1;
                    counters.leads += 1;
                    if had_email {
                        counters.emails += 1;
                    }
                }
                Ok(GateOutcome::Duplicate) => {}
                Err(e) => {
                    // One bad row never aborts the crawl.
                    warn!(job_id = %job_id, url = %absolute, error = %e, "persist failed, skipping item");
                }
            }

            let processed = index + 1;
            if should_snapshot(processed, total) {
                let summary =
                    ResultSummary::processing(counters.companies, counters.leads, counters.emails);
                self.mutate_job(job_id, |job| {
                    job.record_items_scraped(processed);
                    job.set_summary(&summary);
                })
                .await?;
            }

            if processed < total && !self.config.item_delay.is_zero() {
                tokio::time::sleep(self.config.item_delay).await;
            }
        }

        let summary = ResultSummary::completed(
            counters.companies,
            counters.leads,
            counters.emails,
            total,
        );
        self.mutate_job(job_id, |job| {
            job.record_items_scraped(total);
            job.complete(&summary);
        })
        .await?;

        info!(
            job_id = %job_id,
            companies = counters.companies,
            leads = counters.leads,
            emails = counters.emails,
            "listing crawl completed"
        );
        Ok(())
    }

    /// Single-page mode: one fetch, every page signal persisted.
    async fn run_single_page(&self, job_id: Uuid, url: &str) -> Result<()> {
        let page = self.fetcher.fetch(url).await?;
        self.mutate_job(job_id, |job| job.set_total_items(1)).await?;

        let text = html_to_text(&page.html);
        let signals = PageSignals::harvest(&page.html, &text, self.config.max_leads_per_page);
        let emails = signals.emails;

        let mut name = extract_title(&page.html).unwrap_or_else(|| host_name(url));
        truncate_on_char_boundary(&mut name, MAX_COMPANY_NAME_LEN);

        let mut description = text;
        truncate_on_char_boundary(&mut description, MAX_DESCRIPTION_LEN);

        let candidate = CandidateRecord {
            name,
            description: Some(description),
            email: emails.first().cloned(),
            phone: signals.phones.into_iter().next(),
            website: Some(url.to_string()),
            linkedin_url: signals.linkedin_url,
            twitter_url: signals.twitter_url,
            ..Default::default()
        };

        let mut counters = Counters::default();
        let company = match self
            .store
            .find_company_by_name_or_source(&candidate.name, url)
            .await?
        {
            Some(existing) => existing,
            None => {
                counters.companies = 1;
                self.store
                    .insert_company(Company::from_candidate(candidate, url))
                    .await?
            }
        };

        // One lead per email found, nothing when the page has none.
        for email in &emails {
            self.store
                .insert_lead(Lead::for_company(
                    &company,
                    Some(email.clone()),
                    "web_scrape",
                    format!("Scraped from {}", url),
                ))
                .await?;
            counters.leads += 1;
            counters.emails += 1;
        }

        let summary =
            ResultSummary::completed(counters.companies, counters.leads, counters.emails, 1);
        self.mutate_job(job_id, |job| {
            job.record_items_scraped(1);
            job.complete(&summary);
        })
        .await?;

        info!(job_id = %job_id, emails = counters.emails, "single-page scrape completed");
        Ok(())
    }

    /// Load, mutate, write back one job row.
    async fn mutate_job<F>(&self, job_id: Uuid, mutate: F) -> Result<ScrapeJob>
    where
        F: FnOnce(&mut ScrapeJob),
    {
        let mut job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| ScrapeError::NotFound {
                kind: "job",
                id: job_id.to_string(),
            })?;
        mutate(&mut job);
        Ok(self.store.update_job(job).await?)
    }

    /// Best-effort terminal failure write; errors here are only logged.
    async fn mark_failed(&self, job_id: Uuid, message: String) {
        let result = self.mutate_job(job_id, |job| job.fail(message.clone())).await;
        if let Err(e) = result {
            error!(job_id = %job_id, error = %e, "could not record job failure");
        }
    }
}

/// Snapshot cadence: every item for small jobs, every fifth item (plus
/// the last) once the batch exceeds twenty.
fn should_snapshot(processed: usize, total: usize) -> bool {
    if total <= 20 {
        return true;
    }
    processed % 5 == 0 || processed == total
}

/// Hostname of a single-page scrape target, used as the company name
/// when the page has no title.
fn host_name(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| url.to_string())
}

fn truncate_on_char_boundary(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

async fn write_summary(store: &dyn JobStore, job_id: Uuid, summary: &ResultSummary) {
    let job = match store.get_job(job_id).await {
        Ok(Some(job)) => job,
        _ => return,
    };
    let mut job = job;
    job.set_summary(summary);
    if let Err(e) = store.update_job(job).await {
        warn!(job_id = %job_id, error = %e, "progress snapshot write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_name_fallback() {
        assert_eq!(host_name("https://acme.example/contact"), "acme.example");
        assert_eq!(host_name("not a url"), "not a url");
    }

    #[test]
    fn test_name_truncation_respects_char_boundaries() {
        let mut name = "å".repeat(200);
        truncate_on_char_boundary(&mut name, MAX_COMPANY_NAME_LEN);
        assert!(name.len() <= MAX_COMPANY_NAME_LEN);
        assert!(name.is_char_boundary(name.len()));
    }

    #[test]
    fn test_snapshot_cadence() {
        // Small batches snapshot every item.
        assert!(should_snapshot(1, 10));
        assert!(should_snapshot(7, 20));

        // Large batches snapshot every fifth item and the last.
        assert!(!should_snapshot(1, 21));
        assert!(should_snapshot(5, 21));
        assert!(should_snapshot(20, 21));
        assert!(should_snapshot(21, 21));
        assert!(!should_snapshot(22, 30));
    }
}
