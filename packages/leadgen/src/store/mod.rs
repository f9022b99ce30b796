//! Store traits for the external persistence collaborators.
//!
//! The relational schema lives outside this crate; the pipeline only
//! depends on these narrow interfaces. [`MemoryStore`] is the reference
//! implementation used by tests and the default server wiring.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::job::ScrapeJob;
use crate::records::{Company, Lead};

/// Company persistence.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn insert_company(&self, company: Company) -> StoreResult<Company>;

    async fn get_company(&self, id: Uuid) -> StoreResult<Option<Company>>;

    /// Dedup lookup: exact `source_url` match OR case-insensitive name
    /// containment, matching the gate's soft-uniqueness rule.
    async fn find_company_by_name_or_source(
        &self,
        name: &str,
        source_url: &str,
    ) -> StoreResult<Option<Company>>;

    async fn update_company(&self, company: Company) -> StoreResult<Company>;

    async fn count_companies(&self) -> StoreResult<usize>;
}

/// Lead persistence.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert_lead(&self, lead: Lead) -> StoreResult<Lead>;

    async fn get_lead(&self, id: Uuid) -> StoreResult<Option<Lead>>;

    async fn update_lead(&self, lead: Lead) -> StoreResult<Lead>;

    async fn count_leads(&self) -> StoreResult<usize>;
}

/// Scrape-job persistence.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, job: ScrapeJob) -> StoreResult<ScrapeJob>;

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<ScrapeJob>>;

    /// Most recent jobs, newest first.
    async fn list_recent_jobs(&self, limit: usize) -> StoreResult<Vec<ScrapeJob>>;

    /// Write back a mutated job row.
    ///
    /// Once the stored row is terminal the update is a no-op and the
    /// stored row is returned unchanged: late-arriving pipeline writes
    /// must never resurrect or mutate a finished job.
    async fn update_job(&self, job: ScrapeJob) -> StoreResult<ScrapeJob>;
}
