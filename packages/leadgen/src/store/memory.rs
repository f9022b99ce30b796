//! In-memory store implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::job::ScrapeJob;
use crate::records::{Company, Lead};
use crate::store::{CompanyStore, JobStore, LeadStore};

/// In-memory storage for companies, leads, and scrape jobs.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    companies: RwLock<HashMap<Uuid, Company>>,
    leads: RwLock<HashMap<Uuid, Lead>>,
    jobs: RwLock<HashMap<Uuid, ScrapeJob>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.companies.write().unwrap().clear();
        self.leads.write().unwrap().clear();
        self.jobs.write().unwrap().clear();
    }

    /// All leads referencing the given company.
    pub fn leads_for_company(&self, company_id: Uuid) -> Vec<Lead> {
        self.leads
            .read()
            .unwrap()
            .values()
            .filter(|l| l.company_id == Some(company_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn insert_company(&self, company: Company) -> StoreResult<Company> {
        self.companies
            .write()
            .unwrap()
            .insert(company.id, company.clone());
        Ok(company)
    }

    async fn get_company(&self, id: Uuid) -> StoreResult<Option<Company>> {
        Ok(self.companies.read().unwrap().get(&id).cloned())
    }

    async fn find_company_by_name_or_source(
        &self,
        name: &str,
        source_url: &str,
    ) -> StoreResult<Option<Company>> {
        let name_lower = name.to_lowercase();
        Ok(self
            .companies
            .read()
            .unwrap()
            .values()
            .find(|c| {
                c.source_url.as_deref() == Some(source_url)
                    || (!name_lower.is_empty() && c.name.to_lowercase().contains(&name_lower))
            })
            .cloned())
    }

    async fn update_company(&self, company: Company) -> StoreResult<Company> {
        let mut companies = self.companies.write().unwrap();
        if !companies.contains_key(&company.id) {
            return Err(StoreError::NotFound(company.id.to_string()));
        }
        companies.insert(company.id, company.clone());
        Ok(company)
    }

    async fn count_companies(&self) -> StoreResult<usize> {
        Ok(self.companies.read().unwrap().len())
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn insert_lead(&self, lead: Lead) -> StoreResult<Lead> {
        self.leads.write().unwrap().insert(lead.id, lead.clone());
        Ok(lead)
    }

    async fn get_lead(&self, id: Uuid) -> StoreResult<Option<Lead>> {
        Ok(self.leads.read().unwrap().get(&id).cloned())
    }

    async fn update_lead(&self, lead: Lead) -> StoreResult<Lead> {
        let mut leads = self.leads.write().unwrap();
        if !leads.contains_key(&lead.id) {
            return Err(StoreError::NotFound(lead.id.to_string()));
        }
        leads.insert(lead.id, lead.clone());
        Ok(lead)
    }

    async fn count_leads(&self) -> StoreResult<usize> {
        Ok(self.leads.read().unwrap().len())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: ScrapeJob) -> StoreResult<ScrapeJob> {
        self.jobs.write().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<ScrapeJob>> {
        Ok(self.jobs.read().unwrap().get(&id).cloned())
    }

    async fn list_recent_jobs(&self, limit: usize) -> StoreResult<Vec<ScrapeJob>> {
        let mut jobs: Vec<_> = self.jobs.read().unwrap().values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn update_job(&self, job: ScrapeJob) -> StoreResult<ScrapeJob> {
        let mut jobs = self.jobs.write().unwrap();
        match jobs.get(&job.id) {
            None => Err(StoreError::NotFound(job.id.to_string())),
            // Terminal rows are immutable: late writes are a no-op.
            Some(stored) if stored.is_terminal() => Ok(stored.clone()),
            Some(_) => {
                jobs.insert(job.id, job.clone());
                Ok(job)
            }
        }
    }
}
