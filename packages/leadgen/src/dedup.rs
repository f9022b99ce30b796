//! Dedup gate: check-then-act persistence of harvested candidates.

use tracing::{debug, info};

use crate::error::Result;
use crate::records::{CandidateRecord, Company, Lead};
use crate::store::{CompanyStore, LeadStore};

/// Ceiling on seeded lead notes.
const MAX_NOTES_LEN: usize = 1000;

/// What the gate did with one candidate.
#[derive(Debug)]
pub enum GateOutcome {
    /// Company + derived lead were created.
    Created {
        company: Company,
        lead: Lead,
        had_email: bool,
    },
    /// A matching company already existed; nothing was written.
    ///
    /// The scrape path never update-merges; enrichment handles merging
    /// later.
    Duplicate,
}

/// Persists a candidate only if no matching company exists.
///
/// The existence check and the insert are not one atomic operation:
/// concurrent jobs over overlapping URL sets can race and double-create
/// a company. This is a documented limitation of the store contract,
/// not something the gate tries to hide.
pub struct PersistGate<'a> {
    companies: &'a dyn CompanyStore,
    leads: &'a dyn LeadStore,
}

impl<'a> PersistGate<'a> {
    pub fn new(companies: &'a dyn CompanyStore, leads: &'a dyn LeadStore) -> Self {
        Self { companies, leads }
    }

    /// Persist one candidate behind the dedup check.
    ///
    /// Lookup is by exact source URL or case-insensitive name
    /// containment. On a miss, a company row is created and exactly one
    /// derived lead referencing it, tagged with the crawl origin.
    pub async fn persist_candidate(
        &self,
        candidate: CandidateRecord,
        source_url: &str,
        source_tag: &str,
    ) -> Result<GateOutcome> {
        if let Some(existing) = self
            .companies
            .find_company_by_name_or_source(&candidate.name, source_url)
            .await?
        {
            debug!(name = %candidate.name, existing_id = %existing.id, "skipping duplicate company");
            return Ok(GateOutcome::Duplicate);
        }

        let notes = seed_notes(source_url, candidate.description.as_deref());
        let email = candidate.email.clone();

        let company = self
            .companies
            .insert_company(Company::from_candidate(candidate, source_url))
            .await?;

        let lead = self
            .leads
            .insert_lead(Lead::for_company(&company, email.clone(), source_tag, notes))
            .await?;

        info!(company = %company.name, lead_id = %lead.id, "company and lead created");

        Ok(GateOutcome::Created {
            company,
            lead,
            had_email: email.is_some(),
        })
    }
}

/// Seed lead notes from the scrape context, truncated to a sane length.
fn seed_notes(source_url: &str, description: Option<&str>) -> String {
    let mut notes = match description {
        Some(desc) if !desc.is_empty() => format!("Scraped from {}\n{}", source_url, desc),
        _ => format!("Scraped from {}", source_url),
    };
    if notes.len() > MAX_NOTES_LEN {
        let mut cut = MAX_NOTES_LEN;
        while !notes.is_char_boundary(cut) {
            cut -= 1;
        }
        notes.truncate(cut);
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn candidate(name: &str, email: Option<&str>) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            email: email.map(String::from),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_gate_creates_company_and_lead_once() {
        let store = MemoryStore::new();
        let gate = PersistGate::new(&store, &store);

        let outcome = gate
            .persist_candidate(
                candidate("Acme", Some("hi@acme.se")),
                "https://thehub.io/startups/acme",
                "thehub.io",
            )
            .await
            .unwrap();
        assert!(matches!(outcome, GateOutcome::Created { had_email: true, .. }));

        // Same source URL again: no second row.
        let outcome = gate
            .persist_candidate(
                candidate("Acme Renamed", None),
                "https://thehub.io/startups/acme",
                "thehub.io",
            )
            .await
            .unwrap();
        assert!(matches!(outcome, GateOutcome::Duplicate));

        assert_eq!(store.count_companies().await.unwrap(), 1);
        assert_eq!(store.count_leads().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_gate_lead_carries_source_and_notes() {
        let store = MemoryStore::new();
        let gate = PersistGate::new(&store, &store);

        let mut c = candidate("Acme", None);
        c.description = Some("Solar panels for apartment buildings".to_string());

        let outcome = gate
            .persist_candidate(c, "https://thehub.io/startups/acme", "thehub.io")
            .await
            .unwrap();

        let GateOutcome::Created { lead, .. } = outcome else {
            panic!("expected creation");
        };
        assert_eq!(lead.source.as_deref(), Some("thehub.io"));
        let notes = lead.notes.unwrap();
        assert!(notes.contains("Scraped from https://thehub.io/startups/acme"));
        assert!(notes.contains("Solar panels"));
    }

    #[test]
    fn test_seed_notes_truncation() {
        let long = "x".repeat(3000);
        let notes = seed_notes("https://a", Some(&long));
        assert_eq!(notes.len(), MAX_NOTES_LEN);
    }
}
