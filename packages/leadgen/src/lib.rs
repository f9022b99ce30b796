//! Lead-generation scrape and enrichment pipeline.
//!
//! The pipeline walks a startup-listing site (or a single arbitrary
//! page), harvests company signals with regex heuristics, persists
//! deduplicated companies and leads, and tracks the whole run as a
//! pollable background job. A separate enrichment layer calls the
//! DeepSeek completion service for analysis, contact discovery, and
//! outreach-email drafts.
//!
//! # Architecture
//!
//! - [`fetch`]: one-shot HTTP page fetching behind the [`PageFetcher`] trait
//! - [`extract`]: pure text/signal extraction from raw markup
//! - [`paginate`]: listing-page walking and detail-URL discovery
//! - [`harvest`]: detail pages into [`CandidateRecord`]s
//! - [`dedup`]: check-then-act persistence behind the [`PersistGate`]
//! - [`job`]: the [`ScrapeJob`] state machine and [`JobController`]
//! - [`ai`]: enrichment orchestration over the completion service
//! - [`store`]: persistence traits plus the in-memory implementation

pub mod ai;
pub mod config;
pub mod dedup;
pub mod email;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod harvest;
pub mod job;
pub mod paginate;
pub mod records;
pub mod store;
pub mod testing;

pub use ai::{
    ChatCompletion, CompanyAnalysis, CompanyProfile, ContactReport, EmailDraft,
    EnrichmentOrchestrator, LeadAnalysis, ServiceSuggestion,
};
pub use config::ScraperConfig;
pub use dedup::{GateOutcome, PersistGate};
pub use error::{FetchError, Result, ScrapeError, StoreError};
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use harvest::DetailHarvester;
pub use job::{JobController, JobKind, JobStatus, ResultSummary, ScrapeJob};
pub use paginate::{DiscoveredUrls, ListingPaginator};
pub use records::{CandidateRecord, Company, Lead};
pub use store::{CompanyStore, JobStore, LeadStore, MemoryStore};
