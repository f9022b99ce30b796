//! Pipeline configuration.

use std::time::Duration;

/// Tunables for the scrape pipeline.
///
/// Defaults match the observed behavior of the production crawler:
/// sequential fetches with small courtesy delays, a hard cap on items
/// per job, and a bounded timeout on the secondary/enrichment path.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Desktop-browser user agent (sites reject default client identifiers).
    pub user_agent: String,

    /// Timeout for primary listing/detail fetches.
    pub fetch_timeout: Duration,

    /// Timeout for secondary lookups during enrichment.
    pub enrichment_timeout: Duration,

    /// Delay between listing-page fetches.
    pub page_delay: Duration,

    /// Delay after each detail-page fetch.
    pub detail_delay: Duration,

    /// Delay between persisted items.
    pub item_delay: Duration,

    /// Ceiling on listing pages walked per job.
    pub max_pages: usize,

    /// Ceiling on detail items processed per job.
    pub max_items: usize,

    /// Ceiling on leads created from a single general-page scrape.
    pub max_leads_per_page: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            fetch_timeout: Duration::from_secs(30),
            enrichment_timeout: Duration::from_secs(5),
            page_delay: Duration::from_millis(300),
            detail_delay: Duration::from_millis(200),
            item_delay: Duration::from_millis(500),
            max_pages: 10,
            max_items: 50,
            max_leads_per_page: 10,
        }
    }
}

impl ScraperConfig {
    /// Config with all delays zeroed, for tests.
    pub fn without_delays() -> Self {
        Self {
            page_delay: Duration::ZERO,
            detail_delay: Duration::ZERO,
            item_delay: Duration::ZERO,
            ..Default::default()
        }
    }
}
