//! Secondary contact search: re-fetch the company's web presence and
//! pattern-extract the likely decision maker.

use regex::Regex;
use std::sync::LazyLock;
use tokio::time::timeout;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::extract::html_to_text;
use crate::fetch::PageFetcher;

/// Sub-pages worth guessing on a company site.
const SUB_PAGES: &[&str] = &["/about", "/team", "/contact"];

/// Per-page contribution to the pooled context.
const MAX_PAGE_TEXT: usize = 2000;

// Name adjacent to a leadership title, in both orders. Scandinavian
// names carry å/ä/ö/ø/æ so the classes are wider than ASCII.
static NAME_THEN_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([A-ZÅÄÖØÆ][a-zåäöøæé]+(?:\s[A-ZÅÄÖØÆ][a-zåäöøæé]+)+)\s*[,|\-]?\s*(?i:CEO|Chief Executive Officer|Founder)",
    )
    .unwrap()
});
static TITLE_THEN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i:CEO|Chief Executive Officer|Founder)[:,|\s\-]+([A-ZÅÄÖØÆ][a-zåäöøæé]+(?:\s[A-ZÅÄÖØÆ][a-zåäöøæé]+)+)",
    )
    .unwrap()
});

/// Pooled result of the targeted re-fetch.
#[derive(Debug, Default)]
pub struct ContactSearchContext {
    /// Concatenated text of every page that answered.
    pub pooled_text: String,
    /// CEO/founder name found by adjacency patterns, if any.
    pub ceo_name: Option<String>,
    /// Pages that actually contributed text.
    pub pages_fetched: usize,
}

/// Re-fetches a company's website and a few guessed sub-pages, pooling
/// everything for pattern extraction and as prompt context.
pub struct ContactSearcher<'a> {
    fetcher: &'a dyn PageFetcher,
    config: &'a ScraperConfig,
}

impl<'a> ContactSearcher<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, config: &'a ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    /// Gather context for one company.
    ///
    /// Every fetch is bounded by the enrichment timeout and best-effort;
    /// an unreachable page just contributes nothing.
    pub async fn gather(&self, company_name: &str, website: Option<&str>) -> ContactSearchContext {
        let mut targets: Vec<String> = Vec::new();

        if let Some(site) = website {
            let site = site.trim_end_matches('/');
            targets.push(site.to_string());
            for sub in SUB_PAGES {
                targets.push(format!("{}{}", site, sub));
            }
        }
        targets.push(guessed_listing_url(company_name));

        let mut context = ContactSearchContext::default();
        for url in &targets {
            let fetched = match timeout(self.config.enrichment_timeout, self.fetcher.fetch(url)).await
            {
                Ok(Ok(page)) => page,
                _ => continue,
            };
            context.pages_fetched += 1;

            let mut text = html_to_text(&fetched.html);
            if text.len() > MAX_PAGE_TEXT {
                let mut cut = MAX_PAGE_TEXT;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            if !context.pooled_text.is_empty() {
                context.pooled_text.push('\n');
            }
            context.pooled_text.push_str(&text);
        }

        context.ceo_name = find_ceo_name(&context.pooled_text);
        debug!(
            company = %company_name,
            pages = context.pages_fetched,
            ceo_found = context.ceo_name.is_some(),
            "contact search context gathered"
        );
        context
    }
}

/// Guess the company's listing-site detail URL from its name.
pub fn guessed_listing_url(company_name: &str) -> String {
    let slug = company_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("https://thehub.io/startups/{}", slug)
}

/// CEO/founder name via title adjacency, checked in both orders.
pub fn find_ceo_name(text: &str) -> Option<String> {
    NAME_THEN_TITLE_RE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .or_else(|| TITLE_THEN_NAME_RE.captures(text).and_then(|cap| cap.get(1)))
        .map(|m| m.as_str().trim().to_string())
}
