//! Listing-page pagination and detail-URL discovery.

use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::fetch::PageFetcher;

/// Path shapes that identify company detail pages on the listing site.
static DETAIL_PATH_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"/companies/[^/"'\s]+/[^"'\s]+"#).unwrap(),
        Regex::new(r#"/startups/[^"'\s]+"#).unwrap(),
        Regex::new(r#"/company/[^"'\s]+"#).unwrap(),
    ]
});

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href=["']([^"']+)["']"#).unwrap());
static DETAIL_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/(companies|startups|company)/").unwrap());

/// Walks listing pages 1..=ceiling and accumulates detail-page URLs.
pub struct ListingPaginator<'a> {
    fetcher: &'a dyn PageFetcher,
    config: &'a ScraperConfig,
}

/// Outcome of a pagination walk.
#[derive(Debug)]
pub struct DiscoveredUrls {
    /// Order-preserving, de-duplicated detail-page paths/URLs.
    pub urls: Vec<String>,
    /// Listing pages actually fetched.
    pub pages_processed: usize,
    /// Whether the very first listing-page fetch failed.
    ///
    /// Only this failure aborts a job; later page failures end
    /// pagination with whatever was already collected.
    pub first_page_failed: bool,
}

impl<'a> ListingPaginator<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, config: &'a ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    /// Walk page numbers 1..=`max_pages`, reporting running progress
    /// after every page via `on_progress(urls_found_so_far)`.
    pub async fn discover<F>(
        &self,
        base_url: &str,
        max_pages: usize,
        mut on_progress: F,
    ) -> DiscoveredUrls
    where
        F: FnMut(usize),
    {
        let mut urls: IndexSet<String> = IndexSet::new();
        let mut pages_processed = 0;
        let mut first_page_failed = false;

        for page in 1..=max_pages {
            let page_url = page_url(base_url, page);

            let fetched = match self.fetcher.fetch(&page_url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %page_url, error = %e, "listing page fetch failed, stopping pagination");
                    if page == 1 {
                        first_page_failed = true;
                    }
                    break;
                }
            };
            pages_processed += 1;

            let before = urls.len();
            for url in extract_detail_urls(&fetched.html) {
                urls.insert(url);
            }
            let new_urls = urls.len() - before;
            debug!(page, new_urls, total = urls.len(), "listing page processed");

            on_progress(urls.len());

            // End-of-results heuristic: a page that contributes nothing
            // new means the listing ran out.
            if new_urls == 0 {
                info!(page, "no new detail URLs, stopping early");
                break;
            }

            if page < max_pages && !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        DiscoveredUrls {
            urls: urls.into_iter().collect(),
            pages_processed,
            first_page_failed,
        }
    }
}

/// Page 1 uses the bare URL; later pages append a page query parameter.
pub fn page_url(base_url: &str, page: usize) -> String {
    if page <= 1 {
        return base_url.to_string();
    }
    if base_url.contains('?') {
        format!("{}&page={}", base_url, page)
    } else {
        format!("{}?page={}", base_url, page)
    }
}

/// Extract candidate detail-page URLs from listing markup.
///
/// Combines raw path-pattern scanning with href attribute extraction,
/// then cleans each hit: strip quote characters, drop query/fragment,
/// reject `javascript:` and implausibly short paths.
pub fn extract_detail_urls(html: &str) -> Vec<String> {
    let mut found: IndexSet<String> = IndexSet::new();

    for re in DETAIL_PATH_RES.iter() {
        for m in re.find_iter(html) {
            if let Some(clean) = clean_url(m.as_str()) {
                found.insert(clean);
            }
        }
    }

    for cap in HREF_RE.captures_iter(html) {
        if let Some(href) = cap.get(1) {
            let href = href.as_str();
            if DETAIL_HREF_RE.is_match(href) {
                if let Some(clean) = clean_url(href) {
                    found.insert(clean);
                }
            }
        }
    }

    found.into_iter().collect()
}

fn clean_url(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '"' | '\'' | '<' | '>')).collect();
    let cleaned = cleaned
        .split('?')
        .next()
        .unwrap_or("")
        .split('#')
        .next()
        .unwrap_or("")
        .to_string();

    if cleaned.len() > 10 && !cleaned.contains("javascript:") {
        Some(cleaned)
    } else {
        None
    }
}

/// Resolve a discovered path against the listing site origin.
pub fn absolutize(detail_url: &str, base_url: &str) -> String {
    if detail_url.starts_with("http") {
        return detail_url.to_string();
    }
    match url::Url::parse(base_url) {
        Ok(base) => base
            .join(detail_url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| detail_url.to_string()),
        Err(_) => detail_url.to_string(),
    }
}
