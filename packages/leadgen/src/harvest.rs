//! Per-item detail-page harvesting into candidate records.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::extract::{
    company_name_from_url, extract_linkedin_url, extract_meta_description, html_to_text,
    PageSignals,
};
use crate::fetch::PageFetcher;
use crate::records::CandidateRecord;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<h1[^>]*>([^<]+)</h1>").unwrap());
static JSON_LD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""name"\s*:\s*"([^"]{2,120})""#).unwrap());
static WEBSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)href=["'](https?://[^"']+)["'][^>]*>[^<]*(?:website|visit|homepage)[^<]*"#,
    )
    .unwrap()
});

/// Hosts that are never a company's own website: the listing site
/// itself and social platforms.
const WEBSITE_HOST_BLOCKLIST: &[&str] =
    &["thehub", "linkedin", "twitter", "facebook", "instagram"];
static INDUSTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:industry|sector|category)[:\s]+([A-Za-z\s&]{3,100})").unwrap());
static EMPLOYEE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:-\d+)?)\s*(?:employees|team members|people)").unwrap()
});
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:based in|located in|headquarters in)\s+([A-Za-z\s]{2,40})").unwrap()
});

/// Country segments that appear in listing-site detail paths.
const COUNTRY_SEGMENTS: &[(&str, &str)] = &[
    ("/sweden", "Sweden"),
    ("/norway", "Norway"),
    ("/denmark", "Denmark"),
    ("/finland", "Finland"),
];

/// Fetches one detail page and runs the extraction heuristics over it.
pub struct DetailHarvester<'a> {
    fetcher: &'a dyn PageFetcher,
    config: &'a ScraperConfig,
}

impl<'a> DetailHarvester<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, config: &'a ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    /// Build a candidate record for one detail URL.
    ///
    /// On fetch failure this returns a minimal record carrying only the
    /// URL-derived name; the pipeline never aborts because one detail
    /// page was unreachable.
    pub async fn harvest(&self, url: &str) -> CandidateRecord {
        let fallback_name = company_name_from_url(url);
        let fetched = self.fetcher.fetch(url).await;

        // The courtesy delay paces every fetch attempt, failed ones too.
        if !self.config.detail_delay.is_zero() {
            tokio::time::sleep(self.config.detail_delay).await;
        }

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "detail page unreachable, keeping URL-derived name");
                return CandidateRecord::name_only(fallback_name);
            }
        };

        let record = harvest_from_html(&page.html, url, fallback_name);
        debug!(url = %url, name = %record.name, has_email = record.email.is_some(), "detail harvested");
        record
    }
}

/// Pure extraction half of the harvester, split out for fixture tests.
pub fn harvest_from_html(html: &str, url: &str, fallback_name: String) -> CandidateRecord {
    let text = html_to_text(html);
    let signals = PageSignals::harvest(html, &text, 5);

    // Prefer a page-derived name: <h1> first, then JSON-LD "name".
    let name = H1_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| {
            JSON_LD_NAME_RE
                .captures(html)
                .and_then(|cap| cap.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .unwrap_or(fallback_name);

    let description = extract_meta_description(html);

    // External "company website" links only; same-origin navigation and
    // social profiles do not count.
    let website = WEBSITE_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|w| {
            let lower = w.to_lowercase();
            !WEBSITE_HOST_BLOCKLIST.iter().any(|h| lower.contains(h)) && !same_origin(w, url)
        });

    let industry = INDUSTRY_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| {
            let mut s = m.as_str().trim().to_string();
            s.truncate(100);
            s
        });

    let employee_count = EMPLOYEE_RE
        .captures(&text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string());

    let city = LOCATION_RE
        .captures(&text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string());

    CandidateRecord {
        name,
        description,
        email: signals.emails.into_iter().next(),
        phone: signals.phones.into_iter().next(),
        website,
        industry,
        employee_count,
        linkedin_url: signals.linkedin_url.or_else(|| extract_linkedin_url(html)),
        twitter_url: signals.twitter_url,
        city,
        country: country_from_url(url),
    }
}

/// Country inferred from the detail path, if it carries a country segment.
pub fn country_from_url(url: &str) -> Option<String> {
    let lower = url.to_lowercase();
    COUNTRY_SEGMENTS
        .iter()
        .find(|(segment, _)| lower.contains(segment))
        .map(|(_, country)| country.to_string())
}

fn same_origin(candidate: &str, page_url: &str) -> bool {
    match (url::Url::parse(candidate), url::Url::parse(page_url)) {
        (Ok(a), Ok(b)) => a.host_str() == b.host_str(),
        _ => false,
    }
}
