//! Typed signal harvesting: emails, phones, social links, URL-derived names.

use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+\.\w{2,}").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[-.\s]?)?\(?\d{2,4}\)?[-.\s]?\d{2,4}[-.\s]?\d{2,4}[-.\s]?\d{0,4}")
        .unwrap()
});
static LINKEDIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href=["'](https?://(?:www\.)?linkedin\.com/company/[^"']+)["']"#).unwrap()
});
static TWITTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href=["'](https?://(?:www\.)?(?:twitter|x)\.com/[^"']+)["']"#).unwrap()
});

/// Domains that produce false-positive email matches: documentation
/// placeholders, error-monitoring beacons, bundler artifacts.
const EMAIL_BLOCKLIST: &[&str] = &["example.", "@sentry", "webpack"];

/// Maximum plausible email length; longer matches are minified-JS noise.
const MAX_EMAIL_LEN: usize = 100;

/// All typed signals harvested from one page.
#[derive(Debug, Clone, Default)]
pub struct PageSignals {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
}

impl PageSignals {
    /// Harvest every signal type from raw markup.
    ///
    /// `html` is used for href-based signals, the stripped `text` for
    /// emails and phones (tag attributes are full of lookalike noise).
    pub fn harvest(html: &str, text: &str, email_cap: usize) -> Self {
        Self {
            emails: extract_emails(text, email_cap),
            phones: extract_phones(text),
            linkedin_url: extract_linkedin_url(html),
            twitter_url: extract_twitter_url(html),
        }
    }
}

/// Extract plausible contact emails in order of first appearance.
///
/// Placeholder and build-tool addresses are rejected, duplicates are
/// dropped, and the result is capped to `cap` entries.
pub fn extract_emails(text: &str, cap: usize) -> Vec<String> {
    let mut seen: IndexSet<String> = IndexSet::new();
    for m in EMAIL_RE.find_iter(text) {
        let email = m.as_str();
        if email.len() >= MAX_EMAIL_LEN {
            continue;
        }
        if EMAIL_BLOCKLIST.iter().any(|b| email.contains(b)) {
            continue;
        }
        seen.insert(email.to_string());
        if seen.len() >= cap {
            break;
        }
    }
    seen.into_iter().collect()
}

/// Extract loosely-delimited phone numbers.
///
/// A match is accepted only if its digit-only length is within [8, 15].
pub fn extract_phones(text: &str) -> Vec<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| {
            let digits = p.chars().filter(|c| c.is_ascii_digit()).count();
            (8..=15).contains(&digits)
        })
        .collect()
}

/// First LinkedIn company-page link in the markup.
pub fn extract_linkedin_url(html: &str) -> Option<String> {
    LINKEDIN_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// First Twitter/X profile link in the markup.
pub fn extract_twitter_url(html: &str) -> Option<String> {
    TWITTER_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

/// Infer a display name from the last path segment of a URL.
///
/// `https://site.tld/startups/green-energy-ab` becomes `"Green Energy Ab"`.
/// Used as a fallback when no page-derived name exists.
pub fn company_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let slug = trimmed.rsplit('/').next().unwrap_or(trimmed);
    slug.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
