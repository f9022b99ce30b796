//! HTML-to-text stripping and document-level metadata.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static NAV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<nav[^>]*>.*?</nav>").unwrap());
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<header[^>]*>.*?</header>").unwrap());
static FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<footer[^>]*>.*?</footer>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").unwrap());
static META_DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name=["']description["'][^>]+content=["']([^"']+)["']"#).unwrap()
});
static OG_DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+property=["']og:description["'][^>]+content=["']([^"']+)["']"#)
        .unwrap()
});
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<p[^>]*>([^<]{50,500})</p>").unwrap());

/// Strip an HTML document down to visible plain text.
///
/// Removes script/style/nav/header/footer regions, strips remaining
/// tags, decodes common entities, and collapses whitespace.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = NAV_RE.replace_all(&text, " ");
    let text = HEADER_RE.replace_all(&text, " ");
    let text = FOOTER_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    WS_RE.replace_all(&text, " ").trim().to_string()
}

/// Decode the handful of entities that actually show up in scraped pages.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Extract the `<title>` text, if present.
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Extract a page description.
///
/// Priority order: `<meta name="description">`, then `og:description`,
/// then the first paragraph of 50-500 plain characters.
pub fn extract_meta_description(html: &str) -> Option<String> {
    if let Some(cap) = META_DESC_RE.captures(html) {
        return cap.get(1).map(|m| m.as_str().trim().to_string());
    }
    if let Some(cap) = OG_DESC_RE.captures(html) {
        return cap.get(1).map(|m| m.as_str().trim().to_string());
    }
    first_paragraph(html)
}

/// First `<p>` whose text content is between 50 and 500 characters.
pub fn first_paragraph(html: &str) -> Option<String> {
    PARAGRAPH_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}
