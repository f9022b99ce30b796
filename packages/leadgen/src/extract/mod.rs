//! Heuristic text and signal extraction from raw markup.
//!
//! Everything in this module is a pure function over `&str`: no network
//! access, no state. Malformed HTML degrades to empty results, never an
//! error. The pipeline needs a handful of signals from arbitrary markup,
//! not a full DOM, so plain regex scanning is enough.

pub mod signals;
pub mod text;

pub use signals::{
    company_name_from_url, extract_emails, extract_linkedin_url, extract_phones,
    extract_twitter_url, PageSignals,
};
pub use text::{extract_meta_description, extract_title, first_paragraph, html_to_text};
