//! HTTP route handlers.

pub mod ai;
pub mod companies;
pub mod emails;
pub mod leads;
pub mod scraper;

pub use ai::{generate_email, suggest_services};
pub use companies::analyze_company;
pub use emails::preview_email;
pub use leads::{analyze_lead, enrich_lead, find_contacts};
pub use scraper::{get_job, recent_jobs, submit_job};
