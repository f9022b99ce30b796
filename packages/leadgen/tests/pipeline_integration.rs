//! Integration tests for the scrape pipeline and enrichment flows.
//!
//! These drive the full path against mocks:
//! 1. Paginate a listing site
//! 2. Harvest detail pages
//! 3. Dedup and persist companies/leads
//! 4. Observe the job row move to a terminal state
//! 5. Enrich leads through the completion service

use std::sync::Arc;
use std::time::Duration;

use leadgen::testing::{MockChat, MockFetcher};
use leadgen::{
    Company, CompanyStore, EnrichmentOrchestrator, JobController, JobKind, JobStatus, JobStore,
    Lead, LeadStore, MemoryStore, ScraperConfig,
};

const BASE: &str = "https://thehub.io/startups";

fn listing_fixture() -> MockFetcher {
    let fetcher = MockFetcher::new();
    fetcher.add_page(
        BASE,
        r#"
        <a href="/startups/green-energy-ab">Green Energy</a>
        <a href="/startups/acme-labs">Acme Labs</a>
        <a href="/about">About</a>
        "#,
    );
    // Page 2 repeats page 1: zero new URLs, pagination must stop.
    fetcher.add_page(
        format!("{}?page=2", BASE),
        r#"<a href="/startups/green-energy-ab">Green Energy</a>"#,
    );
    fetcher.add_page(
        "https://thehub.io/startups/green-energy-ab",
        r#"
        <h1>Green Energy AB</h1>
        <meta name="description" content="Solar panels for apartment buildings in Sweden.">
        <p>Contact: info@greenenergy.se</p>
        "#,
    );
    fetcher.add_page(
        "https://thehub.io/startups/acme-labs",
        r#"<h1>Acme Labs</h1><p>We build lab robots. Reach us at hello@acmelabs.io</p>"#,
    );
    fetcher
}

fn controller(fetcher: MockFetcher) -> (Arc<MemoryStore>, JobController<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let controller = JobController::new(
        Arc::clone(&store),
        Arc::new(fetcher),
        ScraperConfig::without_delays(),
    );
    (store, controller)
}

#[tokio::test]
async fn test_listing_crawl_end_to_end() {
    let (store, controller) = controller(listing_fixture());

    let job = controller
        .run_to_completion(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.total_items, Some(2));
    assert_eq!(job.items_scraped, 2);
    assert_eq!(job.progress, 100);

    let summary: serde_json::Value =
        serde_json::from_str(job.result_summary.as_deref().unwrap()).unwrap();
    assert_eq!(summary["companiesFound"], 2);
    assert_eq!(summary["leadsCreated"], 2);
    assert_eq!(summary["emailsFound"], 2);
    assert_eq!(summary["totalProcessed"], 2);

    assert_eq!(store.count_companies().await.unwrap(), 2);
    assert_eq!(store.count_leads().await.unwrap(), 2);

    let green = store
        .find_company_by_name_or_source("Green Energy AB", "unused")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(green.email.as_deref(), Some("info@greenenergy.se"));
    assert!(green
        .description
        .as_deref()
        .unwrap()
        .contains("Solar panels"));
}

#[tokio::test]
async fn test_submitted_job_detaches_and_completes() {
    let (store, controller) = controller(listing_fixture());

    let job = controller
        .submit(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Running);

    // Poll like an HTTP client would.
    let mut finished = None;
    for _ in 0..200 {
        let current = store.get_job(job.id).await.unwrap().unwrap();
        if current.is_terminal() {
            finished = Some(current);
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let finished = finished.expect("job never reached a terminal state");
    assert_eq!(finished.status, JobStatus::Completed);
    assert_eq!(store.count_companies().await.unwrap(), 2);
}

#[tokio::test]
async fn test_rerun_does_not_duplicate_companies() {
    let (store, controller) = controller(listing_fixture());

    controller
        .run_to_completion(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();
    let second = controller
        .run_to_completion(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();

    assert_eq!(second.status, JobStatus::Completed);
    assert_eq!(store.count_companies().await.unwrap(), 2);
    assert_eq!(store.count_leads().await.unwrap(), 2);

    let summary: serde_json::Value =
        serde_json::from_str(second.result_summary.as_deref().unwrap()).unwrap();
    assert_eq!(summary["companiesFound"], 0);
}

#[tokio::test]
async fn test_first_listing_page_failure_fails_job() {
    let fetcher = MockFetcher::new();
    fetcher.fail_url(BASE);
    let (store, controller) = controller(fetcher);

    let job = controller
        .run_to_completion(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job
        .error_message
        .as_deref()
        .unwrap()
        .contains("listing page"));
    assert_eq!(store.count_companies().await.unwrap(), 0);
}

#[tokio::test]
async fn test_pagination_stops_when_no_new_urls() {
    let fetcher = listing_fixture();
    let store = Arc::new(MemoryStore::new());
    let controller = JobController::new(
        Arc::clone(&store),
        Arc::new(fetcher),
        ScraperConfig::without_delays(),
    );

    // A generous ceiling must not matter: page 2 contributes nothing new.
    let job = controller
        .run_to_completion(BASE, JobKind::ListingCrawl, Some(50))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.total_items, Some(2));
}

#[tokio::test]
async fn test_unreachable_detail_page_keeps_url_derived_name() {
    let fetcher = MockFetcher::new();
    fetcher.add_page(BASE, r#"<a href="/startups/green-energy-ab">x</a>"#);
    // Detail page intentionally not registered.
    let (store, controller) = controller(fetcher);

    let job = controller
        .run_to_completion(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    let company = store
        .find_company_by_name_or_source("Green Energy Ab", "unused")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(company.name, "Green Energy Ab");
    assert!(company.email.is_none());
    assert!(company.description.is_none());
}

#[tokio::test]
async fn test_single_page_job_creates_lead_per_email() {
    let fetcher = MockFetcher::new();
    fetcher.add_page(
        "https://acme.example/contact",
        r#"
        <title>Acme AB</title>
        <p>Sales: sales@acme.example</p>
        <p>Support: support@acme.example</p>
        "#,
    );
    let (store, controller) = controller(fetcher);

    let job = controller
        .run_to_completion("https://acme.example/contact", JobKind::SinglePage, None)
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(store.count_companies().await.unwrap(), 1);
    assert_eq!(store.count_leads().await.unwrap(), 2);

    let company = store
        .find_company_by_name_or_source("Acme AB", "unused")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(company.name, "Acme AB");
    let leads = store.leads_for_company(company.id);
    assert!(leads.iter().all(|l| l.source.as_deref() == Some("web_scrape")));
}

#[tokio::test]
async fn test_single_page_job_persists_page_signals() {
    let fetcher = MockFetcher::new();
    fetcher.add_page(
        "https://acme.example/contact",
        r#"
        <title>Acme AB</title>
        <p>Call us: +46 70 123 4567 or write sales@acme.example</p>
        <a href="https://www.linkedin.com/company/acme-ab">LinkedIn</a>
        <a href="https://x.com/acmeab">Follow us</a>
        <p>We build lab robots for biotech teams.</p>
        "#,
    );
    let (store, controller) = controller(fetcher);

    let job = controller
        .run_to_completion("https://acme.example/contact", JobKind::SinglePage, None)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let company = store
        .find_company_by_name_or_source("Acme AB", "unused")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        company.website.as_deref(),
        Some("https://acme.example/contact")
    );
    assert!(company.phone.is_some());
    assert_eq!(
        company.linkedin_url.as_deref(),
        Some("https://www.linkedin.com/company/acme-ab")
    );
    assert_eq!(company.twitter_url.as_deref(), Some("https://x.com/acmeab"));
    assert!(company
        .description
        .as_deref()
        .unwrap()
        .contains("lab robots"));
}

#[tokio::test]
async fn test_single_page_without_title_names_company_after_host() {
    let fetcher = MockFetcher::new();
    fetcher.add_page(
        "https://acme.example/contact",
        "<p>No title here, just hello@acme.example</p>",
    );
    let (store, controller) = controller(fetcher);

    let job = controller
        .run_to_completion("https://acme.example/contact", JobKind::SinglePage, None)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let company = store
        .find_company_by_name_or_source("acme.example", "unused")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(company.name, "acme.example");
}

#[tokio::test]
async fn test_single_page_fetch_failure_fails_job() {
    let fetcher = MockFetcher::new();
    fetcher.fail_url("https://down.example");
    let (_store, controller) = controller(fetcher);

    let job = controller
        .run_to_completion("https://down.example", JobKind::SinglePage, None)
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error_message.is_some());
}

#[tokio::test]
async fn test_terminal_job_rejects_late_updates() {
    let (store, controller) = controller(listing_fixture());
    let job = controller
        .run_to_completion(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();

    let mut stray = job.clone();
    stray.status = JobStatus::Running;
    stray.items_scraped = 999;
    store.update_job(stray).await.unwrap();

    let stored = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.items_scraped, job.items_scraped);
}

#[tokio::test]
async fn test_recent_jobs_listing() {
    let (store, controller) = controller(listing_fixture());
    controller
        .run_to_completion(BASE, JobKind::ListingCrawl, None)
        .await
        .unwrap();

    let jobs = store.list_recent_jobs(10).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert!(jobs[0].is_terminal());
}

// Enrichment flows.

async fn seeded_lead(store: &MemoryStore, email: Option<&str>) -> (Company, Lead) {
    let mut company = Company::from_candidate(
        leadgen::CandidateRecord {
            name: "Acme Labs".to_string(),
            description: Some("Lab robots for biotech.".to_string()),
            ..Default::default()
        },
        "https://thehub.io/startups/acme-labs",
    );
    company.website = Some("https://acmelabs.example".to_string());
    let company = store.insert_company(company).await.unwrap();
    let lead = store
        .insert_lead(Lead::for_company(
            &company,
            email.map(String::from),
            "thehub.io",
            "Scraped from listing",
        ))
        .await
        .unwrap();
    (company, lead)
}

fn orchestrator(
    store: Arc<MemoryStore>,
    chat: MockChat,
    fetcher: MockFetcher,
) -> EnrichmentOrchestrator<MemoryStore> {
    EnrichmentOrchestrator::new(
        store,
        Arc::new(chat),
        Arc::new(fetcher),
        ScraperConfig::without_delays(),
    )
}

#[tokio::test]
async fn test_lead_analysis_falls_back_on_non_json() {
    let store = Arc::new(MemoryStore::new());
    let (_company, lead) = seeded_lead(&store, Some("hi@acmelabs.example")).await;

    let chat = MockChat::new().with_response("I cannot help with that.");
    let orchestrator = orchestrator(Arc::clone(&store), chat, MockFetcher::new());

    let analysis = orchestrator.analyze_lead(lead.id).await.unwrap();

    // Deterministic fallback shape, never an error.
    assert!(analysis.summary.contains("Acme Labs"));
    assert_eq!(analysis.talking_points.len(), 3);

    let stored = store.get_lead(lead.id).await.unwrap().unwrap();
    assert_eq!(stored.ai_summary.as_deref(), Some(analysis.summary.as_str()));
    let approach: serde_json::Value =
        serde_json::from_str(stored.ai_recommended_approach.as_deref().unwrap()).unwrap();
    assert!(approach.get("talkingPoints").is_some());
}

#[tokio::test]
async fn test_company_analysis_stashes_raw_data() {
    let store = Arc::new(MemoryStore::new());
    let (company, _lead) = seeded_lead(&store, None).await;

    let chat = MockChat::new().with_response(
        r#"```json
{"summary": "Builds lab robots.", "painPoints": ["support"], "suggestedServices": ["Customer Support & Ticket Management"], "proposalPoints": ["save money"], "outreachAngle": "lead with automation"}
```"#,
    );
    let orchestrator = orchestrator(Arc::clone(&store), chat, MockFetcher::new());

    let analysis = orchestrator.analyze_company(company.id).await.unwrap();
    assert_eq!(analysis.summary, "Builds lab robots.");

    let stored = store.get_company(company.id).await.unwrap().unwrap();
    let raw: serde_json::Value = serde_json::from_str(stored.raw_data.as_deref().unwrap()).unwrap();
    assert_eq!(raw["aiAnalysis"]["summary"], "Builds lab robots.");
    assert!(raw.get("analyzedAt").is_some());
}

#[tokio::test]
async fn test_company_profile_from_website_text() {
    let store = Arc::new(MemoryStore::new());
    let (company, _lead) = seeded_lead(&store, None).await;

    let fetcher = MockFetcher::new();
    fetcher.add_page(
        "https://acmelabs.example",
        "<p>We build autonomous lab robots for biotech research teams.</p>",
    );

    let chat = MockChat::new().with_response(
        r#"{"description": "Builds lab robots.", "industry": "Biotech", "services": ["robots"], "targetMarket": "labs", "companySize": "startup", "relevantServices": ["Data Entry & Processing"]}"#,
    );
    let orchestrator = orchestrator(Arc::clone(&store), chat, fetcher);

    let profile = orchestrator.profile_company(company.id).await.unwrap();
    assert_eq!(profile.industry, "Biotech");
    assert_eq!(profile.company_size, "startup");
}

#[tokio::test]
async fn test_company_profile_falls_back_on_refusal() {
    let store = Arc::new(MemoryStore::new());
    let (company, _lead) = seeded_lead(&store, None).await;

    let chat = MockChat::new().with_response("Sorry, I can only answer questions.");
    let orchestrator = orchestrator(Arc::clone(&store), chat, MockFetcher::new());

    let profile = orchestrator.profile_company(company.id).await.unwrap();
    assert_eq!(profile.industry, "Unknown");
    assert!(!profile.relevant_services.is_empty());
}

#[tokio::test]
async fn test_contact_search_never_clobbers_existing_email() {
    let store = Arc::new(MemoryStore::new());
    let (_company, lead) = seeded_lead(&store, Some("kept@acmelabs.example")).await;

    let fetcher = MockFetcher::new();
    fetcher.add_page(
        "https://acmelabs.example",
        "<p>Our team is led by Erik Lindqvist, CEO.</p>",
    );

    let chat = MockChat::new().with_response(
        r#"{"ceo": "Erik Lindqvist", "ceoEmail": "different@acmelabs.example", "talkingPoints": ["robots"]}"#,
    );
    let orchestrator = orchestrator(Arc::clone(&store), chat, fetcher);

    let report = orchestrator.search_contacts(lead.id).await.unwrap();
    assert_eq!(report.ceo.as_deref(), Some("Erik Lindqvist"));

    let stored = store.get_lead(lead.id).await.unwrap().unwrap();
    // Existing contact data survives; empty name fields were filled.
    assert_eq!(stored.email.as_deref(), Some("kept@acmelabs.example"));
    assert_eq!(stored.first_name.as_deref(), Some("Erik"));
    assert_eq!(stored.job_title.as_deref(), Some("CEO"));
}

#[tokio::test]
async fn test_email_generation_reuses_stored_analysis() {
    let store = Arc::new(MemoryStore::new());
    let (company, lead) = seeded_lead(&store, Some("hi@acmelabs.example")).await;

    let mut company = company;
    company.raw_data = Some(
        serde_json::json!({
            "aiAnalysis": {
                "summary": "Builds lab robots.",
                "suggestedServices": ["Lead Generation"],
                "proposalPoints": ["scale outreach"],
            },
            "analyzedAt": "2026-08-01T00:00:00Z",
        })
        .to_string(),
    );
    store.update_company(company).await.unwrap();

    let chat = MockChat::new()
        .with_response(r#"{"subject": "Robots + growth", "body": "<p>Hi</p>"}"#);
    let orchestrator = orchestrator(Arc::clone(&store), chat, MockFetcher::new());

    let draft = orchestrator.generate_email(lead.id).await.unwrap();
    assert_eq!(draft.subject, "Robots + growth");
}

#[tokio::test]
async fn test_service_suggestions_enriched_with_catalog_details() {
    let chat = MockChat::new().with_response(
        r#"```json
[
  {"service": "leadGeneration", "relevance": 9, "reason": "Outbound-heavy sales motion"},
  {"service": "notARealService", "relevance": 2, "reason": "made up"}
]
```"#,
    );
    let orchestrator = orchestrator(Arc::new(MemoryStore::new()), chat, MockFetcher::new());

    let suggestions = orchestrator
        .suggest_services("Acme Labs", "Lab robots for biotech.", Some("Biotech"))
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].service, "leadGeneration");
    assert_eq!(suggestions[0].relevance, 9);
    let details = suggestions[0].service_details.as_ref().unwrap();
    assert_eq!(details.name, "Lead Generation");
    // Unknown catalog keys pass through without details.
    assert!(suggestions[1].service_details.is_none());
}

#[tokio::test]
async fn test_service_suggestions_fall_back_on_non_json() {
    let chat = MockChat::new().with_response("I'd be happy to help rank services!");
    let orchestrator = orchestrator(Arc::new(MemoryStore::new()), chat, MockFetcher::new());

    let suggestions = orchestrator
        .suggest_services("Acme Labs", "Lab robots.", None)
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0].service, "customerSupport");
    assert_eq!(suggestions[0].relevance, 8);
    // Fallback entries still get catalog details attached.
    assert!(suggestions
        .iter()
        .all(|s| s.service_details.is_some()));
}
