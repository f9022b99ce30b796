//! Prompt construction for the enrichment tasks.
//!
//! Prompts always demand a strict JSON object with a fixed key set;
//! lenient parsing on the way back handles the models that ignore that.

use deepseek_client::Message;

/// Context fed to a prompt is truncated to this many characters.
pub const MAX_CONTEXT_LEN: usize = 4000;

/// One entry of the service catalog.
#[derive(Debug, Clone, Copy)]
pub struct ServiceInfo {
    /// Stable key the suggestion contract refers to services by.
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Service catalog pitched in analysis prompts and ranked by the
/// suggestion flow.
pub const SERVICES: &[ServiceInfo] = &[
    ServiceInfo {
        key: "socialMedia",
        name: "Social Media Management",
        description: "Complete social media presence management including content creation, scheduling, engagement, and analytics",
    },
    ServiceInfo {
        key: "leadGeneration",
        name: "Lead Generation",
        description: "AI-powered lead generation, prospecting, and qualification services",
    },
    ServiceInfo {
        key: "contentManagement",
        name: "Content Generation & Management",
        description: "Blog posts, articles, newsletters, and content strategy with AI assistance",
    },
    ServiceInfo {
        key: "customerSupport",
        name: "Customer Support & Ticket Management",
        description: "24/7 customer support, ticket resolution, and help desk management",
    },
    ServiceInfo {
        key: "paymentVerification",
        name: "Payment Verification & Refunds",
        description: "Payment processing verification, refund management, and fraud prevention",
    },
    ServiceInfo {
        key: "communityManagement",
        name: "Community & Forum Management",
        description: "Forum moderation, community building, and user engagement",
    },
    ServiceInfo {
        key: "dataEntry",
        name: "Data Entry & Processing",
        description: "Accurate data entry, processing, and database management",
    },
    ServiceInfo {
        key: "virtualAssistant",
        name: "Virtual Assistant Services",
        description: "Email management, scheduling, research, and administrative support",
    },
];

/// Catalog entry by its stable key.
pub fn service_by_key(key: &str) -> Option<&'static ServiceInfo> {
    SERVICES.iter().find(|s| s.key == key)
}

fn services_list() -> String {
    SERVICES
        .iter()
        .map(|s| format!("- {}: {}", s.name, s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn keyed_services_list() -> String {
    SERVICES
        .iter()
        .map(|s| format!("{}: {} - {}", s.key, s.name, s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate prompt context on a char boundary.
pub fn truncate_context(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

/// Company analysis prompt: what they do and which services fit.
pub fn company_analysis(
    name: &str,
    description: &str,
    industry: Option<&str>,
    website: Option<&str>,
) -> Vec<Message> {
    let prompt = format!(
        "Analyze this Scandinavian company and suggest how Outrinsic can help them:\n\n\
         Company: {name}\n\
         Industry: {industry}\n\
         Website: {website}\n\
         Description: {description}\n\n\
         Outrinsic offers these services with resources in India and Indonesia at competitive rates:\n\
         {services}\n\n\
         Provide a JSON response with:\n\
         1. \"summary\": Brief 2-3 sentence summary of what the company does\n\
         2. \"painPoints\": Array of 3-4 likely pain points or challenges they face\n\
         3. \"suggestedServices\": Array of top 3 most relevant services from our list\n\
         4. \"proposalPoints\": Array of 3-4 specific value propositions for this company\n\
         5. \"outreachAngle\": Best angle to approach this company (1-2 sentences)\n\n\
         Return ONLY valid JSON, no markdown.",
        name = name,
        industry = industry.unwrap_or("Unknown"),
        website = website.unwrap_or("Not provided"),
        description = truncate_context(
            if description.is_empty() {
                "No description available"
            } else {
                description
            },
            MAX_CONTEXT_LEN
        ),
        services = services_list(),
    );

    vec![
        Message::system(
            "You are a business analyst specializing in B2B sales for service companies. \
             Analyze companies and suggest relevant services. Always respond with valid JSON only.",
        ),
        Message::user(prompt),
    ]
}

/// Lead analysis prompt: profile and sales guidance for one person.
pub fn lead_analysis(
    first_name: &str,
    last_name: &str,
    company_name: &str,
    job_title: &str,
    email: &str,
    notes: &str,
    company_info: &str,
) -> Vec<Message> {
    let prompt = format!(
        "Analyze this lead and provide sales insights:\n\n\
         Contact: {first_name} {last_name}\n\
         Title: {title}\n\
         Company: {company}\n\
         Email: {email}\n\
         Notes: {notes}\n\
         Company Info: {info}\n\n\
         Outrinsic offers operational services (customer support, social media, content, \
         lead gen) with resources in India & Indonesia at 60-70% cost savings.\n\n\
         Provide JSON with:\n\
         1. \"summary\": 2-3 sentence lead profile\n\
         2. \"recommendedApproach\": Best way to approach this person\n\
         3. \"talkingPoints\": Array of 3-4 specific talking points\n\
         4. \"objectionHandling\": Array of 2-3 likely objections and responses\n\
         5. \"nextSteps\": Array of recommended next actions\n\n\
         Return ONLY valid JSON.",
        first_name = first_name,
        last_name = last_name,
        title = if job_title.is_empty() { "Unknown" } else { job_title },
        company = if company_name.is_empty() { "Unknown" } else { company_name },
        email = if email.is_empty() { "Not provided" } else { email },
        notes = if notes.is_empty() { "None" } else { notes },
        info = truncate_context(
            if company_info.is_empty() {
                "No additional info"
            } else {
                company_info
            },
            MAX_CONTEXT_LEN
        ),
    );

    vec![
        Message::system(
            "You are a sales coach and lead analyst. Provide actionable insights for B2B sales. \
             Always respond with valid JSON only.",
        ),
        Message::user(prompt),
    ]
}

/// Outreach email prompt.
pub fn personalized_email(
    company_name: &str,
    contact_name: &str,
    company_info: &str,
    suggested_services: &[String],
    proposal_points: &[String],
) -> Vec<Message> {
    let prompt = format!(
        "Generate a personalized cold outreach email for:\n\n\
         Company: {company}\n\
         Contact: {contact}\n\
         Company Info: {info}\n\
         Suggested Services: {services}\n\
         Value Propositions: {points}\n\n\
         About Outrinsic:\n\
         - We provide AI MVP development and operational services\n\
         - We have skilled resources in India and Indonesia\n\
         - We offer 60-70% cost savings compared to local hiring\n\
         - Services include: customer support, social media, content, lead generation, \
         payment verification, community management\n\n\
         Guidelines:\n\
         - Keep it short (under 150 words)\n\
         - Be conversational and authentic, not salesy\n\
         - Reference something specific about their company\n\
         - Clear CTA to schedule a call\n\
         - Professional but friendly tone\n\n\
         Return JSON with \"subject\" and \"body\" (HTML formatted). Return ONLY valid JSON.",
        company = company_name,
        contact = if contact_name.is_empty() { "there" } else { contact_name },
        info = truncate_context(company_info, MAX_CONTEXT_LEN),
        services = suggested_services.join(", "),
        points = proposal_points.join("; "),
    );

    vec![
        Message::system(
            "You are an expert cold email copywriter. Write personalized, high-converting \
             outreach emails. Always respond with valid JSON only.",
        ),
        Message::user(prompt),
    ]
}

/// Service-ranking prompt: order the catalog by fit for one company.
pub fn service_suggestions(
    company_name: &str,
    description: &str,
    industry: Option<&str>,
) -> Vec<Message> {
    let prompt = format!(
        "Based on this company, rank our services by relevance:\n\n\
         Company: {company}\n\
         Industry: {industry}\n\
         Description: {description}\n\n\
         Our services:\n{services}\n\n\
         Return a JSON array of objects with \"service\" (service key), \"relevance\" (1-10), \
         and \"reason\" (why it's relevant).\n\
         Order by relevance descending. Return top 5 services.\n\
         Return ONLY valid JSON array.",
        company = company_name,
        industry = industry.unwrap_or("Unknown"),
        description = truncate_context(description, MAX_CONTEXT_LEN),
        services = keyed_services_list(),
    );

    vec![
        Message::system(
            "You are a B2B sales strategist. Analyze companies and match them with relevant \
             services. Respond with valid JSON only.",
        ),
        Message::user(prompt),
    ]
}

/// Website summarization prompt: structured profile from raw site text.
pub fn company_profile(company_name: &str, website_content: &str) -> Vec<Message> {
    let prompt = format!(
        "Analyze this company website content and extract information:\n\n\
         Company: {company}\n\
         Website Content:\n{content}\n\n\
         Extract and return JSON with:\n\
         1. \"description\": What the company does (2-3 sentences)\n\
         2. \"industry\": Primary industry/sector\n\
         3. \"services\": Array of their products/services\n\
         4. \"targetMarket\": Who they serve\n\
         5. \"companySize\": Estimated size (startup, small, medium, large)\n\
         6. \"relevantServices\": Which of our services would help them (from: \
         Social Media Management, Lead Generation, Content Generation, Customer Support, \
         Payment Verification, Community Management, Data Entry, Virtual Assistant)\n\n\
         Return ONLY valid JSON.",
        company = company_name,
        content = truncate_context(website_content, MAX_CONTEXT_LEN),
    );

    vec![
        Message::system(
            "You are a business analyst. Extract structured information from company websites. \
             Always respond with valid JSON only.",
        ),
        Message::user(prompt),
    ]
}

/// Contact extraction prompt over pooled website text.
pub fn contact_extraction(company_name: &str, pooled_text: &str) -> Vec<Message> {
    let prompt = format!(
        "Extract decision-maker contacts for this company from its website content:\n\n\
         Company: {company}\n\
         Website Content:\n{content}\n\n\
         Provide JSON with:\n\
         1. \"ceo\": CEO or founder name if identifiable, else null\n\
         2. \"ceoEmail\": Their email if present, else null\n\
         3. \"ceoLinkedin\": Their LinkedIn URL if present, else null\n\
         4. \"contacts\": Array of {{\"name\", \"title\", \"email\", \"linkedin\"}} for other people found\n\
         5. \"companyInsights\": Notable facts useful for outreach\n\
         6. \"recommendedApproach\": Best way to reach the decision maker\n\
         7. \"talkingPoints\": Array of 2-3 personalized talking points\n\n\
         Return ONLY valid JSON.",
        company = company_name,
        content = truncate_context(pooled_text, MAX_CONTEXT_LEN),
    );

    vec![
        Message::system(
            "You are a research assistant extracting contact information from website text. \
             Always respond with valid JSON only.",
        ),
        Message::user(prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_bounded() {
        let long = "x".repeat(20_000);
        let messages = company_analysis("Acme", &long, None, None);
        assert!(messages[1].content.len() < 10_000);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "aä".repeat(3000);
        let cut = truncate_context(&text, MAX_CONTEXT_LEN);
        assert!(cut.len() <= MAX_CONTEXT_LEN);
        assert!(text.is_char_boundary(cut.len()));
    }

    #[test]
    fn test_service_lookup_by_key() {
        assert_eq!(
            service_by_key("customerSupport").map(|s| s.name),
            Some("Customer Support & Ticket Management")
        );
        assert!(service_by_key("bespokeYachts").is_none());
    }

    #[test]
    fn test_suggestion_prompt_lists_service_keys() {
        let messages = service_suggestions("Acme", "Lab robots.", None);
        assert!(messages[1].content.contains("socialMedia:"));
        assert!(messages[1].content.contains("virtualAssistant:"));
    }

    #[test]
    fn test_prompts_carry_system_then_user() {
        let messages = lead_analysis("Jane", "Doe", "Acme", "", "", "", "");
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("Jane Doe"));
        assert!(messages[1].content.contains("Title: Unknown"));
    }
}
