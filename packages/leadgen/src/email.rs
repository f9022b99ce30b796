//! Outreach-email template rendering.

use std::collections::BTreeMap;

use crate::records::Lead;

/// Substitute `{{token}}` placeholders from a flat key/value map.
///
/// Every known key is replaced globally; a key whose value is empty
/// substitutes an empty string. Tokens for keys absent from the map are
/// left untouched, never an error.
pub fn render_template(template: &str, values: &BTreeMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in values {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// The standard substitution map for one lead.
///
/// Keys: `first_name`, `last_name`, `full_name`, `email`, `company`,
/// `job_title`. Missing lead fields become empty strings.
pub fn lead_template_values(lead: &Lead) -> BTreeMap<String, String> {
    let first = lead.first_name.clone().unwrap_or_default();
    let last = lead.last_name.clone().unwrap_or_default();
    let full_name = format!("{} {}", first, last).trim().to_string();

    BTreeMap::from([
        ("first_name".to_string(), first),
        ("last_name".to_string(), last),
        ("full_name".to_string(), full_name),
        ("email".to_string(), lead.email.clone().unwrap_or_default()),
        (
            "company".to_string(),
            lead.company_name.clone().unwrap_or_default(),
        ),
        (
            "job_title".to_string(),
            lead.job_title.clone().unwrap_or_default(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CandidateRecord, Company};

    #[test]
    fn test_render_replaces_all_occurrences() {
        let values = BTreeMap::from([("company".to_string(), "Acme".to_string())]);
        assert_eq!(
            render_template("{{company}} loves {{company}}", &values),
            "Acme loves Acme"
        );
    }

    #[test]
    fn test_empty_value_renders_empty() {
        let values = BTreeMap::from([("first_name".to_string(), String::new())]);
        assert_eq!(render_template("Hi {{first_name}}!", &values), "Hi !");
    }

    #[test]
    fn test_unknown_token_left_alone() {
        let values = BTreeMap::new();
        assert_eq!(render_template("Hi {{nickname}}", &values), "Hi {{nickname}}");
    }

    #[test]
    fn test_lead_values_cover_standard_keys() {
        let company = Company::from_candidate(CandidateRecord::name_only("Acme"), "https://a");
        let mut lead = Lead::for_company(&company, Some("j@acme.se".into()), "manual", "n");
        lead.first_name = Some("Jane".into());

        let values = lead_template_values(&lead);
        assert_eq!(values["first_name"], "Jane");
        assert_eq!(values["full_name"], "Jane");
        assert_eq!(values["last_name"], "");
        assert_eq!(values["company"], "Acme");
        assert_eq!(
            render_template("{{full_name}} <{{email}}>", &values),
            "Jane <j@acme.se>"
        );
    }
}
