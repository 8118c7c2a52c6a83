use crate::domain::model::CleanedLead;
use serde::Serialize;

// Score weights, out of a 0-100 scale.
const WEIGHT_EMAIL_VALID: f64 = 15.0;
const WEIGHT_PHONE_VALID: f64 = 10.0;
const WEIGHT_HAS_LINKEDIN: f64 = 20.0;
const WEIGHT_HAS_COMPANY: f64 = 15.0;
const WEIGHT_HAS_JOB_TITLE: f64 = 10.0;
const WEIGHT_HAS_FULL_NAME: f64 = 10.0;
const WEIGHT_HAS_LOCATION: f64 = 5.0;
const WEIGHT_PER_SOCIAL_PROFILE: f64 = 5.0;
const WEIGHT_COMPLETENESS: f64 = 20.0;

const INDUSTRY_MODIFIERS: &[(&str, f64)] = &[
    ("Technology", 1.2),
    ("Financial Services", 1.1),
    ("Healthcare", 1.1),
    ("Consulting", 1.15),
    ("Marketing & Advertising", 1.1),
    ("Real Estate", 1.0),
    ("Education", 0.9),
    ("Non-Profit", 0.8),
    ("Government", 0.8),
];

// Ordered: only the first matching keyword applies.
const JOB_TITLE_MODIFIERS: &[(&str, f64)] = &[
    ("ceo", 1.5),
    ("cto", 1.4),
    ("cfo", 1.4),
    ("president", 1.4),
    ("founder", 1.3),
    ("director", 1.2),
    ("manager", 1.1),
    ("vp", 1.3),
    ("vice president", 1.3),
    ("head", 1.2),
    ("lead", 1.1),
    ("senior", 1.1),
];

const EXECUTIVE_TITLES: &[&str] = &["ceo", "cto", "cfo", "president", "founder"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadCategory {
    Cold,
    Warm,
    Hot,
    Qualified,
    Unqualified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySize {
    Enterprise,
    MediumBusiness,
    SmallBusiness,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadClassification {
    pub lead_score: f64,
    pub priority: LeadPriority,
    pub category: LeadCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size_estimate: Option<CompanySize>,
}

/// Weighted heuristic score over the cleaned fields, clamped to 0-100.
pub fn calculate_lead_score(lead: &CleanedLead) -> f64 {
    let mut score = 0.0;

    if lead.email_valid.unwrap_or(false) {
        score += WEIGHT_EMAIL_VALID;
    }
    if lead.phone_valid.unwrap_or(false) {
        score += WEIGHT_PHONE_VALID;
    }
    if lead.linkedin_url.is_some() {
        score += WEIGHT_HAS_LINKEDIN;
    }
    if lead.company.is_some() {
        score += WEIGHT_HAS_COMPANY;
    }
    if lead.job_title.is_some() {
        score += WEIGHT_HAS_JOB_TITLE;
    }
    if lead.full_name.is_some() || (lead.first_name.is_some() && lead.last_name.is_some()) {
        score += WEIGHT_HAS_FULL_NAME;
    }
    if lead.city.is_some() || lead.country.is_some() {
        score += WEIGHT_HAS_LOCATION;
    }

    score += lead.social_profiles_count as f64 * WEIGHT_PER_SOCIAL_PROFILE;
    score += data_completeness(lead) * WEIGHT_COMPLETENESS;

    if let Some(industry) = &lead.industry {
        if let Some((_, modifier)) = INDUSTRY_MODIFIERS
            .iter()
            .find(|(name, _)| *name == industry.as_str())
        {
            score *= modifier;
        }
    }

    if let Some(job_title) = &lead.job_title {
        let lower = job_title.to_lowercase();
        if let Some((_, modifier)) = JOB_TITLE_MODIFIERS
            .iter()
            .find(|(keyword, _)| lower.contains(*keyword))
        {
            score *= modifier;
        }
    }

    (score.clamp(0.0, 100.0) * 100.0).round() / 100.0
}

/// Fraction of the contact-relevant fields that are populated.
fn data_completeness(lead: &CleanedLead) -> f64 {
    let fields = [
        lead.email.is_some(),
        lead.phone.is_some() || lead.mobile.is_some(),
        lead.full_name.is_some() || (lead.first_name.is_some() && lead.last_name.is_some()),
        lead.company.is_some(),
        lead.job_title.is_some(),
        lead.industry.is_some(),
        lead.website.is_some(),
        lead.city.is_some(),
        lead.country.is_some(),
        lead.linkedin_url.is_some(),
    ];
    let populated = fields.iter().filter(|present| **present).count();
    populated as f64 / fields.len() as f64
}

pub fn classify_lead_priority(lead_score: f64, lead: &CleanedLead) -> LeadPriority {
    let job_title = lead.job_title.as_deref().unwrap_or("").to_lowercase();
    let high_value_count = [
        EXECUTIVE_TITLES.contains(&job_title.as_str()),
        lead.company.as_deref().is_some_and(|c| !c.is_empty()),
        lead.linkedin_url
            .as_deref()
            .is_some_and(|u| u.contains("linkedin.com")),
        lead.email_valid.unwrap_or(false),
    ]
    .iter()
    .filter(|hit| **hit)
    .count();

    if lead_score >= 80.0 || high_value_count >= 3 {
        LeadPriority::Urgent
    } else if lead_score >= 60.0 || high_value_count >= 2 {
        LeadPriority::High
    } else if lead_score >= 40.0 || high_value_count >= 1 {
        LeadPriority::Medium
    } else {
        LeadPriority::Low
    }
}

pub fn classify_lead_category(lead: &CleanedLead) -> LeadCategory {
    let score = calculate_lead_score(lead);
    let has_email = lead.email_valid.unwrap_or(false);
    let has_contact = has_email || lead.phone_valid.unwrap_or(false);
    let has_company = lead.company.is_some();
    let has_job_title = lead.job_title.is_some();
    let has_social = lead.social_profiles_count > 0;

    if has_contact && has_company && has_job_title && score >= 60.0 {
        LeadCategory::Qualified
    } else if has_email && has_social && score >= 70.0 {
        LeadCategory::Hot
    } else if has_contact && (has_company || has_social) && score >= 40.0 {
        LeadCategory::Warm
    } else if has_contact && score >= 20.0 {
        LeadCategory::Cold
    } else {
        LeadCategory::Unqualified
    }
}

/// Name-keyword guess at the company's size bracket.
pub fn classify_by_company_size(company_name: &str) -> Option<CompanySize> {
    const ENTERPRISE: &[&str] = &[
        "corporation",
        "corp",
        "inc",
        "incorporated",
        "ltd",
        "limited",
        "international",
        "global",
        "worldwide",
        "group",
        "holdings",
    ];
    const SMALL_BUSINESS: &[&str] = &[
        "llc",
        "consulting",
        "services",
        "solutions",
        "studio",
        "agency",
        "freelance",
        "independent",
        "boutique",
    ];

    let lower = company_name.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if ENTERPRISE.iter().any(|kw| lower.contains(kw)) {
        return Some(CompanySize::Enterprise);
    }
    if SMALL_BUSINESS.iter().any(|kw| lower.contains(kw)) {
        return Some(CompanySize::SmallBusiness);
    }
    Some(CompanySize::MediumBusiness)
}

pub fn classify_lead(lead: &CleanedLead) -> LeadClassification {
    let lead_score = calculate_lead_score(lead);
    LeadClassification {
        lead_score,
        priority: classify_lead_priority(lead_score, lead),
        category: classify_lead_category(lead),
        company_size_estimate: lead
            .company
            .as_deref()
            .and_then(classify_by_company_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_lead() -> CleanedLead {
        CleanedLead {
            full_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@engines.com".to_string()),
            email_valid: Some(true),
            phone: Some("+12125550182".to_string()),
            phone_valid: Some(true),
            company: Some("Analytical Engines Inc".to_string()),
            job_title: Some("CEO".to_string()),
            industry: Some("Technology".to_string()),
            website: Some("https://engines.com".to_string()),
            city: Some("London".to_string()),
            country: Some("UK".to_string()),
            linkedin_url: Some("https://linkedin.com/in/ada".to_string()),
            social_profiles_count: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_score_is_bounded() {
        let score = calculate_lead_score(&rich_lead());
        assert!(score > 80.0);
        assert!(score <= 100.0);

        let empty = calculate_lead_score(&CleanedLead::default());
        assert_eq!(empty, 0.0);
    }

    #[test]
    fn test_job_title_modifier_first_match_only() {
        let mut lead = rich_lead();
        // "Senior Manager" matches "manager" before "senior" in table order.
        lead.job_title = Some("Senior Manager".to_string());
        let managed = calculate_lead_score(&lead);
        lead.job_title = Some("Senior Engineer".to_string());
        let senior = calculate_lead_score(&lead);
        // manager (1.1) and senior (1.1) coincide in weight; both bounded.
        assert!(managed <= 100.0 && senior <= 100.0);
    }

    #[test]
    fn test_rich_lead_is_urgent_and_qualified() {
        let lead = rich_lead();
        let classification = classify_lead(&lead);
        assert_eq!(classification.priority, LeadPriority::Urgent);
        assert_eq!(classification.category, LeadCategory::Qualified);
        assert_eq!(
            classification.company_size_estimate,
            Some(CompanySize::Enterprise)
        );
    }

    #[test]
    fn test_empty_lead_is_low_and_unqualified() {
        let lead = CleanedLead::default();
        let classification = classify_lead(&lead);
        assert_eq!(classification.priority, LeadPriority::Low);
        assert_eq!(classification.category, LeadCategory::Unqualified);
        assert_eq!(classification.company_size_estimate, None);
    }

    #[test]
    fn test_priority_from_high_value_indicators() {
        // Low score but three high-value indicators still escalates.
        let lead = CleanedLead {
            job_title: Some("CEO".to_string()),
            company: Some("Tiny".to_string()),
            email_valid: Some(true),
            ..Default::default()
        };
        let score = calculate_lead_score(&lead);
        assert!(score < 80.0);
        assert_eq!(classify_lead_priority(score, &lead), LeadPriority::Urgent);
    }

    #[test]
    fn test_company_size_keywords() {
        assert_eq!(
            classify_by_company_size("Globex Corporation"),
            Some(CompanySize::Enterprise)
        );
        assert_eq!(
            classify_by_company_size("Moss Consulting"),
            Some(CompanySize::SmallBusiness)
        );
        assert_eq!(
            classify_by_company_size("Paper Street"),
            Some(CompanySize::MediumBusiness)
        );
        assert_eq!(classify_by_company_size("  "), None);
    }
}
