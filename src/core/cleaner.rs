use crate::core::validator::{
    self, clean_address, clean_company_name, clean_name, SocialPlatform,
};
use crate::domain::model::{BatchCleaningStats, CleanedLead, NormalizedRow};
use crate::utils::error::Result;
use std::collections::HashSet;

/// Minimum weighted similarity for `find_similar_leads` matches.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

const SOCIAL_FIELDS: &[SocialPlatform] = &[
    SocialPlatform::Linkedin,
    SocialPlatform::Facebook,
    SocialPlatform::Instagram,
    SocialPlatform::Twitter,
    SocialPlatform::Youtube,
    SocialPlatform::Tiktok,
];

/// Cleans one normalized record. Validator failures produce warnings, never
/// dropped records: every input row yields exactly one output lead.
pub fn clean_lead_data(
    raw: &NormalizedRow,
    phone_region: &str,
) -> Result<(CleanedLead, Vec<String>)> {
    let mut lead = CleanedLead {
        source_file_row: raw.source_file_row,
        ..Default::default()
    };
    let mut warnings = Vec::new();

    if let Some(first) = &raw.first_name {
        lead.first_name = clean_name(first);
    }
    if let Some(last) = &raw.last_name {
        lead.last_name = clean_name(last);
    }
    if let Some(full) = &raw.full_name {
        lead.full_name = clean_name(full);
    } else if let (Some(first), Some(last)) = (&lead.first_name, &lead.last_name) {
        lead.full_name = Some(format!("{first} {last}"));
    }

    if let Some(company) = &raw.company {
        lead.company = clean_company_name(company);
    }
    if let Some(job_title) = &raw.job_title {
        lead.job_title = trimmed(job_title);
    }
    if let Some(industry) = &raw.industry {
        lead.industry = normalize_industry(industry);
    }

    if let Some(email) = &raw.email {
        let (cleaned, is_valid) = validator::validate_and_clean_email(email);
        match cleaned {
            Some(cleaned) => {
                lead.email = Some(cleaned);
                lead.email_valid = Some(is_valid);
                if !is_valid {
                    warnings.push(format!("Email '{email}' appears to be invalid"));
                }
            }
            None => warnings.push(format!("Could not clean email '{email}'")),
        }
    }

    if let Some(phone) = &raw.phone {
        let (cleaned, is_valid) = validator::validate_and_clean_phone(phone, phone_region);
        if let Some(cleaned) = cleaned {
            lead.phone = Some(cleaned);
            lead.phone_valid = Some(is_valid);
            if !is_valid {
                warnings.push(format!("Phone '{phone}' appears to be invalid"));
            }
        }
    }

    if let Some(mobile) = &raw.mobile {
        let (cleaned, is_valid) = validator::validate_and_clean_phone(mobile, phone_region);
        if let Some(cleaned) = cleaned {
            lead.mobile = Some(cleaned);
            // A valid mobile counts as a working phone.
            if is_valid && !lead.phone_valid.unwrap_or(false) {
                lead.phone_valid = Some(true);
            }
        }
    }

    if let Some(address) = &raw.address {
        lead.address = clean_address(address);
    }
    lead.city = raw.city.as_deref().and_then(trimmed_str);
    lead.state = raw.state.as_deref().and_then(trimmed_str);
    lead.country = raw.country.as_deref().and_then(trimmed_str);
    lead.postal_code = raw.postal_code.as_deref().and_then(trimmed_str);

    if let Some(website) = &raw.website {
        let (cleaned, is_valid) = validator::validate_and_clean_url(website);
        if let Some(cleaned) = cleaned {
            lead.website = Some(cleaned);
            if !is_valid {
                warnings.push(format!("Website URL '{website}' appears to be invalid"));
            }
        }
    }

    let mut social_count = 0u32;
    for platform in SOCIAL_FIELDS {
        let Some(url) = social_field(raw, *platform) else {
            continue;
        };
        let (cleaned, is_valid) = validator::validate_social_media_url(url, *platform);
        if let Some(cleaned) = cleaned {
            *social_slot(&mut lead, *platform) = Some(cleaned);
            if is_valid {
                social_count += 1;
            } else {
                warnings.push(format!(
                    "{} URL '{url}' doesn't match expected format",
                    platform.label()
                ));
            }
        }
    }
    lead.social_profiles_count = social_count;

    lead.additional_data = raw.additional_data.clone();
    lead.notes = raw.notes.clone();
    lead.tags = raw.tags.clone();

    Ok((lead, warnings))
}

/// Cleans a batch in input order and flags batch-local duplicates. The
/// duplicate-tracking sets live on the stack of this call, so concurrent
/// batches never share state and there is no reset to forget.
pub fn clean_batch_data(
    rows: &[NormalizedRow],
    phone_region: &str,
) -> (Vec<CleanedLead>, BatchCleaningStats) {
    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut seen_phones: HashSet<String> = HashSet::new();
    let mut cleaned = Vec::with_capacity(rows.len());
    let mut stats = BatchCleaningStats {
        total_records: rows.len(),
        ..Default::default()
    };

    for (i, raw) in rows.iter().enumerate() {
        let record_number = i + 1;
        match clean_lead_data(raw, phone_region) {
            Ok((mut lead, mut warnings)) => {
                // First occurrence wins: only later records with a seen
                // email/phone are flagged.
                if is_batch_duplicate(&lead, &seen_emails, &seen_phones) {
                    lead.is_duplicate = true;
                    stats.duplicate_records += 1;
                    warnings.push("Potential duplicate record detected".to_string());
                }

                if let Some(email) = &lead.email {
                    seen_emails.insert(email.to_lowercase());
                }
                if let Some(phone) = &lead.phone {
                    seen_phones.insert(phone.clone());
                }

                stats.cleaned_records += 1;
                if !warnings.is_empty() {
                    stats.records_with_warnings += 1;
                    stats.total_warnings += warnings.len();
                    stats
                        .warnings
                        .extend(warnings.iter().map(|w| format!("Record {record_number}: {w}")));
                }
                cleaned.push(lead);
            }
            Err(err) => {
                tracing::error!("Error cleaning record {record_number}: {err}");
                stats
                    .warnings
                    .push(format!("Error cleaning record {record_number}: {err}"));
            }
        }
    }

    (cleaned, stats)
}

fn is_batch_duplicate(
    lead: &CleanedLead,
    seen_emails: &HashSet<String>,
    seen_phones: &HashSet<String>,
) -> bool {
    if let Some(email) = &lead.email {
        if seen_emails.contains(&email.to_lowercase()) {
            return true;
        }
    }
    if let Some(phone) = &lead.phone {
        if seen_phones.contains(phone) {
            return true;
        }
    }
    false
}

/// Weighted fuzzy match of one candidate against an externally supplied pool.
/// Name similarity weighs 0.4, exact email equality 0.5, company similarity
/// 0.1; factors missing on either side drop out of both numerator and
/// denominator. Matches at or above the threshold come back sorted by score,
/// highest first. Opt-in; not part of the batch cleaning path.
pub fn find_similar_leads<'a>(
    candidate: &CleanedLead,
    existing: &'a [CleanedLead],
) -> Vec<(&'a CleanedLead, f64)> {
    let name = candidate.full_name.as_deref().map(str::to_lowercase);
    let email = candidate.email.as_deref().map(str::to_lowercase);
    let company = candidate.company.as_deref().map(str::to_lowercase);

    let mut matches = Vec::new();
    for lead in existing {
        let mut score = 0.0;
        let mut factors = 0.0;

        if let (Some(a), Some(b)) = (&name, &lead.full_name) {
            score += strsim::normalized_levenshtein(a, &b.to_lowercase()) * 0.4;
            factors += 0.4;
        }
        if let (Some(a), Some(b)) = (&email, &lead.email) {
            if *a == b.to_lowercase() {
                score += 0.5;
            }
            factors += 0.5;
        }
        if let (Some(a), Some(b)) = (&company, &lead.company) {
            score += strsim::normalized_levenshtein(a, &b.to_lowercase()) * 0.1;
            factors += 0.1;
        }

        if factors > 0.0 {
            let final_score = score / factors;
            if final_score >= SIMILARITY_THRESHOLD {
                matches.push((lead, final_score));
            }
        }
    }

    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

/// Maps common industry spellings onto standard category labels: exact match
/// first, then substring, otherwise title-cased passthrough.
pub fn normalize_industry(industry: &str) -> Option<String> {
    const INDUSTRY_MAP: &[(&str, &str)] = &[
        ("tech", "Technology"),
        ("technology", "Technology"),
        ("software", "Technology"),
        ("it", "Technology"),
        ("information technology", "Technology"),
        ("healthcare", "Healthcare"),
        ("health care", "Healthcare"),
        ("medical", "Healthcare"),
        ("finance", "Financial Services"),
        ("financial", "Financial Services"),
        ("banking", "Financial Services"),
        ("insurance", "Financial Services"),
        ("real estate", "Real Estate"),
        ("realestate", "Real Estate"),
        ("education", "Education"),
        ("manufacturing", "Manufacturing"),
        ("retail", "Retail"),
        ("consulting", "Consulting"),
        ("marketing", "Marketing & Advertising"),
        ("advertising", "Marketing & Advertising"),
        ("legal", "Legal"),
        ("law", "Legal"),
        ("construction", "Construction"),
        ("automotive", "Automotive"),
        ("energy", "Energy"),
        ("telecommunications", "Telecommunications"),
        ("telecom", "Telecommunications"),
        ("media", "Media & Entertainment"),
        ("entertainment", "Media & Entertainment"),
        ("nonprofit", "Non-Profit"),
        ("non-profit", "Non-Profit"),
        ("government", "Government"),
        ("agriculture", "Agriculture"),
        ("transportation", "Transportation"),
        ("logistics", "Transportation"),
        ("hospitality", "Hospitality"),
        ("travel", "Hospitality"),
        ("food", "Food & Beverage"),
        ("restaurant", "Food & Beverage"),
    ];

    let lower = industry.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    for (key, value) in INDUSTRY_MAP {
        if lower == *key {
            return Some(value.to_string());
        }
    }
    for (key, value) in INDUSTRY_MAP {
        if lower.contains(key) {
            return Some(value.to_string());
        }
    }

    Some(title_case_words(industry.trim()))
}

fn title_case_words(value: &str) -> String {
    value
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

fn trimmed(value: &str) -> Option<String> {
    trimmed_str(value)
}

fn trimmed_str(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn social_field(raw: &NormalizedRow, platform: SocialPlatform) -> Option<&str> {
    match platform {
        SocialPlatform::Linkedin => raw.linkedin_url.as_deref(),
        SocialPlatform::Facebook => raw.facebook_url.as_deref(),
        SocialPlatform::Instagram => raw.instagram_url.as_deref(),
        SocialPlatform::Twitter => raw.twitter_url.as_deref(),
        SocialPlatform::Youtube => raw.youtube_url.as_deref(),
        SocialPlatform::Tiktok => raw.tiktok_url.as_deref(),
    }
}

fn social_slot(lead: &mut CleanedLead, platform: SocialPlatform) -> &mut Option<String> {
    match platform {
        SocialPlatform::Linkedin => &mut lead.linkedin_url,
        SocialPlatform::Facebook => &mut lead.facebook_url,
        SocialPlatform::Instagram => &mut lead.instagram_url,
        SocialPlatform::Twitter => &mut lead.twitter_url,
        SocialPlatform::Youtube => &mut lead.youtube_url,
        SocialPlatform::Tiktok => &mut lead.tiktok_url,
    }
}
