use crate::domain::model::{NormalizedRow, RawRow};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Alias table mapping lower-cased, snake_cased column spellings onto
/// canonical lead fields. Every canonical name aliases itself, which makes
/// normalization idempotent.
static FIELD_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let pairs: &[(&str, &str)] = &[
        // Name variations
        ("name", "full_name"),
        ("fullname", "full_name"),
        ("full_name", "full_name"),
        ("firstname", "first_name"),
        ("first_name", "first_name"),
        ("fname", "first_name"),
        ("lastname", "last_name"),
        ("last_name", "last_name"),
        ("lname", "last_name"),
        ("surname", "last_name"),
        // Contact variations
        ("email_address", "email"),
        ("email", "email"),
        ("e_mail", "email"),
        ("mail", "email"),
        ("phone_number", "phone"),
        ("phone", "phone"),
        ("tel", "phone"),
        ("telephone", "phone"),
        ("mobile_number", "mobile"),
        ("mobile", "mobile"),
        ("cell", "mobile"),
        ("cellphone", "mobile"),
        // Company variations
        ("company_name", "company"),
        ("company", "company"),
        ("organization", "company"),
        ("org", "company"),
        ("employer", "company"),
        ("business", "company"),
        // Job variations
        ("job_title", "job_title"),
        ("title", "job_title"),
        ("position", "job_title"),
        ("role", "job_title"),
        ("designation", "job_title"),
        // Location variations
        ("address", "address"),
        ("street_address", "address"),
        ("city", "city"),
        ("state", "state"),
        ("province", "state"),
        ("country", "country"),
        ("postal_code", "postal_code"),
        ("zip_code", "postal_code"),
        ("zip", "postal_code"),
        // Social media variations
        ("linkedin", "linkedin_url"),
        ("linkedin_url", "linkedin_url"),
        ("linkedin_profile", "linkedin_url"),
        ("facebook", "facebook_url"),
        ("facebook_url", "facebook_url"),
        ("facebook_profile", "facebook_url"),
        ("instagram", "instagram_url"),
        ("instagram_url", "instagram_url"),
        ("instagram_profile", "instagram_url"),
        ("twitter", "twitter_url"),
        ("twitter_url", "twitter_url"),
        ("twitter_profile", "twitter_url"),
        ("youtube", "youtube_url"),
        ("youtube_url", "youtube_url"),
        ("youtube_channel", "youtube_url"),
        ("tiktok", "tiktok_url"),
        ("tiktok_url", "tiktok_url"),
        ("tiktok_profile", "tiktok_url"),
        // Website variations
        ("website", "website"),
        ("website_url", "website"),
        ("web", "website"),
        ("url", "website"),
        ("homepage", "website"),
        // Industry variations
        ("industry", "industry"),
        ("sector", "industry"),
        ("business_type", "industry"),
        // Notes variations
        ("notes", "notes"),
        ("comments", "notes"),
        ("remarks", "notes"),
        ("description", "notes"),
        // Tag variations
        ("tags", "tags"),
        ("tag", "tags"),
    ];
    pairs.iter().copied().collect()
});

fn alias_key(column: &str) -> String {
    column.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Remaps a raw row onto the canonical schema. Pure function: unmatched
/// columns are never dropped, they move into `additional_data` with their
/// original spelling.
pub fn normalize(raw: RawRow) -> NormalizedRow {
    let mut row = NormalizedRow {
        source_file_row: raw.row_index,
        ..Default::default()
    };

    for (column, value) in raw.fields {
        match FIELD_ALIASES.get(alias_key(&column).as_str()) {
            Some(canonical) => set_canonical(&mut row, canonical, value),
            None => {
                if let Some(value) = value {
                    row.additional_data.insert(column, value);
                }
            }
        }
    }

    row
}

fn set_canonical(row: &mut NormalizedRow, canonical: &str, value: Option<String>) {
    let slot = match canonical {
        "first_name" => &mut row.first_name,
        "last_name" => &mut row.last_name,
        "full_name" => &mut row.full_name,
        "email" => &mut row.email,
        "phone" => &mut row.phone,
        "mobile" => &mut row.mobile,
        "company" => &mut row.company,
        "job_title" => &mut row.job_title,
        "industry" => &mut row.industry,
        "website" => &mut row.website,
        "address" => &mut row.address,
        "city" => &mut row.city,
        "state" => &mut row.state,
        "country" => &mut row.country,
        "postal_code" => &mut row.postal_code,
        "linkedin_url" => &mut row.linkedin_url,
        "facebook_url" => &mut row.facebook_url,
        "instagram_url" => &mut row.instagram_url,
        "twitter_url" => &mut row.twitter_url,
        "youtube_url" => &mut row.youtube_url,
        "tiktok_url" => &mut row.tiktok_url,
        "notes" => &mut row.notes,
        "tags" => &mut row.tags,
        _ => unreachable!("alias table maps onto known canonical fields"),
    };
    *slot = value;
}
