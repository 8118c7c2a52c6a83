use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static EMAIL_FALLBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static NAME_DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-'.]").unwrap());
static COMPANY_DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-'.,&()]").unwrap());
static ADDRESS_DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-'.,#()]").unwrap());
static USERNAME_DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w.\-]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialPlatform {
    Linkedin,
    Facebook,
    Instagram,
    Twitter,
    Youtube,
    Tiktok,
}

impl SocialPlatform {
    pub fn label(&self) -> &'static str {
        match self {
            SocialPlatform::Linkedin => "LinkedIn",
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Twitter => "Twitter",
            SocialPlatform::Youtube => "YouTube",
            SocialPlatform::Tiktok => "TikTok",
        }
    }

    /// Host/path fragments a profile URL must contain for this platform.
    fn patterns(&self) -> &'static [&'static str] {
        match self {
            SocialPlatform::Linkedin => &[
                "linkedin.com/in/",
                "linkedin.com/company/",
                "linkedin.com/pub/",
            ],
            SocialPlatform::Facebook => &["facebook.com/", "fb.com/", "fb.me/"],
            SocialPlatform::Instagram => &["instagram.com/", "instagr.am/"],
            SocialPlatform::Twitter => &["twitter.com/", "x.com/"],
            SocialPlatform::Youtube => &["youtube.com/", "youtu.be/"],
            SocialPlatform::Tiktok => &["tiktok.com/", "vm.tiktok.com/"],
        }
    }
}

/// Lowercases, strips surrounding quotes/brackets, then validates. Falls back
/// to a plain regex when the RFC-aware check rejects the address. The cleaned
/// value is kept even when invalid.
pub fn validate_and_clean_email(email: &str) -> (Option<String>, bool) {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return (None, false);
    }

    let cleaned = trimmed
        .to_lowercase()
        .trim_matches(|c| matches!(c, '"' | '\'' | '<' | '>'))
        .to_string();
    if cleaned.is_empty() {
        return (None, false);
    }

    if validator::validate_email(cleaned.as_str()) || EMAIL_FALLBACK_RE.is_match(&cleaned) {
        (Some(cleaned), true)
    } else {
        (Some(cleaned), false)
    }
}

/// Strips everything but digits and `+-() .`, then attempts a region-aware
/// parse. Valid numbers come back in E.164; anything else is returned
/// best-effort and flagged invalid.
pub fn validate_and_clean_phone(phone: &str, default_region: &str) -> (Option<String>, bool) {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return (None, false);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ' | '.'))
        .collect();
    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        return (None, false);
    }

    let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(e164) = parse_e164(&cleaned, &digits, default_region) {
        return (Some(e164), true);
    }

    // Best-effort: 7-15 digits looks like a phone number but is unverified;
    // either way the cleaned value is kept and flagged invalid.
    (Some(cleaned), false)
}

fn parse_e164(cleaned: &str, digits: &str, region: &str) -> Option<String> {
    if cleaned.starts_with('+') {
        // International: country code cannot start with zero.
        if (8..=15).contains(&digits.len()) && !digits.starts_with('0') {
            return Some(format!("+{digits}"));
        }
        return None;
    }

    match region.to_ascii_uppercase().as_str() {
        "US" | "CA" => {
            let national = if digits.len() == 11 && digits.starts_with('1') {
                &digits[1..]
            } else {
                digits
            };
            if national.len() == 10 && nanp_valid(national) {
                return Some(format!("+1{national}"));
            }
            None
        }
        _ => None,
    }
}

// NANP: area code and exchange code both start with 2-9.
fn nanp_valid(national: &str) -> bool {
    let bytes = national.as_bytes();
    (b'2'..=b'9').contains(&bytes[0]) && (b'2'..=b'9').contains(&bytes[3])
}

/// Prepends `https://` when no scheme is present, then checks general URL
/// well-formedness. Malformed URLs yield `(None, false)`.
pub fn validate_and_clean_url(url: &str) -> (Option<String>, bool) {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return (None, false);
    }

    let cleaned = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&cleaned) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| h.contains('.')) => (Some(cleaned), true),
        _ => (None, false),
    }
}

/// Cleans like a general URL, then requires a per-platform pattern match.
/// A well-formed URL that misses the pattern is kept but flagged invalid.
pub fn validate_social_media_url(url: &str, platform: SocialPlatform) -> (Option<String>, bool) {
    let (cleaned, _) = validate_and_clean_url(url);
    let Some(cleaned) = cleaned else {
        return (None, false);
    };

    let lower = cleaned.to_lowercase();
    let matched = platform.patterns().iter().any(|p| lower.contains(p));
    (Some(cleaned), matched)
}

/// Whitespace-collapsed, restricted to letters/digits/space/hyphen/
/// apostrophe/period, title-cased.
pub fn clean_name(name: &str) -> Option<String> {
    let collapsed = collapse_whitespace(name);
    if collapsed.is_empty() {
        return None;
    }
    let stripped = NAME_DISALLOWED_RE.replace_all(&collapsed, "");
    let titled = title_case(&stripped);
    non_empty(titled)
}

/// Like `clean_name` but additionally allows `,&()` and keeps the original
/// casing.
pub fn clean_company_name(company: &str) -> Option<String> {
    let collapsed = collapse_whitespace(company);
    if collapsed.is_empty() {
        return None;
    }
    let stripped = COMPANY_DISALLOWED_RE.replace_all(&collapsed, "");
    non_empty(stripped.into_owned())
}

pub fn clean_address(address: &str) -> Option<String> {
    let collapsed = collapse_whitespace(address);
    if collapsed.is_empty() {
        return None;
    }
    let stripped = ADDRESS_DISALLOWED_RE.replace_all(&collapsed, "");
    non_empty(stripped.into_owned())
}

pub fn extract_domain_from_email(email: &str) -> Option<String> {
    let (_, domain) = email.split_once('@')?;
    non_empty(domain.to_lowercase())
}

/// Pulls the username segment out of a social profile URL, skipping common
/// path prefixes like `/in/` or `/company/`.
pub fn extract_username_from_social_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut path = parsed.path().trim_matches('/');

    for prefix in ["in", "company", "pub", "user", "profile", "@"] {
        if let Some(rest) = path.strip_prefix(prefix) {
            if let Some(rest) = rest.strip_prefix('/') {
                path = rest;
                break;
            }
        }
    }

    let username = path.split('/').next()?;
    let cleaned = USERNAME_DISALLOWED_RE.replace_all(username, "");
    non_empty(cleaned.into_owned())
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Uppercase at word starts, lowercase elsewhere; any non-alphabetic
// character starts a new word (so O'Brien keeps its capital B).
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        let (cleaned, valid) = validate_and_clean_email("  John.Doe@Example.COM ");
        assert_eq!(cleaned.as_deref(), Some("john.doe@example.com"));
        assert!(valid);
    }

    #[test]
    fn test_email_strips_quotes_and_brackets() {
        let (cleaned, valid) = validate_and_clean_email("\"<jane@example.org>\"");
        assert_eq!(cleaned.as_deref(), Some("jane@example.org"));
        assert!(valid);
    }

    #[test]
    fn test_email_invalid_is_kept() {
        let (cleaned, valid) = validate_and_clean_email("not-an-email");
        assert_eq!(cleaned.as_deref(), Some("not-an-email"));
        assert!(!valid);
    }

    #[test]
    fn test_email_empty() {
        assert_eq!(validate_and_clean_email("   "), (None, false));
    }

    #[test]
    fn test_phone_us_ten_digits() {
        let (cleaned, valid) = validate_and_clean_phone("(212) 555-0182", "US");
        assert_eq!(cleaned.as_deref(), Some("+12125550182"));
        assert!(valid);
    }

    #[test]
    fn test_phone_us_with_country_prefix() {
        let (cleaned, valid) = validate_and_clean_phone("1-212-555-0182", "US");
        assert_eq!(cleaned.as_deref(), Some("+12125550182"));
        assert!(valid);
    }

    #[test]
    fn test_phone_international() {
        let (cleaned, valid) = validate_and_clean_phone("+44 20 7946 0958", "US");
        assert_eq!(cleaned.as_deref(), Some("+442079460958"));
        assert!(valid);
    }

    #[test]
    fn test_phone_invalid_kept_best_effort() {
        let (cleaned, valid) = validate_and_clean_phone("555-0100", "US");
        assert_eq!(cleaned.as_deref(), Some("555-0100"));
        assert!(!valid);
    }

    #[test]
    fn test_phone_strips_letters() {
        let (cleaned, valid) = validate_and_clean_phone("call 212.555.0182 now", "US");
        assert_eq!(cleaned.as_deref(), Some("+12125550182"));
        assert!(valid);
    }

    #[test]
    fn test_phone_nanp_rejects_zero_area_code() {
        let (_, valid) = validate_and_clean_phone("012-555-0182", "US");
        assert!(!valid);
    }

    #[test]
    fn test_url_scheme_prepended() {
        let (cleaned, valid) = validate_and_clean_url("example.com/about");
        assert_eq!(cleaned.as_deref(), Some("https://example.com/about"));
        assert!(valid);
    }

    #[test]
    fn test_url_malformed_is_dropped() {
        assert_eq!(validate_and_clean_url("not a url"), (None, false));
    }

    #[test]
    fn test_social_url_platform_match() {
        let (cleaned, valid) =
            validate_social_media_url("linkedin.com/in/ada-lovelace", SocialPlatform::Linkedin);
        assert_eq!(cleaned.as_deref(), Some("https://linkedin.com/in/ada-lovelace"));
        assert!(valid);
    }

    #[test]
    fn test_social_url_mismatch_kept_but_flagged() {
        let (cleaned, valid) =
            validate_social_media_url("https://example.com/not-linkedin", SocialPlatform::Linkedin);
        assert_eq!(cleaned.as_deref(), Some("https://example.com/not-linkedin"));
        assert!(!valid);
    }

    #[test]
    fn test_clean_name_title_cases_and_strips() {
        assert_eq!(
            clean_name("  jOHN   o'brien!! ").as_deref(),
            Some("John O'Brien")
        );
    }

    #[test]
    fn test_clean_company_keeps_business_punctuation() {
        assert_eq!(
            clean_company_name("Smith & Sons, Inc. (Holdings) *").as_deref(),
            Some("Smith & Sons, Inc. (Holdings)")
        );
    }

    #[test]
    fn test_clean_address_keeps_hash() {
        assert_eq!(
            clean_address("42  Main St.  #5 <x>").as_deref(),
            Some("42 Main St. #5 x")
        );
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain_from_email("Jane@Example.COM").as_deref(),
            Some("example.com")
        );
        assert_eq!(extract_domain_from_email("no-at-sign"), None);
    }

    #[test]
    fn test_extract_username_from_social_url() {
        assert_eq!(
            extract_username_from_social_url("https://linkedin.com/in/ada-lovelace/").as_deref(),
            Some("ada-lovelace")
        );
        assert_eq!(
            extract_username_from_social_url("https://twitter.com/gracehopper").as_deref(),
            Some("gracehopper")
        );
    }
}
