use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::contains_any;
use crate::constants::{
    FAKE_PHONE_NUMBERS, PHONE_DIGITS, PHONE_MIN_DISTINCT_DIGITS, PLACEHOLDER_HOST,
    SUSPICIOUS_HOSTS,
};
use crate::types::ValidationResult;

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9\s\-().]{10,17}$").expect("phone pattern"))
}

pub(super) fn phone(value: &str) -> ValidationResult {
    if !phone_pattern().is_match(value) {
        return ValidationResult::invalid(
            "Please enter a valid phone number (e.g., +1-234-567-8900)",
        );
    }

    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let (min, max) = PHONE_DIGITS;

    if digits.len() < min {
        return ValidationResult::invalid(format!(
            "Phone number must contain at least {min} digits"
        ));
    }
    if digits.len() > max {
        return ValidationResult::invalid(format!(
            "Phone number is too long (max {max} digits)"
        ));
    }
    if FAKE_PHONE_NUMBERS.contains(&digits.as_str()) {
        return ValidationResult::invalid("Please enter a valid phone number");
    }

    let distinct: HashSet<char> = digits.chars().collect();
    if distinct.len() < PHONE_MIN_DISTINCT_DIGITS {
        return ValidationResult::invalid("Please enter a valid phone number");
    }

    ValidationResult::valid("✓ Phone number format is valid")
}

fn scheme_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").expect("scheme pattern"))
}

pub(super) fn website(value: &str) -> ValidationResult {
    let candidate = if scheme_pattern().is_match(value) {
        value.to_string()
    } else {
        format!("https://{value}")
    };

    let Ok(parsed) = Url::parse(&candidate) else {
        return ValidationResult::invalid("Please enter a valid website URL");
    };

    let host = match parsed.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return ValidationResult::invalid("Please enter a valid website URL"),
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return ValidationResult::invalid("Website URL must use http or https");
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return ValidationResult::invalid("Please enter a complete domain name");
    }
    if labels.iter().any(|label| label.is_empty()) {
        return ValidationResult::invalid("Invalid domain format");
    }
    if contains_any(&host, SUSPICIOUS_HOSTS) {
        return ValidationResult::invalid("Please enter a proper website URL");
    }
    if host.contains(PLACEHOLDER_HOST) {
        return ValidationResult::invalid("Please enter your actual website URL");
    }

    ValidationResult::valid("✓ Website URL looks good!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    #[test]
    fn test_sequential_phone_rejected() {
        let result = phone("123-456-7890");
        assert_eq!(result.outcome, Outcome::Invalid);
        assert_eq!(result.message, "Please enter a valid phone number");
    }

    #[test]
    fn test_real_looking_phone_accepted() {
        assert_eq!(phone("555-867-5309").outcome, Outcome::Valid);
        assert_eq!(phone("+1 (555) 867-5309").outcome, Outcome::Valid);
    }

    #[test]
    fn test_phone_digit_rules() {
        assert_eq!(
            phone("555-8675").message,
            "Please enter a valid phone number (e.g., +1-234-567-8900)"
        );
        assert_eq!(
            phone("555 867 530").message,
            "Phone number must contain at least 10 digits"
        );
        assert_eq!(phone("1212121212").message, "Please enter a valid phone number");
        assert_eq!(phone("call 5558675309").outcome, Outcome::Invalid);
    }

    #[test]
    fn test_website_scheme_is_prepended() {
        assert_eq!(website("rust-lang.org").outcome, Outcome::Valid);
        assert_eq!(website("http://docs.rs/tokio").outcome, Outcome::Valid);
    }

    #[test]
    fn test_website_scheme_only_counts_at_start() {
        let result = website("rust-lang.org/?next=https://docs.rs");
        assert_eq!(result.outcome, Outcome::Valid);
        assert_eq!(result.message, "✓ Website URL looks good!");
    }

    #[test]
    fn test_website_rejections() {
        assert_eq!(website("ftp://files.org").message, "Website URL must use http or https");
        assert_eq!(website("intranet").message, "Please enter a complete domain name");
        assert_eq!(website("bit.ly/abc").message, "Please enter a proper website URL");
        assert_eq!(website("localhost.dev").message, "Please enter a proper website URL");
        assert_eq!(
            website("www.example.com").message,
            "Please enter your actual website URL"
        );
        assert_eq!(website("http://").outcome, Outcome::Invalid);
    }
}
