use super::{char_len, contains_any};
use crate::constants::{KEYBOARD_PATTERNS, PASSWORD_SYMBOLS, WEAK_PASSWORD_PATTERNS};
use crate::types::{StrengthReport, ValidationResult};

const MAX_SCORE: f64 = 5.0;

/// Score a password 0..=5 and list what it is missing.
///
/// Five criteria add one point each. Twelve or more characters add half a
/// point (capped at 5); common words subtract one and keyboard runs subtract
/// half (floored at 0). The fractional total is truncated at the end.
pub fn strength(password: &str) -> StrengthReport {
    let mut score = 0.0_f64;
    let mut feedback = Vec::new();

    let criteria: [(bool, &str); 5] = [
        (char_len(password) >= 8, "At least 8 characters"),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "One uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "One lowercase letter",
        ),
        (password.chars().any(|c| c.is_ascii_digit()), "One number"),
        (
            password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
            "One special character",
        ),
    ];

    for (met, advice) in criteria {
        if met {
            score += 1.0;
        } else {
            feedback.push(advice.to_string());
        }
    }

    if char_len(password) >= 12 {
        score = (score + 0.5).min(MAX_SCORE);
    }

    let lowered = password.to_lowercase();
    if contains_any(&lowered, WEAK_PASSWORD_PATTERNS) {
        score = (score - 1.0).max(0.0);
        feedback.push("Avoid common words".to_string());
    }
    if contains_any(&lowered, KEYBOARD_PATTERNS) {
        score = (score - 0.5).max(0.0);
        feedback.push("Avoid keyboard patterns".to_string());
    }

    StrengthReport {
        score: score.trunc() as u8,
        feedback,
    }
}

/// Live feedback for the first password entry.
///
/// Weak passwords are a warning, not a rejection. The one hard rule is
/// that the password must not contain the username typed in the same form.
pub(super) fn password(value: &str, username: Option<&str>) -> ValidationResult {
    let report = strength(value);

    let username = username.map(str::trim).filter(|u| !u.is_empty());
    if let Some(username) = username {
        if value.to_lowercase().contains(&username.to_lowercase()) {
            return ValidationResult::invalid("Password cannot contain your username")
                .with_strength(report);
        }
    }

    if !report.is_acceptable() {
        let message = format!(
            "Password strength: {}. Missing: {}",
            report.label(),
            report.feedback.join(", ")
        );
        return ValidationResult::warning(message).with_strength(report);
    }

    let message = format!("✓ {} password!", report.label());
    ValidationResult::valid(message).with_strength(report)
}

/// Second password entry. Compared exactly, without trimming.
pub(super) fn confirmation(first: &str, second: &str) -> ValidationResult {
    if first.is_empty() {
        return ValidationResult::warning("Enter password first");
    }
    if second.is_empty() {
        return ValidationResult::invalid("Please confirm your password");
    }
    if first != second {
        return ValidationResult::invalid("Passwords do not match");
    }
    ValidationResult::valid("✓ Passwords match!")
}
