use std::sync::OnceLock;

use regex::Regex;

use super::{alpha_count, char_len, contains_any, Directory};
use crate::constants::{
    INAPPROPRIATE_USERNAME_PARTS, LOCATION_LEN, NAME_LEN, PLACEHOLDER_LOCATIONS,
    PLACEHOLDER_NAMES, RESERVED_USERNAMES, USERNAME_LEN,
};
use crate::error::ValidationError;
use crate::types::ValidationResult;

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z\s\-'.]+$").expect("name pattern"))
}

fn username_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_.\-]+$").expect("username pattern"))
}

fn location_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z\s,\-'.]+$").expect("location pattern"))
}

/// Person names: contact name, first name and last name share these rules.
pub(super) fn name(value: &str, label: &str) -> ValidationResult {
    let (min, max) = NAME_LEN;
    let len = char_len(value);

    if len < min {
        return ValidationResult::invalid(format!(
            "{label} must be at least {min} characters long"
        ));
    }
    if len > max {
        return ValidationResult::invalid(format!("{label} must be at most {max} characters"));
    }
    if !name_pattern().is_match(value) {
        return ValidationResult::invalid(format!(
            "{label} can only contain letters, spaces, hyphens, apostrophes, and periods"
        ));
    }
    if alpha_count(value) < 2 {
        return ValidationResult::invalid(format!("{label} must contain at least 2 letters"));
    }
    if PLACEHOLDER_NAMES.contains(&value.to_lowercase().as_str()) {
        return ValidationResult::invalid(format!(
            "Please enter your real {}",
            label.to_lowercase()
        ));
    }

    ValidationResult::valid(format!("✓ {label} looks good!"))
}

pub(super) fn username(
    value: &str,
    directory: &dyn Directory,
) -> Result<ValidationResult, ValidationError> {
    let (min, max) = USERNAME_LEN;
    let len = char_len(value);
    let lowered = value.to_lowercase();

    if len < min {
        return Ok(ValidationResult::invalid(format!(
            "Username must be at least {min} characters long"
        )));
    }
    if len > max {
        return Ok(ValidationResult::invalid(format!(
            "Username must be at most {max} characters"
        )));
    }
    if !username_pattern().is_match(value) {
        return Ok(ValidationResult::invalid(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }
    if RESERVED_USERNAMES.contains(&lowered.as_str()) {
        return Ok(ValidationResult::invalid(
            "This username is reserved. Please choose another one",
        ));
    }
    if contains_any(&lowered, INAPPROPRIATE_USERNAME_PARTS) {
        return Ok(ValidationResult::invalid("Please choose a different username"));
    }
    if directory.username_taken(value)? {
        return Ok(ValidationResult::invalid("This username is already taken"));
    }

    Ok(ValidationResult::valid("✓ Username is available!"))
}

/// Login form: nothing here blocks, it only hints.
pub(super) fn login_username(
    value: &str,
    directory: &dyn Directory,
) -> Result<ValidationResult, ValidationError> {
    let (min, _) = USERNAME_LEN;
    let len = char_len(value);

    if len < min {
        return Ok(ValidationResult::warning(format!(
            "Username too short ({len}/{min} characters minimum)"
        )));
    }
    if directory.username_taken(value)? {
        return Ok(ValidationResult::valid("✓ Username found"));
    }

    Ok(ValidationResult::warning("Username not found in our system"))
}

pub(super) fn location(value: &str) -> ValidationResult {
    let (min, max) = LOCATION_LEN;
    let len = char_len(value);

    if len < min {
        return ValidationResult::invalid(format!("Location must be at least {min} characters"));
    }
    if len > max {
        return ValidationResult::invalid(format!("Location must be at most {max} characters"));
    }
    if !location_pattern().is_match(value) {
        return ValidationResult::invalid(
            "Location can only contain letters, spaces, commas, hyphens, apostrophes, and periods",
        );
    }
    if alpha_count(value) < 2 {
        return ValidationResult::invalid("Location must contain at least 2 letters");
    }
    if PLACEHOLDER_LOCATIONS.contains(&value.to_lowercase().as_str()) {
        return ValidationResult::invalid("Please enter a valid location");
    }

    ValidationResult::valid("✓ Location looks good!")
}
