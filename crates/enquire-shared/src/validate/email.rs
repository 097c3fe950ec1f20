use std::sync::OnceLock;

use regex::Regex;

use super::{char_len, Directory};
use crate::constants::{
    EMAIL_LOCAL_MAX_LEN, EMAIL_MAX_LEN, ROLE_EMAIL_LOCALS, SUSPICIOUS_EMAIL_DOMAINS,
};
use crate::error::ValidationError;
use crate::types::ValidationResult;

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("email pattern")
    })
}

/// Syntax and denylist checks shared by every email field.
///
/// Returns the lower-cased address on success, or the Invalid verdict.
pub fn check_format(value: &str) -> Result<String, ValidationResult> {
    let email = value.trim().to_lowercase();

    if char_len(&email) > EMAIL_MAX_LEN {
        return Err(ValidationResult::invalid("Email address is too long"));
    }
    if !email_pattern().is_match(&email) {
        return Err(ValidationResult::invalid("Please enter a valid email address"));
    }
    if email.matches('@').count() != 1 {
        return Err(ValidationResult::invalid(
            "Email must contain exactly one @ symbol",
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationResult::invalid("Please enter a valid email address"));
    };

    if char_len(local) > EMAIL_LOCAL_MAX_LEN {
        return Err(ValidationResult::invalid("Email address is too long"));
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationResult::invalid("Invalid domain format"));
    }
    if email.contains("..") {
        return Err(ValidationResult::invalid(
            "Email address contains invalid characters",
        ));
    }
    if SUSPICIOUS_EMAIL_DOMAINS.contains(&domain) {
        return Err(ValidationResult::invalid("Please enter a real email address"));
    }

    Ok(email)
}

/// Contact form: a returning sender is only an advisory.
pub(super) fn contact_email(
    value: &str,
    directory: &dyn Directory,
) -> Result<ValidationResult, ValidationError> {
    let email = match check_format(value) {
        Ok(email) => email,
        Err(rejected) => return Ok(rejected),
    };

    if directory.email_has_contacted(&email)? {
        return Ok(ValidationResult::warning("This email has contacted us before"));
    }
    Ok(ValidationResult::valid("✓ Email looks good!"))
}

pub(super) fn registration_email(
    value: &str,
    directory: &dyn Directory,
) -> Result<ValidationResult, ValidationError> {
    let email = match check_format(value) {
        Ok(email) => email,
        Err(rejected) => return Ok(rejected),
    };

    if directory.email_registered(&email)? {
        return Ok(ValidationResult::invalid(
            "An account with this email already exists",
        ));
    }
    Ok(ValidationResult::valid("✓ Email is available!"))
}

/// Newsletter sign-up: an existing subscription is a warning since the
/// visitor may just be retrying.
pub(super) fn newsletter_email(
    value: &str,
    directory: &dyn Directory,
) -> Result<ValidationResult, ValidationError> {
    let email = match check_format(value) {
        Ok(email) => email,
        Err(rejected) => return Ok(rejected),
    };

    if directory.email_subscribed(&email)? {
        return Ok(ValidationResult::warning(
            "This email is already subscribed to our newsletter",
        ));
    }

    let local = email.split('@').next().unwrap_or_default();
    if ROLE_EMAIL_LOCALS.contains(&local) {
        return Ok(ValidationResult::warning(
            "Please use a personal email address for newsletter subscription",
        ));
    }

    Ok(ValidationResult::valid("✓ Email is ready for subscription!"))
}

pub(super) fn password_reset_email(
    value: &str,
    directory: &dyn Directory,
) -> Result<ValidationResult, ValidationError> {
    let email = match check_format(value) {
        Ok(email) => email,
        Err(rejected) => return Ok(rejected),
    };

    if directory.email_registered(&email)? {
        return Ok(ValidationResult::valid("Email found in our system"));
    }
    Ok(ValidationResult::warning("No account found with this email"))
}

#[cfg(test)]
mod tests {
    use super::super::fake::FakeDirectory;
    use super::*;
    use crate::types::Outcome;

    fn rejection(value: &str) -> String {
        check_format(value).unwrap_err().message
    }

    #[test]
    fn test_placeholder_domain_rejected() {
        assert_eq!(rejection("user@example.com"), "Please enter a real email address");
        assert_eq!(rejection("USER@Example.COM"), "Please enter a real email address");
    }

    #[test]
    fn test_consecutive_dots_rejected() {
        assert_eq!(
            rejection("a..b@domain.com"),
            "Email address contains invalid characters"
        );
    }

    #[test]
    fn test_format_failures() {
        assert_eq!(rejection("not-an-email"), "Please enter a valid email address");
        assert_eq!(rejection("a@b@c.com"), "Please enter a valid email address");
        assert_eq!(rejection("x@.domain.com"), "Invalid domain format");
        assert_eq!(
            rejection(&format!("{}@domain.com", "l".repeat(65))),
            "Email address is too long"
        );
        assert_eq!(
            rejection(&format!("a@{}.com", "d".repeat(250))),
            "Email address is too long"
        );
    }

    #[test]
    fn test_format_normalises_case() {
        assert_eq!(
            check_format("  Ada@Analytical.ORG ").unwrap(),
            "ada@analytical.org"
        );
    }

    #[test]
    fn test_registration_email_taken_is_error() {
        let mut dir = FakeDirectory::default();
        dir.accounts.insert("ada@analytical.org".into());

        let taken = registration_email("Ada@analytical.org", &dir).unwrap();
        assert_eq!(taken.outcome, Outcome::Invalid);

        let free = registration_email("grace@navy.mil", &dir).unwrap();
        assert_eq!(free.outcome, Outcome::Valid);
    }

    #[test]
    fn test_newsletter_already_subscribed_is_warning() {
        let mut dir = FakeDirectory::default();
        dir.subscribers.insert("ada@analytical.org".into());

        let again = newsletter_email("ada@analytical.org", &dir).unwrap();
        assert_eq!(again.outcome, Outcome::Warning);
        assert!(again.message.contains("already subscribed"));

        let role = newsletter_email("sales@analytical.org", &dir).unwrap();
        assert_eq!(role.outcome, Outcome::Warning);

        let bad = newsletter_email("user@example.com", &dir).unwrap();
        assert_eq!(bad.outcome, Outcome::Invalid);

        let fine = newsletter_email("grace@navy.mil", &dir).unwrap();
        assert_eq!(fine.outcome, Outcome::Valid);
    }

    #[test]
    fn test_contact_and_reset_hints() {
        let mut dir = FakeDirectory::default();
        dir.contacts.insert("ada@analytical.org".into());
        dir.accounts.insert("grace@navy.mil".into());

        assert_eq!(
            contact_email("ada@analytical.org", &dir).unwrap().outcome,
            Outcome::Warning
        );
        assert_eq!(
            contact_email("grace@navy.mil", &dir).unwrap().outcome,
            Outcome::Valid
        );
        assert_eq!(
            password_reset_email("grace@navy.mil", &dir).unwrap().outcome,
            Outcome::Valid
        );
        assert_eq!(
            password_reset_email("ada@analytical.org", &dir).unwrap().outcome,
            Outcome::Warning
        );
    }
}
