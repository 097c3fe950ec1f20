//! Field validators addressed by [`Field`] tag.
//!
//! Every validator trims its input, runs a fixed sequence of checks and
//! returns on the first failure, so a result always carries exactly one
//! message. The only state a validator touches is the read-only
//! [`Directory`] for existence lookups.

mod contact;
mod email;
mod identity;
mod password;
mod profile;

use std::collections::HashMap;

use crate::constants::{REPETITION_MAX_SHARE, REPETITION_MIN_TOKENS};
use crate::error::ValidationError;
use crate::types::{Field, ValidationRequest, ValidationResult};

pub use password::strength;

/// Existence lookups against the account and subscriber store.
///
/// Implementations compare case-insensitively; callers pass trimmed
/// values and lower-cased emails.
pub trait Directory {
    fn username_taken(&self, username: &str) -> Result<bool, ValidationError>;

    fn email_registered(&self, email: &str) -> Result<bool, ValidationError>;

    /// Only active subscriptions count.
    fn email_subscribed(&self, email: &str) -> Result<bool, ValidationError>;

    fn email_has_contacted(&self, email: &str) -> Result<bool, ValidationError>;
}

/// Run the validator for `request.field`.
///
/// Blank input is the caller's concern (see [`ValidationRequest::is_blank`]);
/// validators given blank input simply fail their first check.
pub fn validate(
    request: &ValidationRequest,
    directory: &dyn Directory,
) -> Result<ValidationResult, ValidationError> {
    let value = request.value.trim();

    let result = match request.field {
        Field::Name | Field::FirstName | Field::LastName => {
            identity::name(value, request.field.label())
        }
        Field::Username => identity::username(value, directory)?,
        Field::LoginUsername => identity::login_username(value, directory)?,
        Field::Location => identity::location(value),
        Field::ContactEmail => email::contact_email(value, directory)?,
        Field::RegistrationEmail => email::registration_email(value, directory)?,
        Field::NewsletterEmail => email::newsletter_email(value, directory)?,
        Field::PasswordResetEmail => email::password_reset_email(value, directory)?,
        Field::Password => password::password(value, request.username.as_deref()),
        Field::PasswordConfirm => {
            password::confirmation(request.password1.as_deref().unwrap_or(""), &request.value)
        }
        Field::Subject => contact::subject(value),
        Field::Message => contact::message(value),
        Field::Phone => profile::phone(value),
        Field::Website => profile::website(value),
    };

    Ok(result)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn alpha_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// True when one meaningful word (longer than two characters) makes up
/// more than the allowed share of all tokens. Short texts are never judged.
fn is_repetitive(text: &str) -> bool {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.len() <= REPETITION_MIN_TOKENS {
        return false;
    }

    let mut freq: HashMap<&str, usize> = HashMap::new();
    for token in tokens.iter().filter(|t| t.chars().count() > 2) {
        *freq.entry(token).or_default() += 1;
    }

    let limit = tokens.len() as f64 * REPETITION_MAX_SHARE;
    freq.values().any(|&count| count as f64 > limit)
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashSet;

    use super::Directory;
    use crate::error::ValidationError;

    /// In-memory directory for validator tests.
    #[derive(Default)]
    pub struct FakeDirectory {
        pub usernames: HashSet<String>,
        pub accounts: HashSet<String>,
        pub subscribers: HashSet<String>,
        pub contacts: HashSet<String>,
        pub offline: bool,
    }

    impl FakeDirectory {
        fn check(&self, set: &HashSet<String>, value: &str) -> Result<bool, ValidationError> {
            if self.offline {
                return Err(ValidationError::Lookup("store offline".into()));
            }
            Ok(set.contains(&value.to_lowercase()))
        }
    }

    impl Directory for FakeDirectory {
        fn username_taken(&self, username: &str) -> Result<bool, ValidationError> {
            self.check(&self.usernames, username)
        }

        fn email_registered(&self, email: &str) -> Result<bool, ValidationError> {
            self.check(&self.accounts, email)
        }

        fn email_subscribed(&self, email: &str) -> Result<bool, ValidationError> {
            self.check(&self.subscribers, email)
        }

        fn email_has_contacted(&self, email: &str) -> Result<bool, ValidationError> {
            self.check(&self.contacts, email)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeDirectory;
    use super::*;
    use crate::types::Outcome;

    #[test]
    fn test_dispatch_trims_before_checking() {
        let dir = FakeDirectory::default();
        let req = ValidationRequest::new(Field::Name, "   Grace Hopper  ");
        let result = validate(&req, &dir).unwrap();
        assert_eq!(result.outcome, Outcome::Valid);
        assert_eq!(result.message, "✓ Name looks good!");
    }

    #[test]
    fn test_first_name_uses_its_label() {
        let dir = FakeDirectory::default();
        let req = ValidationRequest::new(Field::FirstName, "J");
        let result = validate(&req, &dir).unwrap();
        assert_eq!(result.message, "First name must be at least 2 characters long");
    }

    #[test]
    fn test_same_request_same_result() {
        let mut dir = FakeDirectory::default();
        dir.usernames.insert("taken_name".into());

        for (field, value) in [
            (Field::Username, "taken_name"),
            (Field::Username, "fresh_name"),
            (Field::Password, "password"),
            (Field::Message, "hello there friend, how are you"),
            (Field::Website, "rust-lang.org"),
        ] {
            let req = ValidationRequest::new(field, value);
            let first = validate(&req, &dir).unwrap();
            let second = validate(&req, &dir).unwrap();
            assert_eq!(first, second, "{field} was not idempotent");
        }
    }

    #[test]
    fn test_lookup_failure_propagates() {
        let dir = FakeDirectory {
            offline: true,
            ..Default::default()
        };
        let req = ValidationRequest::new(Field::Username, "someone");
        assert!(matches!(
            validate(&req, &dir),
            Err(ValidationError::Lookup(_))
        ));
    }

    #[test]
    fn test_repetition_heuristic() {
        assert!(!is_repetitive("spam spam spam spam"));
        assert!(is_repetitive(
            "buy buy buy buy buy now please today friend right away"
        ));
        assert!(!is_repetitive(
            "one two three four five six seven eight nine ten eleven"
        ));
    }
}
