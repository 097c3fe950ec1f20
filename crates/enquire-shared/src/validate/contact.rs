use super::{char_len, contains_any, is_repetitive};
use crate::constants::{
    MESSAGE_LEN, MESSAGE_MAX_LINKS, MESSAGE_MIN_WORDS, MESSAGE_SPAM_TOKENS, SUBJECT_LEN,
    SUBJECT_MIN_WORDS, SUBJECT_SPAM_TOKENS,
};
use crate::types::ValidationResult;

pub(super) fn subject(value: &str) -> ValidationResult {
    let (min, max) = SUBJECT_LEN;
    let len = char_len(value);

    if len < min {
        return ValidationResult::invalid(format!("Subject must be at least {min} characters"));
    }
    if len > max {
        return ValidationResult::invalid(format!("Subject must be at most {max} characters"));
    }

    let words = value.split_whitespace().count();
    if words < SUBJECT_MIN_WORDS {
        return ValidationResult::invalid(format!(
            "Subject should contain at least {SUBJECT_MIN_WORDS} words"
        ));
    }
    if contains_any(&value.to_uppercase(), SUBJECT_SPAM_TOKENS) {
        return ValidationResult::invalid(
            "Subject appears to be spam. Please use a professional subject line",
        );
    }
    if is_repetitive(value) {
        return ValidationResult::invalid("Subject contains excessive repetition");
    }

    ValidationResult::valid(format!("✓ Subject looks good! ({words} words)"))
}

pub(super) fn message(value: &str) -> ValidationResult {
    let (min, max) = MESSAGE_LEN;
    let len = char_len(value);

    if len < min {
        return ValidationResult::invalid(format!("Message must be at least {min} characters"));
    }
    if len > max {
        return ValidationResult::invalid(format!("Message must be at most {max} characters"));
    }

    let words = value.split_whitespace().count();
    if words < MESSAGE_MIN_WORDS {
        return ValidationResult::invalid(format!(
            "Message should contain at least {MESSAGE_MIN_WORDS} words"
        ));
    }

    let lowered = value.to_lowercase();
    if contains_any(&lowered, MESSAGE_SPAM_TOKENS) {
        return ValidationResult::invalid("Message appears to be spam");
    }
    if is_repetitive(value) {
        return ValidationResult::invalid("Message contains excessive repetition");
    }
    if lowered.matches("http").count() > MESSAGE_MAX_LINKS {
        return ValidationResult::invalid("Message contains too many links");
    }

    ValidationResult::valid(format!("✓ Message looks good! ({words} words)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    #[test]
    fn test_subject_rules() {
        assert_eq!(subject("Hi").message, "Subject must be at least 5 characters");
        assert_eq!(
            subject("Supercalifragilistic").message,
            "Subject should contain at least 2 words"
        );
        assert_eq!(
            subject("Act now for a deal").message,
            "Subject appears to be spam. Please use a professional subject line"
        );
        assert_eq!(subject("Billing question").outcome, Outcome::Valid);
        assert_eq!(
            subject("Billing question").message,
            "✓ Subject looks good! (2 words)"
        );
        assert_eq!(subject(&"ab ".repeat(80)).outcome, Outcome::Invalid);
    }

    #[test]
    fn test_message_rules() {
        assert_eq!(message("Too short").message, "Message must be at least 10 characters");
        assert_eq!(
            message("Hello-there-friend").message,
            "Message should contain at least 3 words"
        );
        assert_eq!(
            message("You won the lottery today").message,
            "Message appears to be spam"
        );
        assert_eq!(
            message("see http://a.io http://b.io http://c.io http://d.io").message,
            "Message contains too many links"
        );
        assert_eq!(
            message("see http://a.io http://b.io and http://c.io please").outcome,
            Outcome::Valid
        );
        assert_eq!(
            message("help help help help help me with the order number twelve").message,
            "Message contains excessive repetition"
        );
        assert_eq!(
            message("I would like to ask about the invoice").outcome,
            Outcome::Valid
        );
        assert_eq!(message(&"word ".repeat(401)).outcome, Outcome::Invalid);
    }
}
