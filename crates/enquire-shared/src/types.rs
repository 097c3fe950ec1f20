use std::fmt;

use serde::{Deserialize, Serialize};

/// Which form a validation route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormScope {
    /// Public contact, newsletter and profile forms (`/validate/...`).
    Core,
    /// Registration and login forms (`/accounts/validate/...`).
    Accounts,
}

/// A live-validated form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    FirstName,
    LastName,
    Username,
    LoginUsername,
    ContactEmail,
    RegistrationEmail,
    NewsletterEmail,
    PasswordResetEmail,
    Password,
    PasswordConfirm,
    Subject,
    Message,
    Phone,
    Website,
    Location,
}

impl Field {
    /// Resolve the last path segment of a validation route.
    pub fn from_route(scope: FormScope, segment: &str) -> Option<Self> {
        let field = match (scope, segment) {
            (FormScope::Core, "name") => Self::Name,
            (FormScope::Core, "email") => Self::ContactEmail,
            (FormScope::Core, "subject") => Self::Subject,
            (FormScope::Core, "message") => Self::Message,
            (FormScope::Core, "newsletter-email") => Self::NewsletterEmail,
            (FormScope::Core, "phone-number" | "phone_number") => Self::Phone,
            (FormScope::Core, "website") => Self::Website,
            (FormScope::Core, "location") => Self::Location,
            (FormScope::Accounts, "username") => Self::Username,
            (FormScope::Accounts, "login-username") => Self::LoginUsername,
            (FormScope::Accounts, "first-name" | "first_name") => Self::FirstName,
            (FormScope::Accounts, "last-name" | "last_name") => Self::LastName,
            (FormScope::Accounts, "email") => Self::RegistrationEmail,
            (FormScope::Accounts, "password-reset-email") => Self::PasswordResetEmail,
            (FormScope::Accounts, "password" | "password1") => Self::Password,
            (FormScope::Accounts, "password2") => Self::PasswordConfirm,
            _ => return None,
        };
        Some(field)
    }

    /// Stable tag used in logs.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Username => "username",
            Self::LoginUsername => "login-username",
            Self::ContactEmail => "email",
            Self::RegistrationEmail => "registration-email",
            Self::NewsletterEmail => "newsletter-email",
            Self::PasswordResetEmail => "password-reset-email",
            Self::Password => "password1",
            Self::PasswordConfirm => "password2",
            Self::Subject => "subject",
            Self::Message => "message",
            Self::Phone => "phone_number",
            Self::Website => "website",
            Self::Location => "location",
        }
    }

    /// Name of the form input carrying this field's value.
    pub fn form_key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Username | Self::LoginUsername => "username",
            Self::ContactEmail
            | Self::RegistrationEmail
            | Self::NewsletterEmail
            | Self::PasswordResetEmail => "email",
            Self::Password => "password1",
            Self::PasswordConfirm => "password2",
            Self::Subject => "subject",
            Self::Message => "message",
            Self::Phone => "phone_number",
            Self::Website => "website",
            Self::Location => "location",
        }
    }

    /// Human label used in messages ("First name must be ...").
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Username | Self::LoginUsername => "Username",
            Self::ContactEmail
            | Self::RegistrationEmail
            | Self::NewsletterEmail
            | Self::PasswordResetEmail => "Email",
            Self::Password => "Password",
            Self::PasswordConfirm => "Password confirmation",
            Self::Subject => "Subject",
            Self::Message => "Message",
            Self::Phone => "Phone number",
            Self::Website => "Website",
            Self::Location => "Location",
        }
    }

    /// Password-family fields are never logged verbatim.
    pub fn is_sensitive(self) -> bool {
        matches!(self, Self::Password | Self::PasswordConfirm)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Verdict of a single validator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Valid,
    Invalid,
    Warning,
}

/// Password strength detail attached to `password1` results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthReport {
    /// 0..=5
    pub score: u8,
    /// Missing criteria and pattern advice, in check order.
    pub feedback: Vec<String>,
}

impl StrengthReport {
    pub fn label(&self) -> &'static str {
        if self.is_strong() {
            "Strong"
        } else if self.is_acceptable() {
            "Good"
        } else if self.score == 2 {
            "Fair"
        } else {
            "Weak"
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.score >= 3
    }

    pub fn is_strong(&self) -> bool {
        self.score >= 4
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub outcome: Outcome,
    pub message: String,
    pub strength: Option<StrengthReport>,
}

impl ValidationResult {
    pub fn valid(message: impl Into<String>) -> Self {
        Self::with(Outcome::Valid, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::with(Outcome::Invalid, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with(Outcome::Warning, message)
    }

    fn with(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
            strength: None,
        }
    }

    pub fn with_strength(mut self, report: StrengthReport) -> Self {
        self.strength = Some(report);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.outcome == Outcome::Valid
    }
}

/// One keystroke-triggered validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub field: Field,
    pub value: String,
    /// First password entry, consulted by `password2`.
    pub password1: Option<String>,
    /// Username typed in the same form, consulted by `password1`.
    pub username: Option<String>,
}

impl ValidationRequest {
    pub fn new(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            password1: None,
            username: None,
        }
    }

    pub fn with_password1(mut self, password1: impl Into<String>) -> Self {
        self.password1 = Some(password1.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Whether the adapter should skip validation and render nothing.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Category code stored on an inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InquiryCategory {
    #[default]
    General,
    Support,
    Feedback,
    Business,
    Other,
}

impl InquiryCategory {
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::Support,
        Self::Feedback,
        Self::Business,
        Self::Other,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Support => "support",
            Self::Feedback => "feedback",
            Self::Business => "business",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General Inquiry",
            Self::Support => "Technical Support",
            Self::Feedback => "Feedback",
            Self::Business => "Business Inquiry",
            Self::Other => "Other",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}
