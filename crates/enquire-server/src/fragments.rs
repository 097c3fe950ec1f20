//! HTML fragments swapped into the page by client-side script.

use serde::Serialize;
use tera::{Context, Tera};

use enquire_shared::{Outcome, ValidationResult};

mod embedded {
    pub const SUCCESS_HTML: &str = include_str!("../templates/fragments/validation_success.html");
    pub const WARNING_HTML: &str = include_str!("../templates/fragments/validation_warning.html");
    pub const ERROR_HTML: &str = include_str!("../templates/fragments/validation_error.html");
    pub const STRENGTH_HTML: &str = include_str!("../templates/fragments/password_strength.html");
    pub const SUBMITTED_HTML: &str =
        include_str!("../templates/fragments/submission_success.html");
    pub const REJECTED_HTML: &str = include_str!("../templates/fragments/submission_errors.html");
}

/// Served when a template itself fails to render.
const FALLBACK_HTML: &str =
    r#"<div class="validation-feedback invalid-feedback d-block" role="alert">Validation failed</div>"#;

/// One rejected field of a submitted form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub label: String,
    pub message: String,
}

pub struct Fragments {
    tera: Tera,
}

impl Fragments {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        // Autoescaping applies to the `.html` names.
        tera.add_raw_templates(vec![
            ("validation_success.html", embedded::SUCCESS_HTML),
            ("validation_warning.html", embedded::WARNING_HTML),
            ("validation_error.html", embedded::ERROR_HTML),
            ("password_strength.html", embedded::STRENGTH_HTML),
            ("submission_success.html", embedded::SUBMITTED_HTML),
            ("submission_errors.html", embedded::REJECTED_HTML),
        ])?;
        Ok(Self { tera })
    }

    /// Success, warning or error fragment chosen by the outcome tag.
    pub fn validation(&self, result: &ValidationResult) -> String {
        let template = match result.outcome {
            Outcome::Valid => "validation_success.html",
            Outcome::Warning => "validation_warning.html",
            Outcome::Invalid => "validation_error.html",
        };
        self.message(template, &result.message)
    }

    pub fn error(&self, message: &str) -> String {
        self.message("validation_error.html", message)
    }

    pub fn warning(&self, message: &str) -> String {
        self.message("validation_warning.html", message)
    }

    /// Score meter with the missing criteria. Results without a strength
    /// report fall back to the plain fragment.
    pub fn strength(&self, result: &ValidationResult) -> String {
        let Some(report) = &result.strength else {
            return self.validation(result);
        };

        let tone = match report.score {
            0 | 1 => "danger",
            2 => "warning",
            3 => "info",
            _ => "success",
        };

        let mut context = Context::new();
        context.insert("score", &report.score);
        context.insert("percent", &(u32::from(report.score) * 20));
        context.insert("tone", tone);
        context.insert("label", report.label());
        context.insert("message", &result.message);
        context.insert("feedback", &report.feedback);
        self.render("password_strength.html", &context)
    }

    pub fn submitted(&self, heading: &str, message: &str) -> String {
        let mut context = Context::new();
        context.insert("heading", heading);
        context.insert("message", message);
        self.render("submission_success.html", &context)
    }

    pub fn rejected(&self, errors: &[FieldError]) -> String {
        let mut context = Context::new();
        context.insert("errors", errors);
        self.render("submission_errors.html", &context)
    }

    fn message(&self, template: &str, message: &str) -> String {
        let mut context = Context::new();
        context.insert("message", message);
        self.render(template, &context)
    }

    fn render(&self, template: &str, context: &Context) -> String {
        match self.tera.render(template, context) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(template, error = %e, "fragment rendering failed");
                FALLBACK_HTML.to_string()
            }
        }
    }
}
