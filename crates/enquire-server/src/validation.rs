//! Keystroke-driven field validation.
//!
//! `POST /validate/:field` serves the contact, newsletter and profile forms;
//! `POST /accounts/validate/:field` serves registration and login. Bodies are
//! URL-encoded forms. A blank value renders nothing and is not logged.
//! Every other call is logged and answered with exactly one fragment, and
//! no fault ever escapes as anything other than the error fragment.

use std::collections::HashMap;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::Html,
    Form,
};
use tracing::{error, info, warn};

use enquire_shared::constants::{LOG_VALUE_CHARS, REDACTED};
use enquire_shared::{validate, Field, FormScope, ValidationRequest};

use crate::api::AppState;
use crate::auth::Actor;
use crate::error::ServerError;
use crate::rate_limit::ClientIp;

pub async fn validate_core(
    state: State<AppState>,
    actor: Actor,
    ip: ClientIp,
    Path(segment): Path<String>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, ServerError> {
    respond(state, actor, ip, FormScope::Core, &segment, form).await
}

pub async fn validate_accounts(
    state: State<AppState>,
    actor: Actor,
    ip: ClientIp,
    Path(segment): Path<String>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, ServerError> {
    respond(state, actor, ip, FormScope::Accounts, &segment, form).await
}

async fn respond(
    State(state): State<AppState>,
    actor: Actor,
    ip: ClientIp,
    scope: FormScope,
    segment: &str,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, ServerError> {
    let field = Field::from_route(scope, segment)
        .ok_or_else(|| ServerError::NotFound(format!("no validator for `{segment}`")))?;

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(field = %field, actor = %actor, ip = %ip, error = %rejection, "unreadable validation body");
            return Ok(Html(state.fragments.error("Validation failed")));
        }
    };

    let request = build_request(field, segment, form);
    if request.is_blank() {
        return Ok(Html(String::new()));
    }

    let logged_value = loggable(&request);
    let outcome = state
        .db
        .with(move |db| validate(&request, db))
        .await
        .map_err(|e| e.to_string())
        .and_then(|result| result.map_err(|e| e.to_string()));

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!(field = %field, actor = %actor, ip = %ip, error = %e, "validation failed");
            return Ok(Html(state.fragments.error("Validation failed")));
        }
    };

    info!(
        field = %field,
        valid = result.is_valid(),
        outcome = ?result.outcome,
        actor = %actor,
        ip = %ip,
        value = %logged_value,
        "validation attempt"
    );

    let html = match field {
        Field::Password => state.fragments.strength(&result),
        _ => state.fragments.validation(&result),
    };
    Ok(Html(html))
}

/// Pick the field's value out of the posted form, along with the sibling
/// values the password validators consult.
fn build_request(field: Field, segment: &str, mut form: HashMap<String, String>) -> ValidationRequest {
    let value = form
        .remove(field.form_key())
        .or_else(|| form.remove(segment))
        .unwrap_or_default();
    let mut request = ValidationRequest::new(field, value);

    match field {
        Field::PasswordConfirm => {
            request = request.with_password1(form.remove("password1").unwrap_or_default());
        }
        Field::Password => {
            if let Some(username) = form.remove("username").filter(|u| !u.trim().is_empty()) {
                request = request.with_username(username);
            }
        }
        _ => {}
    }

    request
}

fn loggable(request: &ValidationRequest) -> String {
    if request.field.is_sensitive() {
        REDACTED.to_string()
    } else {
        request.value.trim().chars().take(LOG_VALUE_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_request_reads_form_key_then_segment() {
        let request = build_request(
            Field::NewsletterEmail,
            "newsletter-email",
            form(&[("newsletter-email", "reader@lumiere.fr")]),
        );
        assert_eq!(request.value, "reader@lumiere.fr");

        let request = build_request(
            Field::NewsletterEmail,
            "newsletter-email",
            form(&[("email", "a@b.fr"), ("newsletter-email", "c@d.fr")]),
        );
        assert_eq!(request.value, "a@b.fr");
    }

    #[test]
    fn test_password_siblings() {
        let confirm = build_request(
            Field::PasswordConfirm,
            "password2",
            form(&[("password1", "abc123"), ("password2", "abc123")]),
        );
        assert_eq!(confirm.password1.as_deref(), Some("abc123"));

        let first = build_request(
            Field::Password,
            "password1",
            form(&[("password1", "Secret!1"), ("username", "  ")]),
        );
        assert!(first.username.is_none());
    }

    #[test]
    fn test_logged_values_are_redacted_or_truncated() {
        let secret = ValidationRequest::new(Field::Password, "hunter2");
        assert_eq!(loggable(&secret), "***");

        let confirm = ValidationRequest::new(Field::PasswordConfirm, "hunter2");
        assert_eq!(loggable(&confirm), "***");

        let long = ValidationRequest::new(Field::Message, "y".repeat(80));
        assert_eq!(loggable(&long).len(), 50);
    }
}
