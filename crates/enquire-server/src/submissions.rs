//! Full-form submissions: the contact form and the newsletter signup.

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use tracing::{error, info, warn};

use enquire_shared::{validate, Directory, Field, InquiryCategory, Outcome, ValidationRequest};
use enquire_store::{Database, Inquiry, NewInquiry};

use crate::api::AppState;
use crate::auth::Actor;
use crate::db::SharedDb;
use crate::error::ServerError;
use crate::fragments::FieldError;
use crate::notify::NotificationHub;
use crate::rate_limit::ClientIp;

const REQUIRED: &str = "This field is required.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsletterForm {
    #[serde(default)]
    pub email: String,
}

pub async fn submit_contact(
    State(state): State<AppState>,
    actor: Actor,
    ip: ClientIp,
    Form(form): Form<ContactForm>,
) -> Html<String> {
    let checked = state
        .db
        .with(move |db| check_contact(&form, db))
        .await
        .and_then(|r| r.map_err(|e| ServerError::Internal(e.to_string())));

    let created = match checked {
        Ok(Err(errors)) => {
            warn!(actor = %actor, ip = %ip, rejected = errors.len(), "invalid contact submission");
            return Html(state.fragments.rejected(&errors));
        }
        Ok(Ok(inquiry)) => create_inquiry(&state.db, &state.hub, inquiry).await,
        Err(e) => Err(e),
    };

    match created {
        Ok(inquiry) => {
            info!(inquiry_id = inquiry.id, actor = %actor, ip = %ip, "new contact created");
            Html(state.fragments.submitted(
                &format!("Thank you {}!", inquiry.name),
                &format!(
                    "Your inquiry has been submitted successfully. Reference ID: #{}",
                    inquiry.id
                ),
            ))
        }
        Err(e) => {
            error!(actor = %actor, ip = %ip, error = %e, "contact submission failed");
            Html(state.fragments.error(
                "An error occurred while submitting your message. Please try again.",
            ))
        }
    }
}

/// Store the inquiry, then tell every connected staff member about it.
///
/// Delivery is best-effort: once the row is written the call succeeds,
/// whatever happens to the notifications.
pub async fn create_inquiry(
    db: &SharedDb,
    hub: &NotificationHub,
    inquiry: NewInquiry,
) -> Result<Inquiry, ServerError> {
    let inquiry = db.call(move |db| db.insert_inquiry(&inquiry)).await?;

    match db.call(|db| db.inquiry_counts()).await {
        Ok(counts) => {
            hub.publish_new_inquiry(&inquiry, counts);
        }
        Err(e) => {
            error!(inquiry_id = inquiry.id, error = %e, "skipping new contact notification");
        }
    }

    Ok(inquiry)
}

/// Run every contact field through its validator. Advisory results do not
/// block the submission.
fn check_contact(
    form: &ContactForm,
    directory: &dyn Directory,
) -> Result<Result<NewInquiry, Vec<FieldError>>, enquire_shared::ValidationError> {
    let mut errors = Vec::new();

    for (field, value) in [
        (Field::Name, &form.name),
        (Field::ContactEmail, &form.email),
        (Field::Subject, &form.subject),
        (Field::Message, &form.message),
    ] {
        let request = ValidationRequest::new(field, value.as_str());
        if request.is_blank() {
            errors.push(field_error(field.label(), REQUIRED));
            continue;
        }
        let result = validate(&request, directory)?;
        if result.outcome == Outcome::Invalid {
            errors.push(field_error(field.label(), &result.message));
        }
    }

    let category = match form.category.as_deref().map(str::trim) {
        None | Some("") => InquiryCategory::default(),
        Some(code) => InquiryCategory::from_code(code).unwrap_or_else(|| {
            errors.push(field_error(
                "Category",
                &format!("Select a valid choice. {code} is not one of the available choices."),
            ));
            InquiryCategory::default()
        }),
    };

    if !errors.is_empty() {
        return Ok(Err(errors));
    }

    Ok(Ok(NewInquiry {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        subject: form.subject.trim().to_string(),
        category,
        message: form.message.trim().to_string(),
    }))
}

fn field_error(label: &str, message: &str) -> FieldError {
    FieldError {
        label: label.to_string(),
        message: message.to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Signup {
    Rejected(String),
    AlreadySubscribed,
    Subscribed,
}

pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    ip: ClientIp,
    Form(form): Form<NewsletterForm>,
) -> Html<String> {
    let outcome = state
        .db
        .with(move |db| signup(&form.email, db))
        .await
        .and_then(|r| r);

    let html = match outcome {
        Ok(Signup::Rejected(message)) => state.fragments.error(&message),
        Ok(Signup::AlreadySubscribed) => state
            .fragments
            .warning("This email address is already subscribed to our newsletter."),
        Ok(Signup::Subscribed) => {
            info!(ip = %ip, "new newsletter subscription");
            state.fragments.submitted(
                "Subscribed!",
                "Successfully subscribed to our newsletter! Thank you for joining our community.",
            )
        }
        Err(e) => {
            error!(ip = %ip, error = %e, "newsletter subscription failed");
            state.fragments.error("An error occurred. Please try again later.")
        }
    };
    Html(html)
}

fn signup(email: &str, db: &Database) -> Result<Signup, ServerError> {
    let request = ValidationRequest::new(Field::NewsletterEmail, email);
    if request.is_blank() {
        return Ok(Signup::Rejected(REQUIRED.to_string()));
    }

    let result = validate(&request, db).map_err(|e| ServerError::Internal(e.to_string()))?;
    if result.outcome == Outcome::Invalid {
        return Ok(Signup::Rejected(result.message));
    }

    if db.is_subscribed(email)? {
        return Ok(Signup::AlreadySubscribed);
    }

    db.subscribe(email)?;
    Ok(Signup::Subscribed)
}
