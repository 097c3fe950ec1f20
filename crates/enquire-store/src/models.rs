//! Domain model structs persisted in the SQLite database.
//!
//! Read models derive `Serialize` so the server can hand them straight to
//! JSON responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use enquire_shared::InquiryCategory;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account. Staff accounts may watch the live inquiry feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    /// Unique, compared case-insensitively.
    pub username: String,
    /// Lower-cased email address.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An opaque bearer token tied to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Newsletter subscription
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsletterSubscription {
    pub id: i64,
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Inquiry
// ---------------------------------------------------------------------------

/// A contact-form submission.
///
/// `resolved_at` is set exactly when `is_resolved` is true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inquiry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category: InquiryCategory,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_resolved: bool,
    pub resolved_by: Option<i64>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category: InquiryCategory,
    pub message: String,
}

/// Status filter for the staff listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    All,
    Pending,
    Resolved,
}

impl InquiryStatus {
    /// Unknown values fall back to `All`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "resolved" => Self::Resolved,
            _ => Self::All,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InquiryFilter {
    /// Case-insensitive substring over name, email and subject.
    pub query: Option<String>,
    pub status: InquiryStatus,
}

/// One page of results. Pages are numbered from 1.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_inquiries: u64,
    pub resolved_inquiries: u64,
    pub pending_inquiries: u64,
    pub newsletter_subscribers: u64,
}
