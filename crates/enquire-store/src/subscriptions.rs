use chrono::Utc;
use rusqlite::params;

use crate::database::{parse_timestamp, Database};
use crate::error::{not_found, Result};
use crate::models::NewsletterSubscription;

impl Database {
    /// Subscribe an address, reactivating a previously cancelled one.
    pub fn subscribe(&self, email: &str) -> Result<NewsletterSubscription> {
        let email = email.trim().to_lowercase();
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO newsletter_subscriptions (email, subscribed_at, is_active)
             VALUES (?1, ?2, 1)
             ON CONFLICT(email) DO UPDATE SET
                 is_active = 1,
                 subscribed_at = CASE WHEN is_active = 1 THEN subscribed_at ELSE excluded.subscribed_at END",
            params![email, now.to_rfc3339()],
        )?;

        tracing::debug!(email = %email, "newsletter subscription stored");
        self.get_subscription(&email)
    }

    pub fn get_subscription(&self, email: &str) -> Result<NewsletterSubscription> {
        self.conn()
            .query_row(
                "SELECT id, email, subscribed_at, is_active
                 FROM newsletter_subscriptions WHERE email = ?1",
                params![email.trim().to_lowercase()],
                row_to_subscription,
            )
            .map_err(not_found)
    }

    /// Only active subscriptions count.
    pub fn is_subscribed(&self, email: &str) -> Result<bool> {
        let exists = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM newsletter_subscriptions
                           WHERE email = ?1 AND is_active = 1)",
            params![email.trim().to_lowercase()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Returns `false` when there was no active subscription to cancel.
    pub fn unsubscribe(&self, email: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE newsletter_subscriptions SET is_active = 0
             WHERE email = ?1 AND is_active = 1",
            params![email.trim().to_lowercase()],
        )?;
        Ok(affected > 0)
    }

    pub fn active_subscriber_count(&self) -> Result<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM newsletter_subscriptions WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn row_to_subscription(row: &rusqlite::Row<'_>) -> rusqlite::Result<NewsletterSubscription> {
    let subscribed_at: String = row.get(2)?;
    Ok(NewsletterSubscription {
        id: row.get(0)?,
        email: row.get(1)?,
        subscribed_at: parse_timestamp(2, &subscribed_at)?,
        is_active: row.get(3)?,
    })
}
