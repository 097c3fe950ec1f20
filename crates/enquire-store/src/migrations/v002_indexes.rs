//! v002 -- Lookup indexes for the validators and the staff listing.

use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

CREATE INDEX IF NOT EXISTS idx_inquiries_email_created
    ON inquiries(email, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_inquiries_created ON inquiries(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_inquiries_resolved_created
    ON inquiries(is_resolved, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_inquiries_category_created
    ON inquiries(category, created_at DESC);

CREATE INDEX IF NOT EXISTS idx_newsletter_active_subscribed
    ON newsletter_subscriptions(is_active, subscribed_at DESC);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
