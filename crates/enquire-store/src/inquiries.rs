use chrono::Utc;
use rusqlite::params;

use enquire_shared::constants::INQUIRIES_PER_PAGE;
use enquire_shared::protocol::InquiryCounts;
use enquire_shared::InquiryCategory;

use crate::database::{parse_timestamp, Database};
use crate::error::{not_found, Result, StoreError};
use crate::models::{DashboardStats, Inquiry, InquiryFilter, InquiryStatus, NewInquiry, Page};

const INQUIRY_COLUMNS: &str = "id, name, email, subject, category, message, created_at, \
                               is_resolved, resolved_by, resolved_at";

/// Shared WHERE clause: ?1 is an optional LIKE pattern, ?2 an optional
/// resolved flag.
const FILTER_SQL: &str = "(?1 IS NULL
                            OR name LIKE ?1 ESCAPE '\\'
                            OR email LIKE ?1 ESCAPE '\\'
                            OR subject LIKE ?1 ESCAPE '\\')
                           AND (?2 IS NULL OR is_resolved = ?2)";

impl Database {
    pub fn insert_inquiry(&self, inquiry: &NewInquiry) -> Result<Inquiry> {
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO inquiries (name, email, subject, category, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                inquiry.name.trim(),
                inquiry.email.trim().to_lowercase(),
                inquiry.subject.trim(),
                inquiry.category.code(),
                inquiry.message.trim(),
                now.to_rfc3339(),
            ],
        )?;

        let id = self.conn().last_insert_rowid();
        tracing::info!(inquiry_id = id, category = inquiry.category.code(), "inquiry stored");
        self.get_inquiry(id)
    }

    pub fn get_inquiry(&self, id: i64) -> Result<Inquiry> {
        self.conn()
            .query_row(
                &format!("SELECT {INQUIRY_COLUMNS} FROM inquiries WHERE id = ?1"),
                params![id],
                row_to_inquiry,
            )
            .map_err(not_found)
    }

    pub fn inquiry_counts(&self) -> Result<InquiryCounts> {
        let (total, pending): (i64, i64) = self.conn().query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN is_resolved = 0 THEN 1 ELSE 0 END), 0)
             FROM inquiries",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(InquiryCounts {
            pending_count: pending as u64,
            total_count: total as u64,
        })
    }

    pub fn email_has_contacted(&self, email: &str) -> Result<bool> {
        let exists = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM inquiries WHERE email = ?1)",
            params![email.trim().to_lowercase()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Newest first, `INQUIRIES_PER_PAGE` per page. Out-of-range page
    /// numbers are clamped to the nearest existing page.
    pub fn list_inquiries(&self, filter: &InquiryFilter, page: u32) -> Result<Page<Inquiry>> {
        let pattern = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);
        let resolved: Option<bool> = match filter.status {
            InquiryStatus::All => None,
            InquiryStatus::Pending => Some(false),
            InquiryStatus::Resolved => Some(true),
        };

        let total_items: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM inquiries WHERE {FILTER_SQL}"),
            params![pattern, resolved],
            |row| row.get(0),
        )?;
        let total_items = total_items as u64;

        let per_page = u64::from(INQUIRIES_PER_PAGE);
        let total_pages = total_items.div_ceil(per_page).max(1) as u32;
        let page = page.clamp(1, total_pages);
        let offset = (page - 1) * INQUIRIES_PER_PAGE;

        let mut stmt = self.conn().prepare(&format!(
            "SELECT {INQUIRY_COLUMNS} FROM inquiries
             WHERE {FILTER_SQL}
             ORDER BY created_at DESC, id DESC
             LIMIT ?3 OFFSET ?4"
        ))?;

        let rows = stmt.query_map(
            params![pattern, resolved, INQUIRIES_PER_PAGE, offset],
            row_to_inquiry,
        )?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }

        Ok(Page {
            items,
            page,
            total_pages,
            total_items,
        })
    }

    /// Mark an inquiry resolved. Already-resolved inquiries keep their
    /// original resolver and timestamp.
    pub fn mark_resolved(&self, id: i64, resolved_by: Option<i64>) -> Result<Inquiry> {
        let affected = self.conn().execute(
            "UPDATE inquiries SET is_resolved = 1, resolved_at = ?2, resolved_by = ?3
             WHERE id = ?1 AND is_resolved = 0",
            params![id, Utc::now().to_rfc3339(), resolved_by],
        )?;

        if affected > 0 {
            tracing::info!(inquiry_id = id, resolved_by, "inquiry resolved");
        }
        self.get_inquiry(id)
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        let counts = self.inquiry_counts()?;
        Ok(DashboardStats {
            total_inquiries: counts.total_count,
            resolved_inquiries: counts.total_count - counts.pending_count,
            pending_inquiries: counts.pending_count,
            newsletter_subscribers: self.active_subscriber_count()?,
        })
    }
}

/// `%query%` with LIKE wildcards in the query escaped.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn row_to_inquiry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Inquiry> {
    let category: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    let resolved_at: Option<String> = row.get(9)?;

    let category = InquiryCategory::from_code(&category).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::new(StoreError::Migration(format!("unknown category {category}"))),
        )
    })?;

    Ok(Inquiry {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        category,
        message: row.get(5)?,
        created_at: parse_timestamp(6, &created_at)?,
        is_resolved: row.get(7)?,
        resolved_by: row.get(8)?,
        resolved_at: resolved_at
            .as_deref()
            .map(|raw| parse_timestamp(9, raw))
            .transpose()?,
    })
}
