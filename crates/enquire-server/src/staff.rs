//! Staff-only JSON endpoints over the inquiry inbox.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use enquire_shared::protocol::InquiryCounts;
use enquire_store::{DashboardStats, Inquiry, InquiryFilter, InquiryStatus, Page};

use crate::api::AppState;
use crate::auth::Actor;
use crate::error::ServerError;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    q: Option<String>,
    status: Option<String>,
    page: Option<String>,
}

impl ListParams {
    fn filter(&self) -> InquiryFilter {
        InquiryFilter {
            query: self.q.clone(),
            status: self
                .status
                .as_deref()
                .map(InquiryStatus::parse)
                .unwrap_or_default(),
        }
    }

    /// Missing or malformed page numbers mean the first page.
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

pub async fn pending_count(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<InquiryCounts>, ServerError> {
    actor.require_privileged()?;
    let counts = state.db.call(|db| db.inquiry_counts()).await?;
    Ok(Json(counts))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Inquiry>>, ServerError> {
    actor.require_privileged()?;
    let filter = params.filter();
    let page = params.page();
    let listing = state
        .db
        .call(move |db| db.list_inquiries(&filter, page))
        .await?;
    Ok(Json(listing))
}

pub async fn resolve_contact(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> Result<Json<Inquiry>, ServerError> {
    actor.require_privileged()?;
    if id <= 0 {
        return Err(ServerError::BadRequest(format!("invalid inquiry id {id}")));
    }
    let resolver = actor.user_id();

    let (inquiry, counts) = state
        .db
        .call(move |db| {
            let inquiry = db.mark_resolved(id, resolver)?;
            Ok((inquiry, db.inquiry_counts()?))
        })
        .await?;

    info!(inquiry_id = id, actor = %actor, "inquiry resolved");
    state.hub.publish_counts(counts);
    Ok(Json(inquiry))
}

pub async fn dashboard(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<DashboardStats>, ServerError> {
    actor.require_privileged()?;
    let stats = state.db.call(|db| db.dashboard_stats()).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params() {
        let params = ListParams {
            q: Some("ada".into()),
            status: Some("resolved".into()),
            page: Some("3".into()),
        };
        assert_eq!(params.filter().status, InquiryStatus::Resolved);
        assert_eq!(params.page(), 3);

        let junk = ListParams {
            status: Some("weird".into()),
            page: Some("last".into()),
            ..Default::default()
        };
        assert_eq!(junk.filter().status, InquiryStatus::All);
        assert_eq!(junk.page(), 1);
    }
}
