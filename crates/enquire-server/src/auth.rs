//! Caller identity resolved per request.
//!
//! Credentials are looked up in order: `Authorization: Bearer <token>`,
//! the `session` cookie, then a `token` query parameter (browsers cannot
//! set headers on WebSocket handshakes). The configured admin token acts as
//! a staff member; any other credential must match a stored session.

use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use subtle::ConstantTimeEq;

use crate::api::AppState;
use crate::error::ServerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User {
        id: i64,
        username: String,
        is_staff: bool,
    },
    /// Authenticated with the configured `ADMIN_TOKEN`.
    Service,
}

impl Actor {
    /// Whether this caller may watch the live feed and use the staff API.
    pub fn is_privileged(&self) -> bool {
        match self {
            Actor::Anonymous => false,
            Actor::User { is_staff, .. } => *is_staff,
            Actor::Service => true,
        }
    }

    /// Account to record as resolver, if any.
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Actor::User { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Actor::User { username, .. } => Some(username.as_str()),
            _ => None,
        }
    }

    pub fn require_privileged(&self) -> Result<(), ServerError> {
        if self.is_privileged() {
            Ok(())
        } else {
            Err(ServerError::Forbidden("Permission denied".into()))
        }
    }
}

/// Identity used in log lines.
impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Anonymous => f.write_str("anonymous"),
            Actor::User { id, .. } => write!(f, "user:{id}"),
            Actor::Service => f.write_str("admin-token"),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = credential(parts) else {
            return Ok(Actor::Anonymous);
        };

        if let Some(expected) = state.config.admin_token.as_deref() {
            if tokens_match(&token, expected) {
                return Ok(Actor::Service);
            }
        }

        match state.db.call(move |db| db.user_for_session(&token)).await {
            Ok(Some(user)) => Ok(Actor::User {
                id: user.id,
                username: user.username,
                is_staff: user.is_staff,
            }),
            Ok(None) => Ok(Actor::Anonymous),
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed, treating caller as anonymous");
                Ok(Actor::Anonymous)
            }
        }
    }
}

fn credential(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let cookie = || {
        parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == "session")
            .map(|(_, value)| value.trim())
    };

    let query = || {
        parts.uri.query().and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "token")
                .map(|(_, value)| value.into_owned())
        })
    };

    bearer
        .or_else(cookie)
        .map(str::to_string)
        .or_else(query)
        .filter(|t| !t.is_empty())
}

// Constant-time comparison to prevent timing attacks on the admin token.
fn tokens_match(given: &str, expected: &str) -> bool {
    let given = given.as_bytes();
    let expected = expected.as_bytes();
    given.len() == expected.len() && given.ct_eq(expected).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_credential_sources() {
        let bearer = parts(Request::get("/").header("authorization", "Bearer abc"));
        assert_eq!(credential(&bearer).as_deref(), Some("abc"));

        let cookie = parts(Request::get("/").header("cookie", "theme=dark; session=s1"));
        assert_eq!(credential(&cookie).as_deref(), Some("s1"));

        let query = parts(Request::get("/ws/notifications?token=q%2B1"));
        assert_eq!(credential(&query).as_deref(), Some("q+1"));

        let both = parts(
            Request::get("/?token=q")
                .header("authorization", "Bearer h")
                .header("cookie", "session=c"),
        );
        assert_eq!(credential(&both).as_deref(), Some("h"));

        assert_eq!(credential(&parts(Request::get("/"))), None);
        assert_eq!(credential(&parts(Request::get("/?token="))), None);
    }

    #[test]
    fn test_privilege_and_log_identity() {
        let staff = Actor::User {
            id: 7,
            username: "grace".into(),
            is_staff: true,
        };
        let member = Actor::User {
            id: 8,
            username: "ada".into(),
            is_staff: false,
        };

        assert!(staff.is_privileged());
        assert!(!member.is_privileged());
        assert!(Actor::Service.is_privileged());
        assert!(!Actor::Anonymous.is_privileged());

        assert_eq!(staff.to_string(), "user:7");
        assert_eq!(Actor::Service.to_string(), "admin-token");
        assert_eq!(Actor::Anonymous.to_string(), "anonymous");
        assert!(member.require_privileged().is_err());
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cre", "s3cret"));
        assert!(!tokens_match("s3creT", "s3cret"));
    }
}
