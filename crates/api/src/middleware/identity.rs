//! Caller identity middleware for protected routes.
//!
//! Authentication happens upstream; the gateway forwards the caller as
//! trusted headers:
//! - `x-user-id`: the caller's UUID (required)
//! - `x-user-role`: one of the [`UserRole`] names (defaults to `viewer`)
//! - `x-approval-limit`: decimal cap on entries the caller may approve

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use journal_core::ledger::LedgerError;
use journal_core::workflow::{Approver, UserRole};
use journal_shared::AppError;
use journal_shared::types::{Money, UserId};

use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";
/// Header carrying the caller's approval limit.
pub const APPROVAL_LIMIT_HEADER: &str = "x-approval-limit";

/// The identity a request acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    /// The acting user.
    pub user_id: UserId,
    /// The user's role.
    pub role: UserRole,
    /// Approval cap, if any.
    pub approval_limit: Option<Money>,
}

impl Caller {
    /// Parses the identity headers.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?
            .trim()
            .parse::<UserId>()
            .map_err(|_| AppError::Unauthorized(format!("malformed {USER_ID_HEADER} header")))?;

        let role = match header(USER_ROLE_HEADER) {
            None => UserRole::Viewer,
            Some(raw) => UserRole::parse(raw.trim())
                .ok_or_else(|| AppError::Unauthorized(format!("unknown role '{raw}'")))?,
        };

        let approval_limit = header(APPROVAL_LIMIT_HEADER)
            .map(|raw| {
                raw.trim().parse::<Money>().map_err(|_| {
                    AppError::Unauthorized(format!("malformed {APPROVAL_LIMIT_HEADER} header"))
                })
            })
            .transpose()?;

        Ok(Self {
            user_id,
            role,
            approval_limit,
        })
    }

    /// Fails with 403 unless the caller's role ranks at least `min`.
    pub fn require(&self, min: UserRole) -> Result<(), ApiError> {
        if self.role >= min {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "role {} is below the required role {min}",
                self.role
            ))
            .into())
        }
    }

    /// The caller's approval capability.
    pub fn approver(&self) -> Result<Approver, ApiError> {
        Approver::new(self.user_id, self.role, self.approval_limit)
            .map_err(|e| LedgerError::from(e).into())
    }
}

/// Resolves the caller and stores it in the request extensions.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    match Caller::from_headers(request.headers()) {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("caller identity required".into()).into())
    }
}
