//! Operator session extraction
//!
//! The gateway does not issue or verify tokens itself: the identity provider
//! does. It only requires a bearer token and forwards it to the back-office,
//! which decides whether the operator may act.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::AppError;

/// Header carrying the operator's display name, used only for logging
pub const OPERATOR_HEADER: &str = "x-operator";

/// Credentials of the operator making the request
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub operator: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            operator: None,
        }
    }

    /// Name used in log fields
    pub fn operator_label(&self) -> &str {
        self.operator.as_deref().unwrap_or("unknown")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("Missing or invalid Authorization header"))?;

        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        let operator = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Session {
            token: token.to_string(),
            operator,
        })
    }
}
