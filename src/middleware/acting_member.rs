use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

pub const ACTING_MEMBER_HEADER: &str = "x-member-email";

/// Email of the member making the request, taken from `x-member-email`.
///
/// Sign-in happens upstream; this only carries the identity it established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingMember(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ActingMember
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ACTING_MEMBER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(|email| ActingMember(email.to_string()))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Missing {} header", ACTING_MEMBER_HEADER))
            })
    }
}
