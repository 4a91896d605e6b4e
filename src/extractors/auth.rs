use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::utils::{
    response::{AppError, FuncError},
    security::decode_token,
    state::ArcAppState,
};

/// The authenticated caller. Every handler takes this explicitly;
/// there is no ambient request identity.
#[derive(Debug)]
pub struct AuthSession {
    pub user_id: String,
}

impl FromRequestParts<ArcAppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ArcAppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(FuncError::Unauthorized)?;

        let decoded = decode_token(token, Some("access"), &state.config.signature_key)
            .map_err(AppError::Unauthorized)?;
        if decoded.is_expired {
            return Err(FuncError::ExpiredToken.into());
        }

        Ok(AuthSession {
            user_id: decoded.user_id,
        })
    }
}
