use axum::http::StatusCode;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::response::AppError;

pub struct ValidatedJson<T>(pub T);

impl<B, T> FromRequest<B> for ValidatedJson<T>
where
    B: Send + Sync + 'static,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &B) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, &state)
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(ValidatedJson(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        text: String,
    }

    #[test]
    fn rejects_empty_text_with_400() {
        let payload = Payload {
            text: String::new(),
        };
        let err = payload.validate().unwrap_err();
        let err = AppError::Validation(err.to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
