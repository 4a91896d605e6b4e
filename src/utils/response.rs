use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

pub fn response<T>(data: T, status: StatusCode) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data: Some(data),
        error: None,
        status,
    }
}

impl<T> ApiResponse<T> {
    pub fn err(msg: &str, status: StatusCode) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.to_string()),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = self.status;
        let json = axum::Json(self);
        (status, json).into_response()
    }
}

/// HTTP-level error, what actually leaves the service.
#[derive(Debug, PartialEq)]
pub enum AppError {
    BadRequest(&'static str),
    Unauthorized(&'static str),
    Validation(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let msg = match &self {
            AppError::BadRequest(code) | AppError::Unauthorized(code) => *code,
            AppError::Validation(msg) | AppError::Internal(msg) => msg.as_str(),
        };
        ApiResponse::<()>::err(msg, status).into_response()
    }
}

/// Domain signals raised by handlers and the Post entity.
/// Converted to AppError at the handler boundary with `?`.
#[derive(Debug, PartialEq, Eq)]
pub enum FuncError {
    PostNotFound,
    CommentNotFound,
    UserNotFound,
    AlreadyLiked,
    NotLiked,
    NotPostAuthor,
    NotCommentAuthor,
    Unauthorized,
    ExpiredToken,
}

impl From<FuncError> for AppError {
    fn from(err: FuncError) -> Self {
        match err {
            FuncError::PostNotFound => AppError::BadRequest("POST_NOT_FOUND"),
            FuncError::CommentNotFound => AppError::BadRequest("COMMENT_NOT_FOUND"),
            FuncError::UserNotFound => AppError::BadRequest("USER_NOT_FOUND"),
            FuncError::AlreadyLiked => AppError::BadRequest("ALREADY_LIKED"),
            FuncError::NotLiked => AppError::BadRequest("NOT_LIKED"),
            FuncError::NotPostAuthor => AppError::Unauthorized("NOT_POST_AUTHOR"),
            FuncError::NotCommentAuthor => AppError::Unauthorized("NOT_COMMENT_AUTHOR"),
            FuncError::Unauthorized => AppError::Unauthorized("UNAUTHORIZED"),
            FuncError::ExpiredToken => AppError::Unauthorized("EXPIRED_TOKEN"),
        }
    }
}
