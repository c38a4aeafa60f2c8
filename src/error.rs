use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("Cannot find user")]
    UnknownUser,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error(transparent)]
    PasswordHash(#[from] argon2::password_hash::Error),

    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, (*msg).to_string()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, (*msg).to_string()),
            Error::Conflict(msg) => (StatusCode::CONFLICT, (*msg).to_string()),
            Error::UnknownUser => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::IncorrectPassword => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::Sqlx(e) => match unique_violation(e) {
                Some(msg) => (StatusCode::CONFLICT, msg.to_string()),
                None => {
                    tracing::error!(%e, "sqlx error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server error".to_string(),
                    )
                }
            },
            Error::PasswordHash(e) => {
                tracing::error!(%e, "password hash error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                )
            }
            Error::Token(e) => {
                tracing::error!(%e, "token error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// 唯一约束冲突按约束名映射为具体的 409 提示
fn unique_violation(e: &sqlx::Error) -> Option<&'static str> {
    let db = match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => db,
        _ => return None,
    };

    match db.constraint() {
        Some("authors_email_key") => Some("User already exists"),
        Some("articles_slug_key") => Some("Slug already in use"),
        _ => Some("Conflict"),
    }
}
