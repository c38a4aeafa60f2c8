use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Error, Result};

use crate::auth::{hash_password, verify_password};
use crate::content::AuthorDraft;
use crate::state::AppState;
use crate::storage::{Querier, Store};

/// 配置用户认证路由。
///
/// - `POST /users`：注册
/// - `POST /users/login`：登录
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/login", post(login))
}

/// 注册请求体。
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    name: String,
    email: String,
    password: String,
    bio: Option<String>,
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
pub struct LoginUser {
    email: String,
    password: String,
}

/// 用户摘要，注册和登录响应共用；不含密码相关字段。
#[derive(Debug, Serialize)]
pub struct UserSummary {
    name: String,
    email: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    message: &'static str,
    user: UserSummary,
    token: String,
}

/// 注册新用户。
///
/// 邮箱已占用返回 409；成功时落库密码哈希并立即签发令牌。
async fn register(
    State(app): State<AppState>,
    Json(payload): Json<RegisterUser>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let draft = AuthorDraft::new(payload.name, payload.email, payload.bio)?;

    if payload.password.is_empty() {
        return Err(Error::Validation("Password is required"));
    }

    // 先查重，唯一索引兜底并发注册
    if app
        .querier()
        .credential_by_email(&draft.email)
        .await?
        .is_some()
    {
        return Err(Error::Conflict("User already exists"));
    }

    let password_hash = hash_password(&payload.password)?;

    let id = Uuid::new_v4();
    let mut store = app.storage();
    store.insert_author(id, &draft, Some(&password_hash));
    store.commit().await?;

    let token = app.tokens().sign(id, &draft.name, &draft.email)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user: UserSummary {
                name: draft.name,
                email: draft.email,
            },
            token,
        }),
    ))
}

/// 登录。
///
/// 未注册邮箱返回 400 "Cannot find user"，
/// 密码不匹配返回 401 "Incorrect password"，
/// 两者在响应中可区分。
async fn login(
    State(app): State<AppState>,
    Json(payload): Json<LoginUser>,
) -> Result<Json<AuthResponse>> {
    let cred = app
        .querier()
        .credential_by_email(&payload.email)
        .await?
        .ok_or(Error::UnknownUser)?;

    // 没有凭证的作者（POST /articles/authors 创建）一律视为不匹配
    let matched = cred
        .password_hash
        .as_deref()
        .is_some_and(|hash| verify_password(&payload.password, hash));
    if !matched {
        return Err(Error::IncorrectPassword);
    }

    let token = app.tokens().sign(cred.id, &cred.name, &cred.email)?;

    Ok(Json(AuthResponse {
        message: "Success",
        user: UserSummary {
            name: cred.name,
            email: cred.email,
        },
        token,
    }))
}
