//! Account API handlers
//!
//! Thin wrappers over `AccountService`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{AccountDto, LoginRequest, LoginResponse, RegisterRequest};
use crate::application::AccountService;
use crate::domain::Identity;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::{Caller, TOKEN_COOKIE};

/// Account handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub accounts: Arc<AccountService>,
    /// Add `Secure` to the session cookie
    pub secure_cookies: bool,
}

fn session_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        TOKEN_COOKIE, token, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<([(header::HeaderName, String); 1], Json<ApiResponse<LoginResponse>>), ApiError> {
    let result = state
        .accounts
        .login(&request.username, &request.password)
        .await?;

    let cookie = session_cookie(
        &result.token.token,
        result.token.expires_in,
        state.secure_cookies,
    );

    let response = LoginResponse {
        token: result.token.token,
        token_type: "Bearer".to_string(),
        expires_in: result.token.expires_in,
        user: AccountDto::from(result.account),
    };

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success(response)),
    ))
}

/// Runs before the register body is parsed: anonymous or non-admin
/// callers are turned away without validation feedback.
pub async fn registration_gate(
    State(state): State<UserHandlerState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let caller = request
        .extensions()
        .get::<Caller>()
        .and_then(|Caller(identity)| identity.clone());

    match state.accounts.authorize_registration(caller.as_ref()).await {
        Ok(_) => next.run(request).await,
        Err(e) => ApiError(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Username taken"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    Extension(Caller(caller)): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), ApiError> {
    let role = request.role()?;
    let account = state
        .accounts
        .register(caller.as_ref(), &request.username, &request.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountDto::from(account))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<AccountDto>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<UserHandlerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let account = state.accounts.current_account(&identity).await?;
    Ok(Json(ApiResponse::success(AccountDto::from(account))))
}
