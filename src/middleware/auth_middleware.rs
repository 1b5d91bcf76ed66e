use crate::config::AppState;
use crate::entities::user;
use crate::models::user_model::{CurrentUser, Viewer};
use crate::utils::api_response::ResponseBuilder;
use crate::utils::jwt_utils::JwtUtils;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use sea_orm::{DatabaseConnection, EntityTrait};

/// Rejects the request unless it carries a valid bearer token for an
/// existing user. On success a `CurrentUser` is injected into extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    let token = match bearer_token(&req) {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let token_data = match JwtUtils::validate_jwt(token) {
        Ok(data) => data,
        Err(e) => return Ok(token_error(&e)),
    };

    let current_user = match fetch_user(&state.db, token_data.claims.sub).await {
        Ok(u) => u,
        Err(resp) => return Ok(resp),
    };

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Like `require_auth`, but anonymous requests pass through. A `Viewer` is
/// always injected; it is `Viewer(None)` when no valid credentials are
/// present. A malformed or expired token is still rejected so a client with
/// stale credentials notices instead of silently browsing anonymously.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    if req.headers().get(header::AUTHORIZATION).is_none() {
        req.extensions_mut().insert(Viewer(None));
        return Ok(next.run(req).await);
    }

    let token = match bearer_token(&req) {
        Ok(t) => t,
        Err(resp) => return Ok(resp),
    };

    let token_data = match JwtUtils::validate_jwt(token) {
        Ok(data) => data,
        Err(e) => return Ok(token_error(&e)),
    };

    let current_user = match fetch_user(&state.db, token_data.claims.sub).await {
        Ok(u) => u,
        Err(resp) => return Ok(resp),
    };

    req.extensions_mut().insert(Viewer(Some(current_user)));
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> std::result::Result<&str, Response> {
    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(header) => header,
        None => {
            return Err(ResponseBuilder::error::<()>(
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                "Authorization header is missing",
            )
            .into_response());
        }
    };

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => {
            return Err(ResponseBuilder::error::<()>(
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_FORMAT",
                "Invalid Authorization header format",
            )
            .into_response());
        }
    };

    if !auth_str.starts_with("Bearer ") {
        return Err(ResponseBuilder::error::<()>(
            StatusCode::UNAUTHORIZED,
            "AUTH_INVALID_SCHEME",
            "Invalid token format. Missing 'Bearer ' prefix",
        )
        .into_response());
    }

    Ok(&auth_str[7..])
}

fn token_error(e: &jsonwebtoken::errors::Error) -> Response {
    let (code, message) = match e.kind() {
        ErrorKind::ExpiredSignature => ("TOKEN_EXPIRED", "Token has expired"),
        ErrorKind::InvalidToken => ("TOKEN_INVALID", "Token is invalid"),
        ErrorKind::InvalidSignature => ("TOKEN_BAD_SIGNATURE", "Invalid token signature"),
        _ => ("AUTH_FAILED", "Authentication failed"),
    };
    ResponseBuilder::error::<()>(StatusCode::UNAUTHORIZED, code, message).into_response()
}

async fn fetch_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> std::result::Result<CurrentUser, Response> {
    match user::Entity::find_by_id(user_id).one(db).await {
        Ok(Some(u)) => Ok(CurrentUser {
            id: u.id,
            username: u.username,
            is_staff: u.is_staff,
        }),
        Ok(None) => Err(ResponseBuilder::error::<()>(
            StatusCode::UNAUTHORIZED,
            "USER_NOT_FOUND",
            "Token refers to a user that no longer exists",
        )
        .into_response()),
        Err(e) => {
            tracing::error!("failed to load user for auth: {}", e);
            Err(ResponseBuilder::error::<()>(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Failed to load user",
            )
            .into_response())
        }
    }
}
