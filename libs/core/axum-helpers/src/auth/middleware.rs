use super::jwt::{AuthError, JwtAuth};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}

/// JWT authentication middleware.
///
/// Validates the bearer token from the Authorization header and inserts
/// [`super::JwtClaims`] into request extensions on success. Expired tokens
/// get a distinct error code from malformed or mis-signed ones.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::auth::{JwtAuth, auth_middleware};
///
/// let protected_routes = Router::new()
///     .route("/developers", post(create_handler))
///     .layer(axum::middleware::from_fn_with_state(
///         jwt.clone(),
///         auth_middleware
///     ));
/// ```
pub async fn auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&headers).ok_or_else(|| {
        tracing::debug!("No bearer token in Authorization header");
        AppError::Unauthorized(AuthError::MissingToken.to_string())
    })?;

    let claims = auth.verify_token(token).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        match e {
            AuthError::Expired => AppError::TokenExpired(e.to_string()),
            _ => AppError::TokenInvalid(e.to_string()),
        }
    })?;

    // Token is valid - insert claims into request extensions
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
