use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ApiEnvelope, JwtAuth, JwtClaims, ValidatedJson, auth_middleware,
    errors::{
        AppError,
        responses::{
            BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
            NotFoundResponse, UnauthorizedResponse,
        },
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{AuthResponse, IdentityResponse, LoginRequest, SignupRequest};
use crate::repository::IdentityRepository;
use crate::service::IdentityService;

pub const TAG: &str = "auth";

/// OpenAPI documentation for the auth API
#[derive(OpenApi)]
#[openapi(
    paths(signup, login, profile),
    components(
        schemas(SignupRequest, LoginRequest, AuthResponse, IdentityResponse),
        responses(
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Signup, login and profile endpoints")
    )
)]
pub struct ApiDoc;

/// Create the auth router. Signup and login are public; profile sits behind
/// the bearer-token gate.
pub fn router<R: IdentityRepository + 'static>(
    service: IdentityService<R>,
    jwt: JwtAuth,
) -> Router {
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/profile", get(profile))
        .route_layer(from_fn_with_state(jwt, auth_middleware))
        .with_state(shared_service.clone());

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .with_state(shared_service)
        .merge(protected)
}

/// Register a new identity and issue a token
#[utoipa::path(
    post,
    path = "/signup",
    tag = TAG,
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Identity created", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signup<R: IdentityRepository>(
    State(service): State<Arc<IdentityService<R>>>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = service.signup(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::data_with_message(response, "User created")),
    ))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: IdentityRepository>(
    State(service): State<Arc<IdentityService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiEnvelope<AuthResponse>>, AppError> {
    let response = service.login(input).await?;
    Ok(Json(ApiEnvelope::data_with_message(
        response,
        "Login successful",
    )))
}

/// Resolve the calling token to its stored identity
#[utoipa::path(
    get,
    path = "/profile",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Calling identity", body = IdentityResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn profile<R: IdentityRepository>(
    State(service): State<Arc<IdentityService<R>>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<ApiEnvelope<IdentityResponse>>, AppError> {
    let id = claims
        .subject_id()
        .ok_or_else(|| AppError::TokenInvalid("Invalid token. Please login again.".to_string()))?;
    let identity = service.profile(id).await?;
    Ok(Json(ApiEnvelope::data(IdentityResponse::from(identity))))
}
