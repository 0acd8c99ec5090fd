use axum::{
    Extension, Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ApiEnvelope, JwtAuth, JwtClaims, PageInfo, UuidPath, ValidatedJson,
    auth_middleware,
    errors::{
        AppError,
        responses::{
            BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
            ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
        },
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::models::{
    CreateDeveloper, Developer, DirectoryAnalytics, DirectoryQuery, RoleCount, TechCount,
    UpdateDeveloper,
};
use crate::repository::DeveloperRepository;
use crate::service::DeveloperService;

pub const TAG: &str = "developers";

/// OpenAPI documentation for the developer directory API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_developers,
        create_developer,
        get_developer,
        update_developer,
        delete_developer,
        upload_photo,
        directory_analytics,
    ),
    components(
        schemas(
            Developer,
            CreateDeveloper,
            UpdateDeveloper,
            DirectoryAnalytics,
            RoleCount,
            TechCount
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Developer directory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the developers router. Everything except the analytics summary
/// sits behind the bearer-token gate.
pub fn router<R: DeveloperRepository + 'static>(
    service: DeveloperService<R>,
    jwt: JwtAuth,
) -> Router {
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/", get(list_developers).post(create_developer))
        .route(
            "/{id}",
            get(get_developer)
                .put(update_developer)
                .delete(delete_developer),
        )
        .route("/{id}/photo", post(upload_photo))
        .route_layer(from_fn_with_state(jwt, auth_middleware))
        .with_state(shared_service.clone());

    Router::new()
        .route("/analytics", get(directory_analytics))
        .with_state(shared_service)
        .merge(protected)
}

fn actor_id(claims: &JwtClaims) -> Result<Uuid, AppError> {
    claims
        .subject_id()
        .ok_or_else(|| AppError::TokenInvalid("Invalid token. Please login again.".to_string()))
}

/// Query the directory with optional search, role filter, sort and paging
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(DirectoryQuery),
    responses(
        (status = 200, description = "Page of matching developers", body = Vec<Developer>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_developers<R: DeveloperRepository>(
    State(service): State<Arc<DeveloperService<R>>>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<ApiEnvelope<Vec<Developer>>>, AppError> {
    let page = service.query_directory(&query).await?;
    let pagination = PageInfo::new(page.total, page.page, page.limit);
    Ok(Json(ApiEnvelope::page(page.items, pagination)))
}

/// Create a developer record owned by the calling identity
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = CreateDeveloper,
    responses(
        (status = 201, description = "Developer created successfully", body = Developer),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_developer<R: DeveloperRepository>(
    State(service): State<Arc<DeveloperService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateDeveloper>,
) -> Result<impl IntoResponse, AppError> {
    let owner = actor_id(&claims)?;
    let developer = service.create_developer(input, owner).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::data_with_message(
            developer,
            "Developer created successfully",
        )),
    ))
}

/// Get a developer by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Developer ID")),
    responses(
        (status = 200, description = "Developer record", body = Developer),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_developer<R: DeveloperRepository>(
    State(service): State<Arc<DeveloperService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiEnvelope<Developer>>, AppError> {
    let developer = service.get_developer(id).await?;
    Ok(Json(ApiEnvelope::data(developer)))
}

/// Replace a developer record (owner only)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Developer ID")),
    request_body = UpdateDeveloper,
    responses(
        (status = 200, description = "Developer updated successfully", body = Developer),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_developer<R: DeveloperRepository>(
    State(service): State<Arc<DeveloperService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateDeveloper>,
) -> Result<Json<ApiEnvelope<Developer>>, AppError> {
    let actor = actor_id(&claims)?;
    let developer = service.update_developer(id, input, actor).await?;
    Ok(Json(ApiEnvelope::data_with_message(
        developer,
        "Developer updated successfully",
    )))
}

/// Delete a developer record (owner only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Developer ID")),
    responses(
        (status = 200, description = "Developer deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_developer<R: DeveloperRepository>(
    State(service): State<Arc<DeveloperService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiEnvelope<()>>, AppError> {
    let actor = actor_id(&claims)?;
    service.delete_developer(id, actor).await?;
    Ok(Json(ApiEnvelope::message("Developer deleted successfully")))
}

/// Upload a profile photo for a developer (owner only)
#[utoipa::path(
    post,
    path = "/{id}/photo",
    tag = TAG,
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Developer ID")),
    responses(
        (status = 200, description = "Photo uploaded", body = Developer),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_photo<R: DeveloperRepository>(
    State(service): State<Arc<DeveloperService<R>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    mut multipart: Multipart,
) -> Result<Json<ApiEnvelope<Developer>>, AppError> {
    let actor = actor_id(&claims)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let filename = field.file_name().unwrap_or("photo.bin").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Photo file is empty".to_string()));
        }
        let developer = service
            .attach_photo(id, actor, &filename, bytes.to_vec())
            .await?;
        return Ok(Json(ApiEnvelope::data_with_message(
            developer,
            "Photo uploaded successfully",
        )));
    }

    Err(AppError::BadRequest("No photo file provided".to_string()))
}

/// Directory-wide analytics summary (public)
#[utoipa::path(
    get,
    path = "/analytics",
    tag = TAG,
    responses(
        (status = 200, description = "Directory analytics", body = DirectoryAnalytics),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn directory_analytics<R: DeveloperRepository>(
    State(service): State<Arc<DeveloperService<R>>>,
) -> Result<Json<ApiEnvelope<DirectoryAnalytics>>, AppError> {
    let analytics = service.analytics().await?;
    Ok(Json(ApiEnvelope::data(analytics)))
}
