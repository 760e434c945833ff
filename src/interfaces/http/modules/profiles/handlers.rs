//! Profile API handlers
//!
//! Every route requires an authenticated caller. Mutations additionally
//! require the admin role, which `ProfileService` enforces.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use super::dto::{ProfileDto, ProfileListParams, ProfileStatsDto, UpdateProfileRequest};
use crate::application::ProfileService;
use crate::domain::Identity;
use crate::interfaces::http::common::{
    ApiError, ApiResponse, EmptyData, PaginatedResponse, ValidatedJson,
};
use crate::shared::DomainError;

/// Profile handler state
#[derive(Clone)]
pub struct ProfileHandlerState {
    pub profiles: Arc<ProfileService>,
}

fn profile_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        ApiError(DomainError::Validation(format!(
            "Invalid profile id: {}",
            e.body_text()
        )))
    })
}

#[utoipa::path(
    get,
    path = "/api/profiles",
    tag = "Profiles",
    params(ProfileListParams),
    responses(
        (status = 200, description = "Page of profiles", body = ApiResponse<PaginatedResponse<ProfileDto>>),
        (status = 401, description = "Authentication required"),
        (status = 422, description = "Invalid query")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_profiles(
    State(state): State<ProfileHandlerState>,
    Extension(identity): Extension<Identity>,
    params: Result<Query<ProfileListParams>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginatedResponse<ProfileDto>>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError(DomainError::Validation(e.body_text())))?;
    let query = params.into_query()?;

    let page = state.profiles.list(&query, &identity).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        page,
        ProfileDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/profiles/stats",
    tag = "Profiles",
    responses(
        (status = 200, description = "Profile analytics", body = ApiResponse<ProfileStatsDto>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile_stats(
    State(state): State<ProfileHandlerState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ApiResponse<ProfileStatsDto>>, ApiError> {
    let stats = state.profiles.stats(&identity).await?;
    Ok(Json(ApiResponse::success(ProfileStatsDto::from(stats))))
}

#[utoipa::path(
    get,
    path = "/api/profiles/{id}",
    tag = "Profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile details", body = ApiResponse<ProfileDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<ProfileHandlerState>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let id = profile_id(path)?;
    let profile = state.profiles.get(id, &identity).await?;
    Ok(Json(ApiResponse::success(ProfileDto::from(profile))))
}

#[utoipa::path(
    put,
    path = "/api/profiles/{id}",
    tag = "Profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<ProfileHandlerState>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i32>, PathRejection>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError> {
    let id = profile_id(path)?;
    let profile = state
        .profiles
        .update(id, request.into(), &identity)
        .await?;
    Ok(Json(ApiResponse::success(ProfileDto::from(profile))))
}

#[utoipa::path(
    delete,
    path = "/api/profiles/{id}",
    tag = "Profiles",
    params(("id" = i32, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile deleted", body = ApiResponse<EmptyData>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_profile(
    State(state): State<ProfileHandlerState>,
    Extension(identity): Extension<Identity>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    let id = profile_id(path)?;
    state.profiles.delete(id, &identity).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
