//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AccountService, ProfileService};
use crate::infrastructure::crypto::jwt::TokenService;
use crate::interfaces::http::common::{ApiResponse, EmptyData, PaginatedResponse};
use crate::interfaces::http::middleware::{
    auth_middleware, optional_auth_middleware, require_admin, AuthState,
};
use crate::interfaces::http::modules::{health, profiles, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT Bearer token; the `token` cookie set at login is accepted too",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::login,
        users::register,
        users::get_current_user,
        profiles::list_profiles,
        profiles::get_profile_stats,
        profiles::get_profile,
        profiles::update_profile,
        profiles::delete_profile,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            PaginatedResponse<profiles::ProfileDto>,
            users::LoginRequest,
            users::LoginResponse,
            users::RegisterRequest,
            users::AccountDto,
            profiles::ProfileDto,
            profiles::UpdateProfileRequest,
            profiles::ProfileStatsDto,
            profiles::ProfileBriefDto,
            profiles::FollowerRangeDto,
            health::HealthResponse,
            health::StoreHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database connectivity"),
        (name = "Users", description = "Login, admin-only registration, current account"),
        (name = "Profiles", description = "Profile directory: search, sort, paginate, analytics, admin edits"),
    ),
    info(
        title = "Profile Directory API",
        version = "1.0.0",
        description = "REST API for an admin-managed directory of social-media profiles",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    tokens: Arc<TokenService>,
    accounts: Arc<AccountService>,
    profile_service: Arc<ProfileService>,
    secure_cookies: bool,
) -> Router {
    let middleware_state = AuthState { tokens };

    let user_state = users::UserHandlerState {
        accounts,
        secure_cookies,
    };

    // Login is public. Registration is open to anonymous callers only
    // while no account exists; the gate settles that before the body.
    let user_public_routes = Router::new()
        .route("/login", post(users::login))
        .with_state(user_state.clone());

    let user_register_routes = Router::new()
        .route(
            "/register",
            post(users::register).route_layer(middleware::from_fn_with_state(
                user_state.clone(),
                users::registration_gate,
            )),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            optional_auth_middleware,
        ))
        .with_state(user_state.clone());

    let user_protected_routes = Router::new()
        .route("/me", get(users::get_current_user))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(user_state);

    let user_routes = Router::new()
        .merge(user_public_routes)
        .merge(user_register_routes)
        .merge(user_protected_routes);

    let profile_state = profiles::ProfileHandlerState {
        profiles: profile_service,
    };
    let profile_routes = Router::new()
        .route("/", get(profiles::list_profiles))
        .route("/stats", get(profiles::get_profile_stats))
        .route(
            "/{id}",
            get(profiles::get_profile).merge(
                put(profiles::update_profile)
                    .delete(profiles::delete_profile)
                    .route_layer(middleware::from_fn(require_admin)),
            ),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(profile_state);

    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest("/api/users", user_routes)
        .nest("/api/profiles", profile_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
