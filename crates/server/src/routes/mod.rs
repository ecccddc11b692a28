use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod admin;
pub mod area;
pub mod auth;
pub mod menu;
pub mod orders;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public, customer, and admin routes
pub fn build_router(state: auth::ServerState, cors: CorsLayer) -> Router {
    // Public routes (health + menu + location APIs + auth entry points)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/menu", get(menu::today_menu))
        .route("/api/check-location", post(area::check_location))
        .route("/api/service-config", get(area::service_config))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    // Customer routes (authenticated)
    let customer = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/api/orders", post(orders::place).get(orders::my_orders))
        .route("/api/orders/:id/feedback", post(orders::leave_feedback));

    // Admin routes (authenticated + admin claim)
    let admin_routes = Router::new()
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/menu", get(menu::admin_list).post(menu::admin_create))
        .route("/admin/menu/:id/toggle", post(menu::admin_toggle))
        .route("/admin/orders", get(orders::admin_list))
        .route("/admin/orders/:id/status", post(orders::admin_update_status))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id", get(admin::user_details))
        .route("/admin/users/:id/toggle", post(admin::toggle_user))
        .route("/admin/settings", get(admin::get_settings).put(admin::update_settings))
        .route_layer(middleware::from_fn(auth::require_admin));

    let swagger = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Compose
    public
        .merge(customer)
        .merge(admin_routes)
        .merge(swagger)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
