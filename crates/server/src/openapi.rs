use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct CheckLocationRequest { pub latitude: f64, pub longitude: f64 }

#[derive(utoipa::ToSchema)]
pub struct ServiceConfigResponse {
    pub central_lat: f64,
    pub central_lng: f64,
    pub service_radius: f64,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateSettingsRequest {
    pub central_lat: f64,
    pub central_lng: f64,
    pub service_radius: f64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::area::check_location,
        crate::routes::area::service_config,
        crate::routes::admin::get_settings,
        crate::routes::admin::update_settings,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CheckLocationRequest,
            ServiceConfigResponse,
            UpdateSettingsRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "area"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
