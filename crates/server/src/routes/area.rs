use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct CheckLocationInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[utoipa::path(post, path = "/api/check-location", tag = "area", request_body = crate::openapi::CheckLocationRequest, responses((status = 200, description = "OK"), (status = 400, description = "Bad Request")))]
pub async fn check_location(
    State(state): State<ServerState>,
    Json(input): Json<CheckLocationInput>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let (latitude, longitude) = match (input.latitude, input.longitude) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "latitude and longitude are required"})),
            ))
        }
    };
    let serviceable = state
        .area
        .is_serviceable(service::geo::Coordinate::new(latitude, longitude))
        .await;
    Ok(Json(serde_json::json!({"serviceable": serviceable})))
}

#[utoipa::path(get, path = "/api/service-config", tag = "area", responses((status = 200, description = "OK", body = crate::openapi::ServiceConfigResponse)))]
pub async fn service_config(State(state): State<ServerState>) -> Json<serde_json::Value> {
    // Never fails: the resolver falls back to defaults on store errors.
    let cfg = state.area.current_config().await;
    Json(serde_json::json!({
        "central_lat": cfg.center.lat,
        "central_lng": cfg.center.lng,
        "service_radius": cfg.radius_km,
    }))
}
