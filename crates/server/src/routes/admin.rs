use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::service_error_status;
use crate::routes::auth::{AuthedUser, ServerState};
use service::geo::Coordinate;
use service::pagination::Pagination;
use service::user_service;

/// Today's counters for the operator dashboard.
pub async fn dashboard(
    State(state): State<ServerState>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let today = Utc::now().date_naive();
    let db = &state.db;
    let map_err = |e: sea_orm::DbErr| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());

    let total_orders_today = models::order::Entity::find()
        .filter(models::order::Column::OrderDate.eq(today))
        .count(db)
        .await
        .map_err(map_err)?;
    let pending_orders = models::order::Entity::find()
        .filter(models::order::Column::Status.eq("pending"))
        .count(db)
        .await
        .map_err(map_err)?;
    let total_users = models::user::Entity::find()
        .filter(models::user::Column::IsAdmin.eq(false))
        .count(db)
        .await
        .map_err(map_err)?;
    let menu_items_today = models::menu_item::Entity::find()
        .filter(models::menu_item::Column::Date.eq(today))
        .filter(models::menu_item::Column::IsAvailable.eq(true))
        .count(db)
        .await
        .map_err(map_err)?;

    Ok(Json(serde_json::json!({
        "total_orders_today": total_orders_today,
        "pending_orders": pending_orders,
        "total_users": total_users,
        "menu_items_today": menu_items_today,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list_users(
    State(state): State<ServerState>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Vec<models::user::Model>>, (StatusCode, String)> {
    let active = match query.status.as_deref() {
        Some("active") => Some(true),
        Some("inactive") => Some(false),
        _ => None,
    };
    let opts = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };
    let users = user_service::list_paginated(&state.db, active, opts)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(users))
}

pub async fn user_details(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let (user, order_count) = user_service::details(&state.db, id)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(serde_json::json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "phone": user.phone,
        "address": user.address,
        "latitude": user.latitude,
        "longitude": user.longitude,
        "is_active": user.is_active,
        "is_admin": user.is_admin,
        "created_at": user.created_at,
        "order_count": order_count,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ToggleUserInput {
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool { true }

pub async fn toggle_user(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ToggleUserInput>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    user_service::set_active(&state.db, id, input.active)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(serde_json::json!({"success": true})))
}

#[utoipa::path(get, path = "/admin/settings", tag = "admin", responses((status = 200, description = "OK", body = crate::openapi::ServiceConfigResponse)))]
pub async fn get_settings(State(state): State<ServerState>) -> Json<serde_json::Value> {
    let cfg = state.area.current_config().await;
    Json(serde_json::json!({
        "central_lat": cfg.center.lat,
        "central_lng": cfg.center.lng,
        "service_radius": cfg.radius_km,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsInput {
    pub central_lat: Option<f64>,
    pub central_lng: Option<f64>,
    pub service_radius: Option<f64>,
}

#[utoipa::path(put, path = "/admin/settings", tag = "admin", request_body = crate::openapi::UpdateSettingsRequest, responses((status = 200, description = "OK"), (status = 400, description = "Bad Request")))]
pub async fn update_settings(
    State(state): State<ServerState>,
    Extension(actor): Extension<AuthedUser>,
    Json(input): Json<UpdateSettingsInput>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let (lat, lng, radius) = match (input.central_lat, input.central_lng, input.service_radius) {
        (Some(lat), Some(lng), Some(radius)) => (lat, lng, radius),
        _ => return Err((StatusCode::BAD_REQUEST, "all fields are required".into())),
    };

    let outcome = state
        .area
        .update_service_area(Coordinate::new(lat, lng), radius, Some(actor.id))
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(serde_json::json!({"ok": true, "mirror_synced": outcome.mirror_synced})))
}
