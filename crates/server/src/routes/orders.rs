use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use sea_orm::EntityTrait;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::service_error_status;
use crate::routes::auth::{AuthedUser, ServerState};
use service::order_service::{self, PlaceOrderInput};
use service::pagination::Pagination;
use service::{feedback_service, menu_service};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub menu_item_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default)]
    pub is_roti_only: bool,
    pub delivery_address: String,
    pub delivery_lat: Option<f64>,
    pub delivery_lng: Option<f64>,
    pub notes: Option<String>,
}

fn default_quantity() -> i32 { 1 }

pub async fn place(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Json(input): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<models::order::Model>), (StatusCode, String)> {
    let customer = models::user::Entity::find_by_id(user.id)
        .one(&state.db)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "unknown user".to_string()))?;
    if !customer.is_active {
        return Err((StatusCode::FORBIDDEN, "account disabled".into()));
    }

    // Keep the menu current before accepting an order against it.
    let _ = menu_service::expire_stale_items(&state.db, chrono::Utc::now().date_naive())
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;

    let created = order_service::place_order(
        &state.db,
        &state.area,
        &customer,
        PlaceOrderInput {
            menu_item_id: input.menu_item_id,
            quantity: input.quantity,
            is_roti_only: input.is_roti_only,
            delivery_address: input.delivery_address,
            delivery_lat: input.delivery_lat,
            delivery_lng: input.delivery_lng,
            notes: input.notes,
        },
    )
    .await
    .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<Vec<models::order::Model>>, (StatusCode, String)> {
    let orders = order_service::list_recent_for_user(&state.db, user.id, 10)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackInput {
    pub rating: i16,
    pub comment: Option<String>,
}

pub async fn leave_feedback(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthedUser>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<FeedbackInput>,
) -> Result<(StatusCode, Json<models::feedback::Model>), (StatusCode, String)> {
    let created = feedback_service::create(&state.db, user.id, order_id, input.rating, input.comment)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
pub struct AdminOrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<AdminOrdersQuery>,
) -> Result<Json<Vec<models::order::Model>>, (StatusCode, String)> {
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(s) => Some(s),
    };
    let opts = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };
    let orders = order_service::list_paginated(&state.db, status, opts)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: String,
    pub admin_notes: Option<String>,
}

pub async fn admin_update_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<Json<models::order::Model>, (StatusCode, String)> {
    let updated = order_service::update_status(&state.db, id, &input.status, input.admin_notes)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(updated))
}
