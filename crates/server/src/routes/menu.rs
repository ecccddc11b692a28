use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::service_error_status;
use crate::routes::auth::ServerState;
use service::menu_service::{self, NewMenuItem};

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub date: Option<String>,
}

fn parse_date_or_today(raw: Option<&str>) -> NaiveDate {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive())
}

/// Today's customer-facing menu. Expired items are swept first so stale
/// days never leak into the listing.
pub async fn today_menu(
    State(state): State<ServerState>,
) -> Result<Json<Vec<models::menu_item::Model>>, (StatusCode, String)> {
    let today = Utc::now().date_naive();
    let _ = menu_service::expire_stale_items(&state.db, today)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    let items = menu_service::list_available_for_date(&state.db, today)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(items))
}

/// Admin listing for a given day (defaults to today), available or not.
pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Vec<models::menu_item::Model>>, (StatusCode, String)> {
    let date = parse_date_or_today(query.date.as_deref());
    let _ = menu_service::expire_stale_items(&state.db, Utc::now().date_naive())
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    let items = menu_service::list_for_date(&state.db, date)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct CreateMenuItemInput {
    pub name: String,
    pub description: Option<String>,
    pub meal_type: String,
    pub price_full: f64,
    pub price_roti_only: f64,
    pub date: String,
}

pub async fn admin_create(
    State(state): State<ServerState>,
    Json(input): Json<CreateMenuItemInput>,
) -> Result<Json<models::menu_item::Model>, (StatusCode, String)> {
    let date = NaiveDate::parse_from_str(&input.date, "%Y-%m-%d")
        .map_err(|_| (StatusCode::BAD_REQUEST, "invalid date format (expect YYYY-MM-DD)".into()))?;
    let created = menu_service::create_item(
        &state.db,
        NewMenuItem {
            name: input.name,
            description: input.description,
            meal_type: input.meal_type,
            price_full: input.price_full,
            price_roti_only: input.price_roti_only,
            date,
        },
    )
    .await
    .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(created))
}

pub async fn admin_toggle(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::menu_item::Model>, (StatusCode, String)> {
    let updated = menu_service::toggle_item(&state.db, id)
        .await
        .map_err(|e| (service_error_status(&e), e.to_string()))?;
    Ok(Json(updated))
}
