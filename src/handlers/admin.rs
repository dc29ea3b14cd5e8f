use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    db,
    error::AppResult,
    extract::{AppJson, AppPath},
    models::{AdminGroceryView, GroceryChanges, InventoryAdjustment, NewGrocery},
    AppState,
};

// ── Add ───────────────────────────────────────────────────────────────────────

pub async fn add_grocery(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewGrocery>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;

    let start = Instant::now();
    let grocery = db::insert_grocery(&state.db, &payload).await?;

    info!(
        id = %grocery.id,
        name = %grocery.name,
        elapsed_ms = start.elapsed().as_millis(),
        "Added grocery item"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Grocery item added successfully",
            "id": grocery.id,
        })),
    ))
}

// ── View ──────────────────────────────────────────────────────────────────────

pub async fn view_groceries(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let groceries = db::fetch_all_groceries(&state.db).await?;

    info!(
        count = groceries.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed groceries"
    );

    let groceries: Vec<AdminGroceryView> = groceries.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(json!({ "groceries": groceries }))))
}

pub async fn view_grocery(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let grocery = db::fetch_grocery_by_id(&state.db, id).await?;

    info!(id = %id, elapsed_ms = start.elapsed().as_millis(), "Fetched grocery item");

    Ok((
        StatusCode::OK,
        Json(json!({ "grocery": AdminGroceryView::from(grocery) })),
    ))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_grocery(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    db::delete_grocery(&state.db, id).await?;

    info!(id = %id, elapsed_ms = start.elapsed().as_millis(), "Deleted grocery item");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Grocery item deleted successfully" })),
    ))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_grocery(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(changes): AppJson<GroceryChanges>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    changes.validate()?;

    let start = Instant::now();
    let grocery = db::update_grocery(&state.db, id, &changes).await?;

    info!(
        id = %id,
        name = %grocery.name,
        inventory = grocery.inventory,
        elapsed_ms = start.elapsed().as_millis(),
        "Updated grocery item"
    );

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Grocery item updated successfully" })),
    ))
}

// ── Inventory ─────────────────────────────────────────────────────────────────

pub async fn manage_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(adjustment): AppJson<InventoryAdjustment>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let action = adjustment.parse()?;

    let start = Instant::now();
    let grocery = db::adjust_inventory(&state.db, id, action, adjustment.quantity).await?;

    info!(
        id = %id,
        action = ?action,
        quantity = adjustment.quantity,
        inventory = grocery.inventory,
        elapsed_ms = start.elapsed().as_millis(),
        "Managed inventory"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Inventory managed successfully",
            "inventory": grocery.inventory,
        })),
    ))
}
