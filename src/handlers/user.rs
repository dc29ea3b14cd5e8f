use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    db,
    error::AppResult,
    extract::AppJson,
    models::{AvailableGroceryView, OrderRequest},
    AppState,
};

pub async fn view_available_groceries(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let start = Instant::now();
    let groceries = db::fetch_available_groceries(&state.db).await?;

    info!(
        count = groceries.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed available groceries"
    );

    let available: Vec<AvailableGroceryView> = groceries.into_iter().map(Into::into).collect();
    Ok((
        StatusCode::OK,
        Json(json!({ "available_groceries": available })),
    ))
}

pub async fn book_order(
    State(state): State<AppState>,
    AppJson(order): AppJson<OrderRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    order.validate()?;

    let start = Instant::now();
    let plan = match db::book_order(&state.db, &order).await {
        Ok(plan) => plan,
        Err(e) => {
            if e.is_rejection() {
                warn!(lines = order.groceries.len(), error = %e, "Order rejected");
            }
            return Err(e);
        }
    };

    for d in &plan.decrements {
        debug!(id = %d.id, name = %d.name, quantity = d.quantity, remaining = d.remaining, "Stock decremented");
    }
    info!(
        items = plan.decrements.len(),
        units = plan.total_units(),
        elapsed_ms = start.elapsed().as_millis(),
        "Booked order"
    );

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Order booked successfully." })),
    ))
}
