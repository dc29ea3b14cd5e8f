use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use crate::booking::{self, BookingPlan};
use crate::error::{AppError, AppResult};
use crate::models::*;

const GROCERY_COLUMNS: &str = "id, name, price, inventory, created_at, updated_at";

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Grocery item {} not found", id))
}

/// Rolls `tx` back and hands `err` back to the caller.
///
/// A failed rollback is logged, never surfaced: the server discards the
/// transaction anyway once the connection is gone.
pub async fn abort(tx: Transaction<'_, Postgres>, err: AppError) -> AppError {
    if let Err(rollback_err) = tx.rollback().await {
        warn!(error = %rollback_err, "Rollback failed");
    }
    err
}

// ── Catalog ───────────────────────────────────────────────────────────────────

pub async fn fetch_all_groceries(pool: &PgPool) -> AppResult<Vec<Grocery>> {
    let groceries = sqlx::query_as::<_, Grocery>(&format!(
        "SELECT {GROCERY_COLUMNS} FROM groceries ORDER BY name ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(groceries)
}

/// Items a shopper can order right now (`inventory > 0`).
pub async fn fetch_available_groceries(pool: &PgPool) -> AppResult<Vec<Grocery>> {
    let groceries = sqlx::query_as::<_, Grocery>(&format!(
        "SELECT {GROCERY_COLUMNS} FROM groceries WHERE inventory > 0 ORDER BY name ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(groceries)
}

pub async fn fetch_grocery_by_id(pool: &PgPool, id: Uuid) -> AppResult<Grocery> {
    sqlx::query_as::<_, Grocery>(&format!(
        "SELECT {GROCERY_COLUMNS} FROM groceries WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn insert_grocery(pool: &PgPool, payload: &NewGrocery) -> AppResult<Grocery> {
    let grocery = sqlx::query_as::<_, Grocery>(&format!(
        r#"
        INSERT INTO groceries (name, price, inventory)
        VALUES ($1, $2, $3)
        RETURNING {GROCERY_COLUMNS}
        "#
    ))
    .bind(payload.name.trim())
    .bind(payload.price)
    .bind(payload.inventory)
    .fetch_one(pool)
    .await?;

    Ok(grocery)
}

/// Applies only the fields present in `changes` in a single statement.
pub async fn update_grocery(pool: &PgPool, id: Uuid, changes: &GroceryChanges) -> AppResult<Grocery> {
    sqlx::query_as::<_, Grocery>(&format!(
        r#"
        UPDATE groceries
        SET name       = COALESCE($1, name),
            price      = COALESCE($2, price),
            inventory  = COALESCE($3, inventory),
            updated_at = NOW()
        WHERE id = $4
        RETURNING {GROCERY_COLUMNS}
        "#
    ))
    .bind(changes.name.as_deref().map(str::trim))
    .bind(changes.price)
    .bind(changes.inventory)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn delete_grocery(pool: &PgPool, id: Uuid) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM groceries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Adjusts stock under a row lock; a decrease past zero leaves zero.
pub async fn adjust_inventory(
    pool: &PgPool,
    id: Uuid,
    action: InventoryAction,
    quantity: i32,
) -> AppResult<Grocery> {
    let mut tx = pool.begin().await?;

    let current: Option<(i32,)> =
        sqlx::query_as("SELECT inventory FROM groceries WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some((current,)) = current else {
        return Err(abort(tx, not_found(id)).await);
    };

    let Some(next) = action.apply(current, quantity) else {
        let err = AppError::BadRequest("resulting inventory is out of range".to_string());
        return Err(abort(tx, err).await);
    };

    let grocery = sqlx::query_as::<_, Grocery>(&format!(
        r#"
        UPDATE groceries
        SET inventory = $1, updated_at = NOW()
        WHERE id = $2
        RETURNING {GROCERY_COLUMNS}
        "#
    ))
    .bind(next)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(grocery)
}

// ── Booking ───────────────────────────────────────────────────────────────────

/// Books an order all-or-nothing.
///
/// Every referenced row is locked (in id order, so concurrent bookings cannot
/// deadlock) before the stock check, and the decrements are written in the same
/// transaction. A rejected order leaves every row untouched.
pub async fn book_order(pool: &PgPool, order: &OrderRequest) -> AppResult<BookingPlan> {
    let ids = order.item_ids();

    let mut tx = pool.begin().await?;

    let stock = sqlx::query_as::<_, Grocery>(&format!(
        r#"
        SELECT {GROCERY_COLUMNS}
        FROM groceries
        WHERE id = ANY($1)
        ORDER BY id
        FOR UPDATE
        "#
    ))
    .bind(&ids)
    .fetch_all(&mut *tx)
    .await?;

    let plan = match booking::plan(&order.groceries, &stock) {
        Ok(plan) => plan,
        Err(e) => return Err(abort(tx, e).await),
    };

    let (item_ids, quantities) = plan.columns();
    sqlx::query(
        r#"
        UPDATE groceries AS g
        SET inventory  = g.inventory - d.quantity,
            updated_at = NOW()
        FROM UNNEST($1::uuid[], $2::int[]) AS d(id, quantity)
        WHERE g.id = d.id
        "#,
    )
    .bind(&item_ids)
    .bind(&quantities)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(plan)
}
