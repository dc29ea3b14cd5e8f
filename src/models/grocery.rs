use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Catalog row. `name` is unique across the table; `inventory` never drops below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Grocery {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub inventory: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Response views ────────────────────────────────────────────────────────────

/// Admin listing entry, includes the stock count.
#[derive(Debug, Clone, Serialize)]
pub struct AdminGroceryView {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub inventory: i32,
}

impl From<Grocery> for AdminGroceryView {
    fn from(g: Grocery) -> Self {
        Self {
            id: g.id,
            name: g.name,
            price: g.price,
            inventory: g.inventory,
        }
    }
}

/// Shopper listing entry. Stock levels are not exposed.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableGroceryView {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
}

impl From<Grocery> for AvailableGroceryView {
    fn from(g: Grocery) -> Self {
        Self {
            id: g.id,
            name: g.name,
            price: g.price,
        }
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewGrocery {
    pub name: String,
    pub price: f64,
    pub inventory: i32,
}

impl NewGrocery {
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_inventory(self.inventory)
    }
}

/// Partial update: `None` leaves the stored value untouched, `Some(0)` or
/// `Some("")` is an explicit value and is validated like any other.
#[derive(Debug, Default, Deserialize)]
pub struct GroceryChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub inventory: Option<i32>,
}

impl GroceryChanges {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(inventory) = self.inventory {
            validate_inventory(inventory)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct InventoryAdjustment {
    pub quantity: i32,
    pub action: String,
}

impl InventoryAdjustment {
    /// Checks the quantity and resolves the action before the store is touched.
    pub fn parse(&self) -> AppResult<InventoryAction> {
        let action = self.action.parse::<InventoryAction>()?;
        if self.quantity < 0 {
            return Err(AppError::BadRequest("quantity must be >= 0".to_string()));
        }
        Ok(action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryAction {
    Increase,
    /// Subtracts but never below zero.
    Decrease,
}

impl InventoryAction {
    /// Inventory after applying `quantity`, or `None` if an increase overflows.
    pub fn apply(self, current: i32, quantity: i32) -> Option<i32> {
        match self {
            Self::Increase => current.checked_add(quantity),
            Self::Decrease => Some(current.saturating_sub(quantity).max(0)),
        }
    }
}

impl FromStr for InventoryAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            _ => Err(AppError::BadRequest(
                r#"Invalid action. Use "increase" or "decrease"."#.to_string(),
            )),
        }
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest("price must be >= 0".to_string()));
    }
    Ok(())
}

fn validate_inventory(inventory: i32) -> AppResult<()> {
    if inventory < 0 {
        return Err(AppError::BadRequest("inventory must be >= 0".to_string()));
    }
    Ok(())
}
