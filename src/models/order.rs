use indexmap::IndexSet;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Transient booking request; only its inventory effect is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub groceries: Vec<OrderLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub quantity: i32,
}

impl OrderRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.groceries.is_empty() {
            return Err(AppError::BadRequest(
                "Invalid request body. Provide a list of groceries.".to_string(),
            ));
        }
        if let Some(line) = self.groceries.iter().find(|l| l.quantity <= 0) {
            return Err(AppError::BadRequest(format!(
                "quantity for grocery {} must be > 0",
                line.id
            )));
        }
        Ok(())
    }

    /// Distinct ids in first-seen order.
    pub fn item_ids(&self) -> Vec<Uuid> {
        let ids: IndexSet<Uuid> = self.groceries.iter().map(|l| l.id).collect();
        ids.into_iter().collect()
    }
}
