//! Order planning: decides whether an order can be booked against a stock
//! snapshot and, if so, how much to take from each item.
//!
//! The planner is pure. The caller is responsible for reading the snapshot
//! under row locks and applying the plan in the same transaction.

use indexmap::{IndexMap, IndexSet};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Grocery, OrderLine};

/// One aggregated decrement for a single catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrement {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub remaining: i32,
}

/// Validated set of decrements, one per distinct item, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPlan {
    pub decrements: Vec<Decrement>,
}

impl BookingPlan {
    pub fn total_units(&self) -> i64 {
        self.decrements.iter().map(|d| i64::from(d.quantity)).sum()
    }

    /// Column-wise arrays for an `UNNEST($1::uuid[], $2::int[])` update.
    pub fn columns(&self) -> (Vec<Uuid>, Vec<i32>) {
        self.decrements.iter().map(|d| (d.id, d.quantity)).unzip()
    }
}

/// Builds a plan for `lines` against `stock`.
///
/// Missing items are reported before any stock check, naming every missing id.
/// Lines are then checked in order against a running balance, so repeated ids
/// draw from the same count; the first line that cannot be covered fails the
/// whole order.
pub fn plan(lines: &[OrderLine], stock: &[Grocery]) -> AppResult<BookingPlan> {
    let by_id: IndexMap<Uuid, &Grocery> = stock.iter().map(|g| (g.id, g)).collect();

    let missing: IndexSet<Uuid> = lines
        .iter()
        .map(|l| l.id)
        .filter(|id| !by_id.contains_key(id))
        .collect();
    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(Uuid::to_string).collect();
        return Err(AppError::NotFound(format!(
            "One or more requested groceries do not exist: {}",
            ids.join(", ")
        )));
    }

    let mut taken: IndexMap<Uuid, Decrement> = IndexMap::with_capacity(lines.len());
    for line in lines {
        let Some(item) = by_id.get(&line.id) else {
            continue;
        };
        let entry = taken.entry(line.id).or_insert_with(|| Decrement {
            id: item.id,
            name: item.name.clone(),
            quantity: 0,
            remaining: item.inventory,
        });

        if entry.remaining < line.quantity {
            return Err(AppError::InsufficientInventory(item.name.clone()));
        }
        entry.remaining -= line.quantity;
        entry.quantity += line.quantity;
    }

    Ok(BookingPlan {
        decrements: taken.into_values().collect(),
    })
}
