//! Invoice draft (in-memory working set) and the persisted invoice snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Fixed sales tax rate applied to every invoice.
pub const TAX_RATE: f64 = 0.10;

/// One row of an invoice: a snapshot of a catalog product at add time.
///
/// `unit_price` is copied when the line is created and does not track later
/// price changes to the source product. `total` is always recomputed as
/// `quantity * unit_price`, never mutated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            name: "N/A".to_string(),
            email: "N/A".to_string(),
            phone: "N/A".to_string(),
        }
    }
}

/// Aggregates derived from a line-item set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),
    #[error("no line item at index {0}")]
    IndexOutOfBounds(usize),
}

/// The working set of line items for one invoice-in-progress.
///
/// Owned exclusively by the building session until finalization; discarded
/// without side effects if the invoice is abandoned.
#[derive(Debug, Default)]
pub struct InvoiceDraft {
    items: Vec<LineItem>,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line with quantity 1 and return its index.
    ///
    /// Scanning the same product twice yields two separate lines; lines are
    /// deliberately not merged by product identifier.
    pub fn add_item(&mut self, product_id: &str, name: &str, unit_price: f64) -> usize {
        self.items.push(LineItem {
            product_id: product_id.to_string(),
            name: name.to_string(),
            unit_price,
            quantity: 1,
            total: unit_price,
        });
        self.items.len() - 1
    }

    /// Set the quantity on the line at `index` and recompute its total.
    ///
    /// Non-positive quantities are rejected at this boundary rather than
    /// clamped into the model.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<(), DraftError> {
        if quantity < 1 {
            return Err(DraftError::InvalidQuantity(quantity));
        }
        let item = self
            .items
            .get_mut(index)
            .ok_or(DraftError::IndexOutOfBounds(index))?;
        item.quantity = quantity;
        item.total = quantity as f64 * item.unit_price;
        Ok(())
    }

    /// Remove the line at `index`. Remaining lines keep their own totals.
    pub fn remove_item(&mut self, index: usize) -> Result<LineItem, DraftError> {
        if index >= self.items.len() {
            return Err(DraftError::IndexOutOfBounds(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Compute subtotal, tax and total as a pure fold over the lines.
    pub fn totals(&self) -> Totals {
        let subtotal: f64 = self.items.iter().map(|item| item.total).sum();
        let tax = subtotal * TAX_RATE;
        Totals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// The finalized, persisted record of a sale. Write-once: no update or
/// delete path exists for invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Freeze a draft into a persisted snapshot with a fresh identifier.
    pub fn from_draft(user_id: String, customer: Customer, draft: InvoiceDraft) -> Self {
        let totals = draft.totals();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            customer,
            items: draft.into_items(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            created_at: Utc::now(),
        }
    }

    /// Line quantities summed per product, in first-seen order.
    ///
    /// Duplicate-scan lines referencing the same product collapse to one
    /// entry so the stock decrement is applied once with the combined
    /// quantity.
    pub fn quantities_by_product(&self) -> Vec<(String, i64)> {
        let mut grouped: Vec<(String, i64)> = Vec::new();
        for item in &self.items {
            match grouped.iter_mut().find(|(id, _)| *id == item.product_id) {
                Some((_, quantity)) => *quantity += item.quantity,
                None => grouped.push((item.product_id.clone(), item.quantity)),
            }
        }
        grouped
    }
}
