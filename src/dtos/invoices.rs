use crate::models::{Customer, Invoice, LineItem};
use crate::services::store::StockApplication;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Serialize is required by the length rule on the containing item vectors.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LineItemInput {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "unit_price must not be negative"))]
    pub unit_price: f64,
    #[validate(range(min = 1, message = "quantity must be a positive integer"))]
    pub quantity: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInput {
    /// Blank fields collapse to the `"N/A"` placeholder.
    pub fn into_customer(self) -> Customer {
        let or_placeholder = |field: Option<String>| {
            field
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "N/A".to_string())
        };
        Customer {
            name: or_placeholder(self.name),
            email: or_placeholder(self.email),
            phone: or_placeholder(self.phone),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub customer: CustomerInput,
    #[validate(
        length(min = 1, message = "invoice must contain at least one line item"),
        nested
    )]
    pub items: Vec<LineItemInput>,
}

/// Export shares the draft shape with finalize but persists nothing.
#[derive(Debug, Deserialize, Validate)]
pub struct ExportInvoiceRequest {
    #[serde(default)]
    pub customer: CustomerInput,
    #[validate(
        length(min = 1, message = "invoice must contain at least one line item"),
        nested
    )]
    pub items: Vec<LineItemInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockApplicationStatus {
    Applied,
    AlreadyApplied,
    InsufficientStock,
    ProductMissing,
    Failed,
}

impl StockApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockApplicationStatus::Applied => "applied",
            StockApplicationStatus::AlreadyApplied => "already_applied",
            StockApplicationStatus::InsufficientStock => "insufficient_stock",
            StockApplicationStatus::ProductMissing => "product_missing",
            StockApplicationStatus::Failed => "failed",
        }
    }
}

/// Per-product outcome of the stock reconciliation step.
#[derive(Debug, Serialize)]
pub struct StockApplicationReport {
    pub product_id: String,
    pub quantity: i64,
    pub status: StockApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StockApplicationReport {
    pub fn from_application(
        product_id: String,
        quantity: i64,
        application: StockApplication,
    ) -> Self {
        let (status, detail) = match application {
            StockApplication::Applied => (StockApplicationStatus::Applied, None),
            StockApplication::AlreadyApplied => (
                StockApplicationStatus::AlreadyApplied,
                Some("decrement was already applied for this invoice".to_string()),
            ),
            StockApplication::InsufficientStock { available } => (
                StockApplicationStatus::InsufficientStock,
                Some(format!("only {} in stock", available)),
            ),
            StockApplication::ProductMissing => (
                StockApplicationStatus::ProductMissing,
                Some("product record no longer exists".to_string()),
            ),
        };
        Self {
            product_id,
            quantity,
            status,
            detail,
        }
    }

    pub fn failed(product_id: String, quantity: i64, detail: String) -> Self {
        Self {
            product_id,
            quantity,
            status: StockApplicationStatus::Failed,
            detail: Some(detail),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub created_at: String,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            customer: invoice.customer,
            items: invoice.items,
            subtotal: invoice.subtotal,
            tax: invoice.tax,
            total: invoice.total,
            created_at: invoice.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateInvoiceResponse {
    pub invoice: InvoiceResponse,
    pub stock_applications: Vec<StockApplicationReport>,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub invoice_id: String,
    pub stock_applications: Vec<StockApplicationReport>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceResponse>,
    pub total: usize,
}
