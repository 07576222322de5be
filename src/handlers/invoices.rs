//! Invoice finalization and stock reconciliation.
//!
//! Finalize persists the invoice snapshot first, then applies one
//! conditional stock decrement per referenced product. The two steps are
//! deliberately independent: a failed decrement never rolls the invoice
//! back, it is reported per product and can be replayed via the reconcile
//! endpoint until every product is applied.

use crate::dtos::{
    CreateInvoiceRequest, CreateInvoiceResponse, InvoiceListResponse, InvoiceResponse,
    LineItemInput, ReconcileResponse, StockApplicationReport,
};
use crate::error::AppError;
use crate::middleware::user_id::UserId;
use crate::models::{Invoice, InvoiceDraft};
use crate::services::Store;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use metrics::counter;
use std::sync::Arc;
use validator::Validate;

/// Rebuild a draft from submitted lines. Totals are recomputed server-side;
/// client-supplied totals are ignored.
pub(crate) fn rebuild_draft(items: &[LineItemInput]) -> Result<InvoiceDraft, AppError> {
    let mut draft = InvoiceDraft::new();
    for item in items {
        let index = draft.add_item(&item.product_id, &item.name, item.unit_price);
        draft.update_quantity(index, item.quantity)?;
    }
    Ok(draft)
}

pub async fn create_invoice(
    State(state): State<AppState>,
    user_id: UserId,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let draft = rebuild_draft(&payload.items)?;
    let invoice = Invoice::from_draft(user_id.0, payload.customer.into_customer(), draft);
    let invoice_id = invoice.id.clone();

    tracing::info!(
        invoice_id = %invoice_id,
        items = invoice.items.len(),
        total = invoice.total,
        "Persisting invoice"
    );
    state.store.insert_invoice(invoice.clone()).await?;
    counter!("invoices_created_total").increment(1);

    let stock_applications = apply_stock_decrements(&state.store, &invoice).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateInvoiceResponse {
            invoice: InvoiceResponse::from(invoice),
            stock_applications,
        }),
    ))
}

/// Replay the stock decrements for a persisted invoice.
///
/// Safe to call repeatedly: products already decremented by this invoice
/// report `already_applied` and are not decremented again.
pub async fn reconcile_invoice(
    State(state): State<AppState>,
    _user_id: UserId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.store.get_invoice(&id).await?.ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("invoice {} not found", id))
    })?;

    let stock_applications = apply_stock_decrements(&state.store, &invoice).await;

    Ok(Json(ReconcileResponse {
        invoice_id: invoice.id,
        stock_applications,
    }))
}

pub async fn list_invoices(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let invoices = state.store.list_invoices().await?;
    let total = invoices.len();
    Ok(Json(InvoiceListResponse {
        invoices: invoices.into_iter().map(InvoiceResponse::from).collect(),
        total,
    }))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state.store.get_invoice(&id).await?.ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("invoice {} not found", id))
    })?;
    Ok(Json(InvoiceResponse::from(invoice)))
}

/// Apply one decrement per referenced product, quantities summed across
/// duplicate lines. Failures are reported per product, never rolled back.
async fn apply_stock_decrements(
    store: &Arc<dyn Store>,
    invoice: &Invoice,
) -> Vec<StockApplicationReport> {
    let mut reports = Vec::new();
    for (product_id, quantity) in invoice.quantities_by_product() {
        let report = match store
            .apply_stock_decrement(&product_id, quantity, &invoice.id)
            .await
        {
            Ok(application) => {
                StockApplicationReport::from_application(product_id, quantity, application)
            }
            Err(e) => {
                tracing::error!(
                    invoice_id = %invoice.id,
                    product_id = %product_id,
                    "Stock decrement failed: {}",
                    e
                );
                StockApplicationReport::failed(product_id, quantity, e.to_string())
            }
        };
        counter!("stock_decrements_total", "status" => report.status.as_str()).increment(1);
        reports.push(report);
    }
    reports
}
