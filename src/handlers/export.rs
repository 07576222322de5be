use crate::dtos::ExportInvoiceRequest;
use crate::error::AppError;
use crate::handlers::invoices::rebuild_draft;
use crate::middleware::user_id::UserId;
use crate::services::pdf;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use validator::Validate;

/// Render the submitted draft state as a downloadable PDF.
///
/// Requires an authenticated user with an existing profile (the profile
/// supplies the company branding). Purely a terminal formatting step:
/// repeatable, never part of the finalize sequence, mutates nothing.
pub async fn export_invoice(
    State(state): State<AppState>,
    user_id: UserId,
    Json(payload): Json<ExportInvoiceRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let profile = state.store.get_profile(&user_id.0).await?.ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("profile not found for user {}", user_id.0))
    })?;

    let draft = rebuild_draft(&payload.items)?;
    let customer = payload.customer.into_customer();
    let bytes = pdf::render_invoice(&profile, &customer, draft.items(), draft.totals())?;

    tracing::info!(
        user_id = %user_id.0,
        items = draft.items().len(),
        size = bytes.len(),
        "Rendered invoice PDF"
    );

    let filename = format!("invoice_{}.pdf", Utc::now().timestamp_millis());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
