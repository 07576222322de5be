use crate::dtos::{LookupOutcome, LookupParams, LookupProduct};
use crate::error::AppError;
use crate::services::LookupResult;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;

/// Resolve a scanned barcode against the external lookup provider.
///
/// A provider miss is a 200 `not_found` outcome (manual entry required);
/// transport and provider failures come back as 502 with the code still
/// echoed so the caller never has to rescan.
pub async fn lookup_barcode(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Response, AppError> {
    let code = params.code.as_deref().map(str::trim).unwrap_or("");
    if code.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "barcode code is required"
        )));
    }

    match state.lookup.lookup(code).await {
        Ok(LookupResult::Found(info)) => {
            counter!("barcode_lookups_total", "outcome" => "found").increment(1);
            Ok(Json(LookupOutcome::Found {
                code: code.to_string(),
                product: LookupProduct {
                    name: info.name,
                    price: info.price,
                    vendor: info.vendor,
                },
            })
            .into_response())
        }
        Ok(LookupResult::NotFound) => {
            counter!("barcode_lookups_total", "outcome" => "not_found").increment(1);
            Ok(Json(LookupOutcome::NotFound {
                code: code.to_string(),
                message: "Product not found - fill remaining fields manually".to_string(),
            })
            .into_response())
        }
        Err(AppError::BadGateway(message)) => {
            counter!("barcode_lookups_total", "outcome" => "failed").increment(1);
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(LookupOutcome::Failed {
                    code: code.to_string(),
                    message,
                }),
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}
