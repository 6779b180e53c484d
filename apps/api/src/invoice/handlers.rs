//! Axum route handlers for the Invoice API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::invoice::{InvoiceRecord, InvoiceReport, LineItem, ValidationReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InvoiceTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct LineItemsResponse {
    pub line_items: Vec<LineItem>,
}

/// POST /api/v1/invoices/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(req): Json<InvoiceTextRequest>,
) -> Result<Json<InvoiceRecord>, AppError> {
    Ok(Json(state.invoices.extract(&req.text).await?))
}

/// POST /api/v1/invoices/line-items
pub async fn handle_line_items(
    State(state): State<AppState>,
    Json(req): Json<InvoiceTextRequest>,
) -> Result<Json<LineItemsResponse>, AppError> {
    let line_items = state.invoices.extract_line_items(&req.text).await?;
    Ok(Json(LineItemsResponse { line_items }))
}

/// POST /api/v1/invoices/validate
///
/// Pure check over a caller-supplied record; makes no completion call.
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(invoice): Json<InvoiceRecord>,
) -> Json<ValidationReport> {
    Json(state.invoices.validate_invoice(&invoice))
}

/// POST /api/v1/invoices/extract-and-validate
pub async fn handle_extract_and_validate(
    State(state): State<AppState>,
    Json(req): Json<InvoiceTextRequest>,
) -> Result<Json<InvoiceReport>, AppError> {
    Ok(Json(state.invoices.extract_and_validate(&req.text).await?))
}
