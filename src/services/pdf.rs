//! Invoice PDF rendering.
//!
//! A formatting transform over already-computed draft state: company block
//! from the user profile, customer block, line-item table, totals footer.
//! Never touches stored state and is independently repeatable.

use crate::error::AppError;
use crate::models::{Customer, LineItem, Totals, UserProfile};
use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 12.0;
const ROW_STEP_MM: f32 = 8.0;

// Table column x positions.
const COL_PRODUCT: f32 = MARGIN_MM;
const COL_PRICE: f32 = 100.0;
const COL_QUANTITY: f32 = 135.0;
const COL_TOTAL: f32 = 165.0;

pub fn render_invoice(
    profile: &UserProfile,
    customer: &Customer,
    items: &[LineItem],
    totals: Totals,
) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new("Invoice", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "invoice");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("failed to load font: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("failed to load font: {}", e)))?;

    let mut layer_ref = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer_ref.use_text("Invoice", 18.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= ROW_STEP_MM;
    layer_ref.use_text(
        format!("Date: {}", Utc::now().format("%Y-%m-%d")),
        12.0,
        Mm(MARGIN_MM),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM;

    let company_name = profile
        .company_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Your Company Name".to_string());
    let company_address = profile
        .company_address
        .clone()
        .filter(|address| !address.trim().is_empty())
        .unwrap_or_else(|| "Your Company Address".to_string());

    layer_ref.use_text(
        format!("Company: {}", company_name),
        12.0,
        Mm(MARGIN_MM),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM;
    layer_ref.use_text(
        format!("Address: {}", company_address),
        12.0,
        Mm(MARGIN_MM),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM * 1.5;

    layer_ref.use_text(
        format!("Customer: {}", customer.name),
        12.0,
        Mm(MARGIN_MM),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM;
    layer_ref.use_text(
        format!("Email: {}", customer.email),
        12.0,
        Mm(MARGIN_MM),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM;
    layer_ref.use_text(
        format!("Phone: {}", customer.phone),
        12.0,
        Mm(MARGIN_MM),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM * 1.5;

    draw_table_header(&layer_ref, &bold, y);
    y -= ROW_STEP_MM;

    for item in items {
        if y < MARGIN_MM + 4.0 * ROW_STEP_MM {
            let (next_page, next_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "invoice");
            layer_ref = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
            draw_table_header(&layer_ref, &bold, y);
            y -= ROW_STEP_MM;
        }
        layer_ref.use_text(item.name.clone(), 10.0, Mm(COL_PRODUCT), Mm(y), &regular);
        layer_ref.use_text(
            format!("{:.2}", item.unit_price),
            10.0,
            Mm(COL_PRICE),
            Mm(y),
            &regular,
        );
        layer_ref.use_text(
            item.quantity.to_string(),
            10.0,
            Mm(COL_QUANTITY),
            Mm(y),
            &regular,
        );
        layer_ref.use_text(
            format!("{:.2}", item.total),
            10.0,
            Mm(COL_TOTAL),
            Mm(y),
            &regular,
        );
        y -= ROW_STEP_MM;
    }

    y -= ROW_STEP_MM;
    layer_ref.use_text(
        format!("Subtotal: {:.2}", totals.subtotal),
        12.0,
        Mm(COL_QUANTITY),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM;
    layer_ref.use_text(
        format!("Tax (10%): {:.2}", totals.tax),
        12.0,
        Mm(COL_QUANTITY),
        Mm(y),
        &regular,
    );
    y -= ROW_STEP_MM;
    layer_ref.use_text(
        format!("Total: {:.2}", totals.total),
        12.0,
        Mm(COL_QUANTITY),
        Mm(y),
        &bold,
    );

    doc.save_to_bytes()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("failed to render invoice pdf: {}", e)))
}

fn draw_table_header(layer: &PdfLayerReference, bold: &IndirectFontRef, y: f32) {
    layer.use_text("Product", 10.0, Mm(COL_PRODUCT), Mm(y), bold);
    layer.use_text("Price", 10.0, Mm(COL_PRICE), Mm(y), bold);
    layer.use_text("Quantity", 10.0, Mm(COL_QUANTITY), Mm(y), bold);
    layer.use_text("Total", 10.0, Mm(COL_TOTAL), Mm(y), bold);
}
