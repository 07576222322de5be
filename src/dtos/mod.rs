mod invoices;
mod lookup;
mod products;
mod profile;

pub use invoices::{
    CreateInvoiceRequest, CreateInvoiceResponse, CustomerInput, ExportInvoiceRequest,
    InvoiceListResponse, InvoiceResponse, LineItemInput, ReconcileResponse,
    StockApplicationReport, StockApplicationStatus,
};
pub use lookup::{LookupOutcome, LookupParams, LookupProduct};
pub use products::{
    CreateProductRequest, InventoryOverviewResponse, ProductListParams, ProductListResponse,
    ProductResponse, UpdateProductRequest,
};
pub use profile::{ProfileResponse, UpsertProfileRequest};
