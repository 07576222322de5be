pub mod invoice;
pub mod product;
pub mod profile;

pub use invoice::{Customer, Invoice, InvoiceDraft, LineItem, Totals};
pub use product::{derive_product_id, Product};
pub use profile::{CompanyType, UserProfile};
