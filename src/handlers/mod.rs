pub mod export;
pub mod health;
pub mod invoices;
pub mod lookup;
pub mod products;
pub mod profile;
