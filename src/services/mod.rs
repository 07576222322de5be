pub mod lookup;
pub mod metrics;
pub mod pdf;
pub mod store;

pub use lookup::{BarcodeLookupClient, LookupResult, ProductInfo};
pub use metrics::{get_metrics, init_metrics};
pub use store::{MemoryStore, MongoDb, Store};
