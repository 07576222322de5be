pub mod metrics;
pub mod user_id;
