//! HTTP API handlers for the dashboard service

mod gate;
mod health;
mod records;

pub use gate::gate_middleware;
pub use health::health_routes;
pub use records::{export_csv, get_records, get_summary};
