//! HTTP API handlers for the registration service

mod health;
mod registration;

pub use health::health_routes;
pub use registration::{
    advance, create_session, get_session, go_back, select_hosting_status, select_participation,
    submit, toggle_day, update_field,
};
