//! # Retiro Common Library
//!
//! Shared code for the Retiro registration services including:
//! - Registration record model and day configuration
//! - Event configuration loading
//! - Tabular store (sheet) client
//! - Common error types

pub mod config;
pub mod error;
pub mod model;
pub mod sheet;

pub use config::{DayConfig, EventConfig, EventInfo};
pub use error::{Error, Result};
pub use model::{HostingStatus, ParticipationType, RegistrationRecord};
