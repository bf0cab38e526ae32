//! External collaborator clients for the registration service

pub mod guidance;
pub mod whatsapp;

pub use guidance::GuidanceClient;
