//! Core business logic for imgarena.

pub mod services;

pub use services::*;
