//! Core business logic for lapor-rs.
//!
//! Services validate typed inputs, enforce role rules and the report
//! status machine, and shape enriched read models on top of the
//! repositories in `lapor-db`.

pub mod services;

pub use services::*;
