//! Shared types for the Flowdeck backend.
//!
//! This crate provides:
//! - Domain entities (boards, cards, priority history)
//! - Request/response types for the HTTP API
//! - The error taxonomy shared across the server

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod errors;
pub mod models;

pub use errors::{FlowdeckError, FlowdeckResult};
pub use models::*;
