//! Flowdeck backend server.
//!
//! This crate provides:
//! - Configuration loaded from env files and the process environment
//! - A thin client for the hosted datastore
//! - The AI pipeline: prompt templates, LLM gateway, response extraction,
//!   and reconciliation of model output back into the store
//! - The HTTP API (boards, cards, AI operations, settings)

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Most async API methods can fail

pub mod ai;
pub mod config;
pub mod http;
pub mod store;

pub use config::Config;
pub use store::StoreClient;
