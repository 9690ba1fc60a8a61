//! Sabedoria Library Administration System
//!
//! A Rust implementation of the Sabedoria church library server,
//! providing a REST JSON API for managing the catalog, loans, and
//! reservations of a congregation library.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
