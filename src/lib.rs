//! KhetSathi: equipment rental, byproduct trading and GreenPoints for farmers.

use std::sync::Arc;

pub mod auth;
pub mod community;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod quiz;
pub mod responder;
pub mod rewards;
pub mod store;

pub use config::Config;
pub use controllers::{configure, not_found};
pub use store::{MemoryStore, MongoStore, Store};

/// Shared by every handler through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self { store, config }
    }
}
