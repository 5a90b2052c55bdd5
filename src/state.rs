//! Shared application state for all routes.

use crate::store::ResourceStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResourceStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        AppState { store }
    }
}
