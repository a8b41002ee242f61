//! Application state - Dependency injection container.
//!
//! Provides handlers with every application service and the database handle.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, CartService, CatalogService, CheckoutService, OrderService, ServiceContainer,
    Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub cart_service: Arc<dyn CartService>,
    pub checkout_service: Arc<dyn CheckoutService>,
    pub order_service: Arc<dyn OrderService>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state with services wired over the database.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, database)
    }

    /// Create application state from any service container.
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            catalog_service: container.catalog(),
            cart_service: container.cart(),
            checkout_service: container.checkout(),
            order_service: container.orders(),
            database,
        }
    }
}
