//! Service Container - Centralized service access.
//!
//! Holds one instance of every application service behind `Arc<dyn Trait>`,
//! all sharing the same Unit of Work. Also provides small helpers for running
//! independent reads concurrently.

use std::future::Future;
use std::sync::Arc;

use super::{AuthService, CartService, CatalogService, CheckoutService, OrderService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn cart(&self) -> Arc<dyn CartService>;

    fn checkout(&self) -> Arc<dyn CheckoutService>;

    fn orders(&self) -> Arc<dyn OrderService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    catalog_service: Arc<dyn CatalogService>,
    cart_service: Arc<dyn CartService>,
    checkout_service: Arc<dyn CheckoutService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Build every service over one shared Unit of Work
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, CartManager, CatalogManager, CheckoutManager, OrderManager};

        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            checkout_service: Arc::new(CheckoutManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn cart(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn checkout(&self) -> Arc<dyn CheckoutService> {
        self.checkout_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}

/// Run independent async operations concurrently.
///
/// Each helper returns when all operations complete, or with the first error.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// # Example
    /// ```ignore
    /// let (orders, spent) = parallel::join2(
    ///     repo.count_for_user(id),
    ///     repo.total_spent(id),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}
