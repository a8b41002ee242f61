//! Application services - the storefront's use cases.
//!
//! Each service is a trait plus one implementation generic over the
//! Unit of Work, so handlers hold `Arc<dyn Trait>` and tests can swap
//! in mocked repositories.

mod auth_service;
mod cart_service;
mod catalog_service;
mod checkout_service;
pub mod container;
mod order_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use cart_service::{CartManager, CartService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use checkout_service::{CheckoutManager, CheckoutService};
pub use order_service::{OrderManager, OrderService};
