//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod cart_repository;
pub mod entities;
mod order_repository;
mod product_repository;
pub(crate) mod queries;
mod user_repository;

pub use cart_repository::{CartRepository, CartStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use cart_repository::MockCartRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
