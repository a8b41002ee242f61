//! Storefront - backend of an online store.
//!
//! Customers browse an active product catalog, keep a persistent shopping
//! cart, and check out. Checkout turns the cart into an order with frozen
//! unit prices, takes the purchased quantities out of stock and empties the
//! cart, all in one database transaction.
//!
//! # Layers
//!
//! - **cli** / **commands**: `serve` and `migrate` subcommands
//! - **config**: environment settings and constants
//! - **domain**: users, products, carts and orders
//! - **services**: catalog, cart, checkout, order history, authentication
//! - **infra**: SeaORM entities, repositories, migrations, Unit of Work
//! - **api**: axum handlers, JWT middleware, routes, OpenAPI
//! - **types**: pagination and response helpers
//! - **errors**: `AppError` and its HTTP mapping
//!
//! ```bash
//! cargo run -- migrate up
//! cargo run -- serve --port 3000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
