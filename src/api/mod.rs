//! HTTP surface of the storefront. Public catalog and auth routes sit next
//! to the bearer-guarded cart, checkout, order and profile routes.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
