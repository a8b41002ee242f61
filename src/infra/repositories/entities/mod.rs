//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod cart;
pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_image;
pub mod user;
