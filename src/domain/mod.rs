//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and read projections of the storefront.
//! Nothing here touches the database.

pub mod cart;
pub mod order;
pub mod password;
pub mod product;
pub mod user;

pub use cart::{
    Cart, CartHeader, CartItem, CartItemView, CartLine, CartStats, CartView, CheckoutCart,
    CheckoutLine, CheckoutSummary,
};
pub use order::{
    NewOrder, Order, OrderDetail, OrderItem, OrderItemView, OrderStatus, OrderSummary,
    StatusCounts, StatusFilter,
};
pub use password::Password;
pub use product::{
    primary_image_url, CategorySummary, Product, ProductDetail, ProductFilter, ProductImage,
    ProductSummary,
};
pub use user::{
    MembershipLevel, NewUser, ProfileUpdate, User, UserProfile, UserResponse, UserRole,
};
