//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, cart_handler, checkout_handler, order_handler, product_handler, user_handler,
};
use crate::domain::{
    CartItemView, CartStats, CartView, CategorySummary, CheckoutSummary, MembershipLevel, Order,
    OrderDetail, OrderItem, OrderItemView, OrderStatus, OrderSummary, ProductDetail, ProductImage,
    ProductSummary, StatusCounts, UserProfile, UserResponse, UserRole,
};
use crate::services::TokenResponse;
use crate::types::{PaginationMeta, ProductPage};

/// OpenAPI documentation for the storefront
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Online store: catalog, shopping cart, checkout and order history"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        product_handler::list_products,
        product_handler::get_product,
        product_handler::list_categories,
        cart_handler::get_cart,
        cart_handler::cart_count,
        cart_handler::add_item,
        cart_handler::update_item,
        cart_handler::remove_item,
        cart_handler::clear_cart,
        checkout_handler::checkout_summary,
        checkout_handler::place_order,
        order_handler::list_orders,
        order_handler::status_counts,
        order_handler::get_order,
        user_handler::get_profile,
        user_handler::update_profile,
    ),
    components(
        schemas(
            // Accounts
            UserRole,
            UserResponse,
            UserProfile,
            MembershipLevel,
            user_handler::UpdateProfileRequest,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // Catalog
            CategorySummary,
            ProductImage,
            ProductSummary,
            ProductDetail,
            ProductPage,
            PaginationMeta,
            // Cart and checkout
            CartStats,
            CartItemView,
            CartView,
            CheckoutSummary,
            cart_handler::AddItemRequest,
            cart_handler::UpdateQuantityRequest,
            // Orders
            OrderStatus,
            OrderItem,
            Order,
            OrderItemView,
            OrderSummary,
            OrderDetail,
            StatusCounts,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Customer registration and login"),
        (name = "Catalog", description = "Product listings and pages"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Checkout", description = "Turning the cart into an order"),
        (name = "Orders", description = "Order history"),
        (name = "Users", description = "Account profile")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
