//! Shopping cart handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CartStats, CartView};
use crate::errors::AppResult;
use crate::types::NoContent;

/// Add-to-cart request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 1, minimum = 1)]
    pub quantity: i32,
}

/// Quantity change request; zero or less removes the line
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuantityRequest {
    #[schema(example = 2)]
    pub quantity: i32,
}

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/count", get(cart_count))
        .route("/items", post(add_item))
        .route("/items/:id", put(update_item).delete(remove_item))
}

/// Current user's cart
#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart contents", body = CartView),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CartView>> {
    let cart = state.cart_service.get_cart(current_user.id).await?;
    Ok(Json(cart))
}

/// Item count and total for the cart badge
#[utoipa::path(
    get,
    path = "/cart/count",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart totals", body = CartStats),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn cart_count(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CartStats>> {
    let stats = state.cart_service.cart_stats(current_user.id).await?;
    Ok(Json(stats))
}

/// Add a product to the cart
#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartStats),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found or inactive"),
        (status = 409, description = "Not enough stock")
    )
)]
pub async fn add_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddItemRequest>,
) -> AppResult<Json<CartStats>> {
    let stats = state
        .cart_service
        .add_to_cart(current_user.id, payload.product_id, payload.quantity)
        .await?;
    Ok(Json(stats))
}

/// Change the quantity of a cart line
#[utoipa::path(
    put,
    path = "/cart/items/{id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Cart item ID")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartStats),
        (status = 404, description = "Item not in the user's cart"),
        (status = 409, description = "Not enough stock")
    )
)]
pub async fn update_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateQuantityRequest>,
) -> AppResult<Json<CartStats>> {
    let stats = state
        .cart_service
        .update_quantity(current_user.id, id, payload.quantity)
        .await?;
    Ok(Json(stats))
}

/// Remove a line from the cart
#[utoipa::path(
    delete,
    path = "/cart/items/{id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Cart item ID")
    ),
    responses(
        (status = 200, description = "Item removed", body = CartStats),
        (status = 404, description = "Item not in the user's cart")
    )
)]
pub async fn remove_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CartStats>> {
    let stats = state.cart_service.remove_item(current_user.id, id).await?;
    Ok(Json(stats))
}

/// Empty the cart
#[utoipa::path(
    delete,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Cart cleared"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn clear_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<NoContent> {
    state.cart_service.clear_cart(current_user.id).await?;
    Ok(NoContent)
}
