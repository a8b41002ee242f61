//! Checkout handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CheckoutSummary, Order};
use crate::errors::AppResult;

pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", get(checkout_summary).post(place_order))
}

/// Checkout page: cart and contact details
#[utoipa::path(
    get,
    path = "/checkout",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ready to check out", body = CheckoutSummary),
        (status = 400, description = "Cart is empty"),
        (status = 409, description = "A product does not have enough stock")
    )
)]
pub async fn checkout_summary(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CheckoutSummary>> {
    let summary = state.checkout_service.checkout_summary(current_user.id).await?;
    Ok(Json(summary))
}

/// Turn the cart into an order
#[utoipa::path(
    post,
    path = "/checkout",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Cart is empty"),
        (status = 409, description = "A product does not have enough stock")
    )
)]
pub async fn place_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.checkout_service.checkout(current_user.id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
