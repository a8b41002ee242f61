//! Order history handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{OrderDetail, OrderSummary, StatusCounts, StatusFilter};
use crate::errors::AppResult;

/// Order list filter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// `all` (default) or one of Pending, Paid, Shipped, Delivered, Cancelled
    pub status: Option<String>,
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/status-counts", get(status_counts))
        .route("/:id", get(get_order))
}

/// Order history, newest first
///
/// An unrecognised `status` value is rejected with 400 instead of yielding
/// an empty list, so a mistyped filter is never mistaken for "no orders".
/// Orders whose stored status is outside the known set still appear under
/// `all` with that status shown as stored.
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders", body = Vec<OrderSummary>),
        (status = 400, description = "Unrecognised status filter")
    )
)]
pub async fn list_orders(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    let filter = StatusFilter::parse(query.status.as_deref())?;
    let orders = state.order_service.list_orders(current_user.id, filter).await?;
    Ok(Json(orders))
}

/// Number of orders per status
#[utoipa::path(
    get,
    path = "/orders/status-counts",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts per status", body = StatusCounts)
    )
)]
pub async fn status_counts(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<StatusCounts>> {
    let counts = state.order_service.status_counts(current_user.id).await?;
    Ok(Json(counts))
}

/// One order with its lines and the customer's contact details
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order details", body = OrderDetail),
        (status = 404, description = "No such order for this user")
    )
)]
pub async fn get_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let order = state.order_service.get_order(current_user.id, id).await?;
    Ok(Json(order))
}
