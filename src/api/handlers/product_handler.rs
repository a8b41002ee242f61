//! Catalog handlers (public).

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{CategorySummary, ProductDetail, ProductFilter};
use crate::errors::AppResult;
use crate::types::{PaginationParams, ProductPage};

/// Catalog narrowing, read alongside the paging parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Only products of this category
    pub category_id: Option<Uuid>,
    /// Matched against product name and description
    #[param(example = "linen")]
    pub search: Option<String>,
}

impl From<CatalogQuery> for ProductFilter {
    fn from(query: CatalogQuery) -> Self {
        Self {
            category_id: query.category_id,
            search: query.search,
        }
    }
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

/// List active products, newest first
#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(PaginationParams, CatalogQuery),
    responses(
        (status = 200, description = "Page of products", body = ProductPage)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<ProductPage>> {
    let page = state
        .catalog_service
        .list_products(query.into(), params)
        .await?;
    Ok(Json(page))
}

/// Categories that have at least one active product
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "Categories by name", body = Vec<CategorySummary>)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategorySummary>>> {
    let categories = state.catalog_service.list_categories().await?;
    Ok(Json(categories))
}

/// Product page
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Catalog",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductDetail),
        (status = 404, description = "Product not found or inactive")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProductDetail>> {
    let product = state.catalog_service.get_product(id).await?;
    Ok(Json(product))
}
