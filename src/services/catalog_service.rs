//! Catalog service - product pages and listings.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CategorySummary, ProductDetail, ProductFilter, ProductSummary};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Product page; inactive or unknown products are `NotFound`
    async fn get_product(&self, id: Uuid) -> AppResult<ProductDetail>;

    /// Active products, newest first, optionally narrowed by category and
    /// a search over name and description
    async fn list_products(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductSummary>>;

    /// Categories that currently have something to sell
    async fn list_categories(&self) -> AppResult<Vec<CategorySummary>>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn get_product(&self, id: Uuid) -> AppResult<ProductDetail> {
        self.uow.products().find_detail(id).await?.ok_or_not_found()
    }

    async fn list_products(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductSummary>> {
        let page = params.page();
        let per_page = params.limit();
        let (items, total) = self.uow.products().list_active(filter, params).await?;

        Ok(Paginated::new(items, page, per_page, total))
    }

    async fn list_categories(&self) -> AppResult<Vec<CategorySummary>> {
        self.uow.products().list_categories().await
    }
}
