//! Catalog repository: product pages and listings.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::entities::category;
use super::entities::product::{self, Entity as ProductEntity};
use super::queries;
use crate::domain::{CategorySummary, Product, ProductDetail, ProductFilter, ProductSummary};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID regardless of its active flag
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Product page for an active product, with category and images
    async fn find_detail(&self, id: Uuid) -> AppResult<Option<ProductDetail>>;

    /// Active products matching `filter`, newest first. Returns the page and
    /// the total count of matches.
    async fn list_active(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<ProductSummary>, u64)>;

    /// Categories with at least one active product, by name
    async fn list_categories(&self) -> AppResult<Vec<CategorySummary>>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        queries::product_by_id(&self.db, id).await
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<ProductDetail>> {
        let product = match queries::product_by_id(&self.db, id).await? {
            Some(p) if p.is_active() => p,
            _ => return Ok(None),
        };

        let category_name = queries::category_names(&self.db, &[product.category_id])
            .await?
            .remove(&product.category_id)
            .unwrap_or_default();
        let images = queries::images_for(&self.db, &[product.id])
            .await?
            .remove(&product.id)
            .unwrap_or_default();

        Ok(Some(ProductDetail::new(product, category_name, images)))
    }

    async fn list_active(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<ProductSummary>, u64)> {
        let mut query = ProductEntity::find().filter(product::Column::IsActive.eq(true));
        if let Some(category_id) = filter.category_id {
            query = query.filter(product::Column::CategoryId.eq(category_id));
        }
        if let Some(term) = filter.search_term() {
            query = query.filter(
                Condition::any()
                    .add(product::Column::Name.contains(term))
                    .add(product::Column::Description.contains(term)),
            );
        }

        let paginator = query
            .order_by_desc(product::Column::CreatedAt)
            .order_by_asc(product::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page() - 1).await?;

        let products: Vec<Product> = models.into_iter().map(Product::from).collect();
        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let category_ids: Vec<Uuid> = products.iter().map(|p| p.category_id).collect();
        let mut image_urls = queries::image_urls_for(&self.db, &ids).await?;
        let categories = queries::category_names(&self.db, &category_ids).await?;

        let summaries = products
            .into_iter()
            .map(|p| ProductSummary {
                image_url: image_urls.remove(&p.id).unwrap_or_default(),
                category_name: categories.get(&p.category_id).cloned().unwrap_or_default(),
                in_stock: p.available_stock() > 0,
                id: p.id,
                name: p.name,
                price: p.price,
            })
            .collect();

        Ok((summaries, total))
    }
    async fn list_categories(&self) -> AppResult<Vec<CategorySummary>> {
        let ids: Vec<Uuid> = ProductEntity::find()
            .select_only()
            .column(product::Column::CategoryId)
            .filter(product::Column::IsActive.eq(true))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let categories = category::Entity::find()
            .filter(category::Column::Id.is_in(ids))
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        Ok(categories
            .into_iter()
            .map(|c| CategorySummary {
                id: c.id,
                name: c.name,
                description: c.description,
            })
            .collect())
    }
}
