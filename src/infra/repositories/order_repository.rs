//! Order history repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr,
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use super::entities::{order, order_item, user};
use super::queries;
use crate::domain::{OrderDetail, OrderItemView, OrderStatus, OrderSummary, StatusCounts};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// The user's orders, newest first, optionally restricted to one status
    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<OrderSummary>>;

    /// One order, only if it belongs to `user_id`
    async fn find_detail(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Option<OrderDetail>>;

    async fn status_counts(&self, user_id: Uuid) -> AppResult<StatusCounts>;

    async fn count_for_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Sum of order totals excluding cancelled orders
    async fn total_spent(&self, user_id: Uuid) -> AppResult<i64>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Item views grouped by order ID.
    async fn item_views(&self, order_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<OrderItemView>>> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await?;

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products = queries::products_by_ids(&self.db, &product_ids).await?;
        let category_ids: Vec<Uuid> = products.values().map(|p| p.category_id).collect();
        let categories = queries::category_names(&self.db, &category_ids).await?;
        let image_urls = queries::image_urls_for(&self.db, &product_ids).await?;

        let mut grouped: HashMap<Uuid, Vec<OrderItemView>> = HashMap::new();
        for item in items {
            let product = products.get(&item.product_id);
            grouped.entry(item.order_id).or_default().push(OrderItemView {
                product_id: item.product_id,
                product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                image_url: image_urls.get(&item.product_id).cloned().unwrap_or_default(),
                price: item.unit_price,
                quantity: item.quantity,
                category_name: product
                    .and_then(|p| categories.get(&p.category_id).cloned())
                    .unwrap_or_default(),
            });
        }
        Ok(grouped)
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<OrderStatus>,
    ) -> AppResult<Vec<OrderSummary>> {
        let mut query = order::Entity::find().filter(order::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }

        let orders = query
            .order_by_desc(order::Column::OrderDate)
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut items = self.item_views(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|o| {
                let items = items.remove(&o.id).unwrap_or_default();
                OrderSummary {
                    id: o.id,
                    order_date: o.order_date,
                    status: o.status,
                    total_amount: o.total_amount,
                    item_count: items.len(),
                    items,
                }
            })
            .collect())
    }

    async fn find_detail(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Option<OrderDetail>> {
        let found = order::Entity::find_by_id(order_id)
            .filter(order::Column::UserId.eq(user_id))
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?;

        let Some((o, customer)) = found else {
            return Ok(None);
        };
        let customer = customer.ok_or_else(|| AppError::internal("Order without customer"))?;
        let items = self.item_views(&[o.id]).await?.remove(&o.id).unwrap_or_default();

        Ok(Some(OrderDetail {
            id: o.id,
            order_date: o.order_date,
            status: o.status,
            total_amount: o.total_amount,
            customer_name: customer.name,
            customer_email: customer.email,
            customer_phone: customer.phone.unwrap_or_default(),
            items,
        }))
    }

    async fn status_counts(&self, user_id: Uuid) -> AppResult<StatusCounts> {
        let rows: Vec<(String, i64)> = order::Entity::find()
            .select_only()
            .column(order::Column::Status)
            .column_as(Expr::col(order::Column::Id).count(), "count")
            .filter(order::Column::UserId.eq(user_id))
            .group_by(order::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(StatusCounts::from_grouped(
            rows.into_iter().map(|(raw, n)| (raw, n.max(0) as u64)),
        ))
    }

    async fn count_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let count = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn total_spent(&self, user_id: Uuid) -> AppResult<i64> {
        // Summed here: SUM(bigint) comes back as NUMERIC on Postgres.
        let totals: Vec<i64> = order::Entity::find()
            .select_only()
            .column(order::Column::TotalAmount)
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::Status.ne(OrderStatus::Cancelled.as_str()))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(totals.into_iter().sum())
    }
}
