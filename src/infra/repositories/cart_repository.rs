//! Cart repository: the per-user cart and its lines.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::{cart, cart_item};
use super::queries;
use crate::domain::{Cart, CartHeader, CartItem};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The user's cart with lines and products, if one was ever created
    async fn find_cart(&self, user_id: Uuid) -> AppResult<Option<Cart>>;

    /// The user's cart header, created on first use
    async fn find_or_create(&self, user_id: Uuid) -> AppResult<CartHeader>;

    /// The line holding `product_id` in this cart
    async fn find_line(&self, cart_id: Uuid, product_id: Uuid) -> AppResult<Option<CartItem>>;

    async fn add_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem>;

    async fn set_quantity(&self, item_id: Uuid, quantity: i32) -> AppResult<()>;

    async fn remove_item(&self, item_id: Uuid) -> AppResult<()>;

    /// Delete every line of the cart. The cart row stays.
    async fn clear(&self, cart_id: Uuid) -> AppResult<()>;

    /// Bump the cart's `updated_at`
    async fn touch(&self, cart_id: Uuid) -> AppResult<()>;
}

pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn find_cart(&self, user_id: Uuid) -> AppResult<Option<Cart>> {
        queries::load_cart(&self.db, user_id).await
    }

    async fn find_or_create(&self, user_id: Uuid) -> AppResult<CartHeader> {
        if let Some(header) = queries::cart_header(&self.db, user_id).await? {
            return Ok(header);
        }

        // Two first adds may race; the unique user_id keeps a single cart.
        let now = chrono::Utc::now();
        let active_model = cart::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        cart::Entity::insert(active_model)
            .on_conflict(OnConflict::column(cart::Column::UserId).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await?;

        queries::cart_header(&self.db, user_id)
            .await?
            .ok_or_else(|| AppError::internal("Cart missing right after creation"))
    }

    async fn find_line(&self, cart_id: Uuid, product_id: Uuid) -> AppResult<Option<CartItem>> {
        let model = cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await?;
        Ok(model.map(CartItem::from))
    }

    async fn add_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem> {
        let active_model = cart_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            added_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(CartItem::from(model))
    }

    async fn set_quantity(&self, item_id: Uuid, quantity: i32) -> AppResult<()> {
        let result = cart_item::Entity::update_many()
            .col_expr(cart_item::Column::Quantity, Expr::value(quantity))
            .filter(cart_item::Column::Id.eq(item_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn remove_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = cart_item::Entity::delete_by_id(item_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self, cart_id: Uuid) -> AppResult<()> {
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn touch(&self, cart_id: Uuid) -> AppResult<()> {
        cart::Entity::update_many()
            .col_expr(cart::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(cart::Column::Id.eq(cart_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
