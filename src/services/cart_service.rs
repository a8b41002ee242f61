//! Cart service - the shopping cart outside of checkout.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MIN_CART_QUANTITY;
use crate::domain::{Cart, CartLine, CartStats, CartView};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CartService: Send + Sync {
    /// Rendered cart; empty when the user never had one
    async fn get_cart(&self, user_id: Uuid) -> AppResult<CartView>;

    /// Add a product, merging with an existing line for the same product
    async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartStats>;

    /// Set a line's quantity; zero or less removes the line
    async fn update_quantity(&self, user_id: Uuid, item_id: Uuid, quantity: i32) -> AppResult<CartStats>;

    async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<CartStats>;

    /// Remove every line. No-op when there is nothing to clear.
    async fn clear_cart(&self, user_id: Uuid) -> AppResult<()>;

    async fn cart_stats(&self, user_id: Uuid) -> AppResult<CartStats>;
}

pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn owned_line(&self, user_id: Uuid, item_id: Uuid) -> AppResult<(Cart, CartLine)> {
        let cart = self.uow.carts().find_cart(user_id).await?.ok_or_not_found()?;
        let line = cart
            .lines
            .iter()
            .find(|l| l.item.id == item_id)
            .cloned()
            .ok_or_not_found()?;
        Ok((cart, line))
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn get_cart(&self, user_id: Uuid) -> AppResult<CartView> {
        Ok(self
            .uow
            .carts()
            .find_cart(user_id)
            .await?
            .map(CartView::from)
            .unwrap_or_else(CartView::empty))
    }

    async fn add_to_cart(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartStats> {
        if quantity < MIN_CART_QUANTITY {
            return Err(AppError::validation(format!(
                "Quantity must be at least {}",
                MIN_CART_QUANTITY
            )));
        }

        let product = self
            .uow
            .products()
            .find_by_id(product_id)
            .await?
            .filter(|p| p.is_active())
            .ok_or_not_found()?;

        if !product.can_supply(quantity) {
            return Err(AppError::out_of_stock(product.name));
        }

        let carts = self.uow.carts();
        let cart = carts.find_or_create(user_id).await?;

        match carts.find_line(cart.id, product_id).await? {
            Some(existing) => {
                let merged = existing
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| AppError::out_of_stock(product.name.clone()))?;
                if !product.can_supply(merged) {
                    return Err(AppError::out_of_stock(product.name));
                }
                carts.set_quantity(existing.id, merged).await?;
            }
            None => {
                carts.add_item(cart.id, product_id, quantity).await?;
            }
        }
        carts.touch(cart.id).await?;

        tracing::debug!(%user_id, %product_id, quantity, "Added to cart");
        self.cart_stats(user_id).await
    }

    async fn update_quantity(&self, user_id: Uuid, item_id: Uuid, quantity: i32) -> AppResult<CartStats> {
        let (cart, line) = self.owned_line(user_id, item_id).await?;
        let carts = self.uow.carts();

        if quantity < MIN_CART_QUANTITY {
            carts.remove_item(item_id).await?;
        } else {
            let fits = line
                .product
                .as_ref()
                .map(|p| p.available_stock() >= quantity)
                .unwrap_or(false);
            if !fits {
                return Err(AppError::out_of_stock(line.product_name()));
            }
            carts.set_quantity(item_id, quantity).await?;
        }
        carts.touch(cart.header.id).await?;

        self.cart_stats(user_id).await
    }

    async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<CartStats> {
        let (cart, _) = self.owned_line(user_id, item_id).await?;
        let carts = self.uow.carts();

        carts.remove_item(item_id).await?;
        carts.touch(cart.header.id).await?;

        self.cart_stats(user_id).await
    }

    async fn clear_cart(&self, user_id: Uuid) -> AppResult<()> {
        let carts = self.uow.carts();
        match carts.find_cart(user_id).await? {
            Some(cart) if !cart.is_empty() => {
                carts.clear(cart.header.id).await?;
                carts.touch(cart.header.id).await
            }
            _ => Ok(()),
        }
    }

    async fn cart_stats(&self, user_id: Uuid) -> AppResult<CartStats> {
        Ok(self
            .uow
            .carts()
            .find_cart(user_id)
            .await?
            .map(|cart| cart.stats())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::{CartHeader, CartItem, Product};
    use crate::infra::{MockCartRepository, MockProductRepository};
    use crate::services::test_support::{MockedUnitOfWork, TestUnitOfWork};

    fn manager(
        products: MockProductRepository,
        carts: MockCartRepository,
    ) -> CartManager<TestUnitOfWork> {
        CartManager::new(
            MockedUnitOfWork {
                products,
                carts,
                ..Default::default()
            }
            .build(),
        )
    }

    fn product(id: Uuid, stock: i32, active: bool) -> Product {
        Product {
            id,
            category_id: Uuid::new_v4(),
            name: "Linen shirt".to_string(),
            description: None,
            price: 100_000,
            size: Some("M".to_string()),
            color: None,
            material: None,
            stock_quantity: Some(stock),
            is_active: Some(active),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn header(cart_id: Uuid, user_id: Uuid) -> CartHeader {
        CartHeader {
            id: cart_id,
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(id: Uuid, cart_id: Uuid, product_id: Uuid, quantity: i32) -> CartItem {
        CartItem {
            id,
            cart_id,
            product_id,
            quantity,
            added_at: Utc::now(),
        }
    }

    fn cart_with(cart_id: Uuid, user_id: Uuid, lines: Vec<(CartItem, Product)>) -> Cart {
        Cart {
            header: header(cart_id, user_id),
            lines: lines
                .into_iter()
                .map(|(item, product)| CartLine {
                    item,
                    product: Some(product),
                    image_url: "https://img.example/1.jpg".to_string(),
                    category_name: "Shirts".to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_zero_quantity() {
        let service = manager(MockProductRepository::new(), MockCartRepository::new());

        let result = service.add_to_cart(Uuid::new_v4(), Uuid::new_v4(), 0).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_to_cart_inactive_product_is_not_found() {
        let product_id = Uuid::new_v4();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .with(eq(product_id))
            .returning(|id| Ok(Some(product(id, 10, false))));

        let service = manager(products, MockCartRepository::new());

        let result = service.add_to_cart(Uuid::new_v4(), product_id, 1).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_add_to_cart_more_than_stock() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(product(id, 2, true))));

        let service = manager(products, MockCartRepository::new());

        let result = service.add_to_cart(Uuid::new_v4(), Uuid::new_v4(), 3).await;

        match result {
            Err(AppError::OutOfStock { product_name }) => assert_eq!(product_name, "Linen shirt"),
            other => panic!("expected OutOfStock, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_to_cart_merges_existing_line() {
        let user_id = Uuid::new_v4();
        let cart_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(product(id, 5, true))));

        let mut carts = MockCartRepository::new();
        carts
            .expect_find_or_create()
            .with(eq(user_id))
            .returning(move |uid| Ok(header(cart_id, uid)));
        carts
            .expect_find_line()
            .with(eq(cart_id), eq(product_id))
            .returning(move |cid, pid| Ok(Some(item(item_id, cid, pid, 2))));
        carts
            .expect_set_quantity()
            .with(eq(item_id), eq(4))
            .times(1)
            .returning(|_, _| Ok(()));
        carts.expect_add_item().never();
        carts.expect_touch().with(eq(cart_id)).returning(|_| Ok(()));
        carts.expect_find_cart().returning(move |uid| {
            Ok(Some(cart_with(
                cart_id,
                uid,
                vec![(item(item_id, cart_id, product_id, 4), product(product_id, 5, true))],
            )))
        });

        let service = manager(products, carts);
        let stats = service.add_to_cart(user_id, product_id, 2).await.unwrap();

        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.total_amount, 400_000);
    }

    #[tokio::test]
    async fn test_add_to_cart_merge_beyond_stock_is_rejected() {
        let cart_id = Uuid::new_v4();

        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(product(id, 5, true))));

        let mut carts = MockCartRepository::new();
        carts
            .expect_find_or_create()
            .returning(move |uid| Ok(header(cart_id, uid)));
        carts
            .expect_find_line()
            .returning(move |cid, pid| Ok(Some(item(Uuid::new_v4(), cid, pid, 4))));
        carts.expect_set_quantity().never();

        let service = manager(products, carts);
        let result = service.add_to_cart(Uuid::new_v4(), Uuid::new_v4(), 2).await;

        assert!(matches!(result, Err(AppError::OutOfStock { .. })));
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes_line() {
        let user_id = Uuid::new_v4();
        let cart_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut carts = MockCartRepository::new();
        let mut fetches = 0;
        carts.expect_find_cart().returning(move |uid| {
            fetches += 1;
            let lines = if fetches == 1 {
                vec![(item(item_id, cart_id, product_id, 3), product(product_id, 5, true))]
            } else {
                vec![]
            };
            Ok(Some(cart_with(cart_id, uid, lines)))
        });
        carts
            .expect_remove_item()
            .with(eq(item_id))
            .times(1)
            .returning(|_| Ok(()));
        carts.expect_set_quantity().never();
        carts.expect_touch().returning(|_| Ok(()));

        let service = manager(MockProductRepository::new(), carts);
        let stats = service.update_quantity(user_id, item_id, 0).await.unwrap();

        assert_eq!(stats, CartStats::default());
    }

    #[tokio::test]
    async fn test_update_quantity_of_foreign_item_is_not_found() {
        let cart_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut carts = MockCartRepository::new();
        carts.expect_find_cart().returning(move |uid| {
            Ok(Some(cart_with(
                cart_id,
                uid,
                vec![(item(Uuid::new_v4(), cart_id, product_id, 1), product(product_id, 5, true))],
            )))
        });
        carts.expect_set_quantity().never();
        carts.expect_remove_item().never();

        let service = manager(MockProductRepository::new(), carts);
        let result = service.update_quantity(Uuid::new_v4(), Uuid::new_v4(), 2).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_get_cart_without_cart_is_empty() {
        let mut carts = MockCartRepository::new();
        carts.expect_find_cart().returning(|_| Ok(None));

        let service = manager(MockProductRepository::new(), carts);
        let view = service.get_cart(Uuid::new_v4()).await.unwrap();

        assert!(view.is_empty);
        assert_eq!(view.total_items, 0);
        assert!(view.items.is_empty());
    }
}
