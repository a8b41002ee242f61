//! Shared fixtures: an in-memory SQLite database with the full schema.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use storefront::config::Config;
use storefront::domain::Password;
use storefront::infra::repositories::entities::{
    cart, cart_item, category, order, order_item, product, product_image, user,
};
use storefront::infra::Database;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> Config {
    let mut config = Config::for_database("sqlite::memory:", TEST_JWT_SECRET);
    // Every pooled connection to `sqlite::memory:` is its own database
    config.database_max_connections = 1;
    config.database_min_connections = 1;
    config
}

pub async fn setup_database() -> Arc<Database> {
    let db = Database::connect(&test_config())
        .await
        .expect("in-memory database with migrations");
    Arc::new(db)
}

pub async fn insert_user(db: &DatabaseConnection, email: &str) -> Uuid {
    let id = Uuid::new_v4();
    let hash = Password::new(TEST_PASSWORD).unwrap().into_string();
    user::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        password_hash: Set(hash),
        name: Set("Tran Thi B".to_string()),
        role: Set("user".to_string()),
        phone: Set(Some("0901234567".to_string())),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn insert_category(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    category::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        description: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

/// Insert an active product. `age_minutes` spaces out `created_at` for ordering tests.
pub async fn insert_product(
    db: &DatabaseConnection,
    category_id: Uuid,
    name: &str,
    price: i64,
    stock: i32,
    age_minutes: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    let created = Utc::now() - Duration::minutes(age_minutes);
    product::ActiveModel {
        id: Set(id),
        category_id: Set(category_id),
        name: Set(name.to_string()),
        description: Set(Some(format!("{} description", name))),
        price: Set(price),
        size: Set(Some("M".to_string())),
        color: Set(Some("White".to_string())),
        material: Set(None),
        stock_quantity: Set(Some(stock)),
        is_active: Set(Some(true)),
        created_at: Set(created),
        updated_at: Set(created),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn insert_image(db: &DatabaseConnection, product_id: Uuid, url: &str, is_primary: bool) {
    product_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        image_url: Set(url.to_string()),
        is_primary: Set(is_primary),
        alt_text: Set(None),
        display_order: Set(Some(if is_primary { 0 } else { 1 })),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn insert_cart(db: &DatabaseConnection, user_id: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    cart::ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

/// Lines are spaced one second apart so cart order is deterministic
pub async fn insert_cart_item(
    db: &DatabaseConnection,
    cart_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    position: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    cart_item::ActiveModel {
        id: Set(id),
        cart_id: Set(cart_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        added_at: Set(Utc::now() - Duration::hours(1) + Duration::seconds(position)),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn insert_order(
    db: &DatabaseConnection,
    user_id: Uuid,
    status: &str,
    total_amount: i64,
    age_minutes: i64,
) -> Uuid {
    let id = Uuid::new_v4();
    order::ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        order_date: Set(Utc::now() - Duration::minutes(age_minutes)),
        status: Set(status.to_string()),
        total_amount: Set(total_amount),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn insert_order_item(
    db: &DatabaseConnection,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: i64,
) {
    order_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn stock_of(db: &DatabaseConnection, product_id: Uuid) -> Option<i32> {
    product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .and_then(|p| p.stock_quantity)
}

pub async fn set_stock(db: &DatabaseConnection, product_id: Uuid, stock: i32) {
    let mut model: product::ActiveModel = product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .into();
    model.stock_quantity = Set(Some(stock));
    model.update(db).await.unwrap();
}

pub async fn set_description(db: &DatabaseConnection, product_id: Uuid, description: &str) {
    let mut model: product::ActiveModel = product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .into();
    model.description = Set(Some(description.to_string()));
    model.update(db).await.unwrap();
}

pub async fn set_price(db: &DatabaseConnection, product_id: Uuid, price: i64) {
    let mut model: product::ActiveModel = product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .into();
    model.price = Set(price);
    model.update(db).await.unwrap();
}

/// (item id, product id, quantity) of a cart, in insertion order
pub async fn cart_lines(db: &DatabaseConnection, cart_id: Uuid) -> Vec<(Uuid, Uuid, i32)> {
    let mut items = cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .all(db)
        .await
        .unwrap();
    items.sort_by_key(|i| i.added_at);
    items
        .into_iter()
        .map(|i| (i.id, i.product_id, i.quantity))
        .collect()
}

pub async fn order_count(db: &DatabaseConnection) -> u64 {
    order::Entity::find().count(db).await.unwrap()
}

pub async fn order_item_count(db: &DatabaseConnection) -> u64 {
    order_item::Entity::find().count(db).await.unwrap()
}

/// One customer whose cart holds A x2 (stock 5, 100 000) then B x1 (stock 1, 50 000)
pub struct Shop {
    pub database: Arc<Database>,
    pub user_id: Uuid,
    pub cart_id: Uuid,
    pub product_a: Uuid,
    pub product_b: Uuid,
}

impl Shop {
    pub async fn seed() -> Self {
        let database = setup_database().await;
        let db = database.connection();

        let user_id = insert_user(db, "buyer@example.com").await;
        let shirts = insert_category(db, "Shirts").await;
        let product_a = insert_product(db, shirts, "Linen shirt", 100_000, 5, 10).await;
        let product_b = insert_product(db, shirts, "Silk scarf", 50_000, 1, 5).await;
        insert_image(db, product_a, "https://img.example/a.jpg", true).await;

        let cart_id = insert_cart(db, user_id).await;
        insert_cart_item(db, cart_id, product_a, 2, 0).await;
        insert_cart_item(db, cart_id, product_b, 1, 1).await;

        Self {
            database,
            user_id,
            cart_id,
            product_a,
            product_b,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.database.connection()
    }
}

pub async fn set_active(db: &DatabaseConnection, product_id: Uuid, active: Option<bool>) {
    let mut model: product::ActiveModel = product::Entity::find_by_id(product_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .into();
    model.is_active = Set(active);
    model.update(db).await.unwrap();
}

pub async fn cart_count(db: &DatabaseConnection, user_id: Uuid) -> u64 {
    cart::Entity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .count(db)
        .await
        .unwrap()
}
