//! Read helpers shared by the pooled stores and the transactional
//! repositories. Generic over `ConnectionTrait` so the same query runs on a
//! `DatabaseConnection` or inside a `DatabaseTransaction`.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::{cart, cart_item, category, product, product_image};
use crate::domain::{primary_image_url, Cart, CartHeader, CartItem, CartLine, Product, ProductImage};
use crate::errors::AppResult;

pub(crate) async fn product_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Product>> {
    let model = product::Entity::find_by_id(id).one(db).await?;
    Ok(model.map(Product::from))
}

pub(crate) async fn products_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Product>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let models = product::Entity::find()
        .filter(product::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;

    Ok(models.into_iter().map(|m| (m.id, Product::from(m))).collect())
}

/// Images per product, in display order.
pub(crate) async fn images_for<C: ConnectionTrait>(
    db: &C,
    product_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Vec<ProductImage>>> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let models = product_image::Entity::find()
        .filter(product_image::Column::ProductId.is_in(product_ids.iter().copied()))
        .order_by_asc(product_image::Column::DisplayOrder)
        .order_by_asc(product_image::Column::Id)
        .all(db)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
    for model in models {
        grouped.entry(model.product_id).or_default().push(model.into());
    }
    Ok(grouped)
}

/// Listing image per product (primary, first, or placeholder).
pub(crate) async fn image_urls_for<C: ConnectionTrait>(
    db: &C,
    product_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, String>> {
    let images = images_for(db, product_ids).await?;
    Ok(product_ids
        .iter()
        .map(|id| {
            let url = images
                .get(id)
                .map(|imgs| primary_image_url(imgs))
                .unwrap_or_else(|| primary_image_url(&[]));
            (*id, url)
        })
        .collect())
}

pub(crate) async fn category_names<C: ConnectionTrait>(
    db: &C,
    category_ids: &[Uuid],
) -> AppResult<HashMap<Uuid, String>> {
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let models = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids.iter().copied()))
        .all(db)
        .await?;

    Ok(models.into_iter().map(|m| (m.id, m.name)).collect())
}

pub(crate) async fn cart_header<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<Option<CartHeader>> {
    let model = cart::Entity::find()
        .filter(cart::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    Ok(model.map(CartHeader::from))
}

/// Load a user's cart with every line joined to its product, image and
/// category. Lines come back in the order they were added.
pub(crate) async fn load_cart<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Option<Cart>> {
    let Some(header) = cart_header(db, user_id).await? else {
        return Ok(None);
    };

    let items: Vec<CartItem> = cart_item::Entity::find()
        .filter(cart_item::Column::CartId.eq(header.id))
        .order_by_asc(cart_item::Column::AddedAt)
        .order_by_asc(cart_item::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(CartItem::from)
        .collect();

    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let mut products = products_by_ids(db, &product_ids).await?;
    let category_ids: Vec<Uuid> = products.values().map(|p| p.category_id).collect();
    let categories = category_names(db, &category_ids).await?;
    let mut image_urls = image_urls_for(db, &product_ids).await?;

    let lines = items
        .into_iter()
        .map(|item| {
            let product = products.remove(&item.product_id);
            let category_name = product
                .as_ref()
                .and_then(|p| categories.get(&p.category_id).cloned())
                .unwrap_or_default();
            let image_url = image_urls
                .remove(&item.product_id)
                .unwrap_or_else(|| primary_image_url(&[]));
            CartLine {
                item,
                product,
                image_url,
                category_name,
            }
        })
        .collect();

    Ok(Some(Cart { header, lines }))
}
