//! Catalog entities: products, their images and categories.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::PLACEHOLDER_IMAGE_URL;

/// Product domain entity
///
/// Prices are whole currency units. `stock_quantity` and `is_active` are
/// nullable in the catalog schema; a missing stock counts as zero and a
/// missing flag as inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn available_stock(&self) -> i32 {
        self.stock_quantity.unwrap_or(0)
    }

    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }

    /// Whether this product can currently be sold in the given quantity.
    pub fn can_supply(&self, quantity: i32) -> bool {
        self.is_active() && self.available_stock() >= quantity
    }
}

/// Product image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductImage {
    pub id: Uuid,
    pub url: String,
    pub is_primary: bool,
    pub alt_text: Option<String>,
    pub display_order: i32,
}

/// Pick the image shown on listings: the primary one, else the first,
/// else the placeholder.
pub fn primary_image_url(images: &[ProductImage]) -> String {
    images
        .iter()
        .find(|img| img.is_primary)
        .or_else(|| images.first())
        .map(|img| img.url.clone())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string())
}

/// Catalog listing row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub image_url: String,
    pub category_name: String,
    pub in_stock: bool,
}

/// Catalog listing narrowing: one category and/or a text search over name
/// and description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

impl ProductFilter {
    /// Search term with surrounding whitespace removed; blank means none
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Category shown in the catalog navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Product page projection
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub stock_quantity: i32,
    pub category_id: Uuid,
    pub category_name: String,
    pub images: Vec<ProductImage>,
}

impl ProductDetail {
    pub fn new(product: Product, category_name: String, images: Vec<ProductImage>) -> Self {
        Self {
            id: product.id,
            stock_quantity: product.available_stock(),
            name: product.name,
            description: product.description,
            price: product.price,
            size: product.size,
            color: product.color,
            material: product.material,
            category_id: product.category_id,
            category_name,
            images,
        }
    }
}
