//! Product image entity.

use sea_orm::entity::prelude::*;

use crate::domain::ProductImage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
    pub is_primary: bool,
    pub alt_text: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductImage {
    fn from(model: Model) -> Self {
        ProductImage {
            id: model.id,
            url: model.image_url,
            is_primary: model.is_primary,
            alt_text: model.alt_text,
            display_order: model.display_order.unwrap_or(0),
        }
    }
}
