use sea_orm::entity::prelude::*;

use crate::types::{GeneratedContent, OrderStatus, Template, WeddingDetails};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub etsy_order_id: String,
    pub access_code: String,
    pub status: OrderStatus,
    pub template: Option<Template>,
    #[sea_orm(column_type = "Json", nullable)]
    pub wedding_details: Option<WeddingDetails>,
    #[sea_orm(column_type = "Json", nullable)]
    pub generated_content: Option<GeneratedContent>,
    pub domain: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
