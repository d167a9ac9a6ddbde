//! Product entity - A product or service sold by the service center.
//!
//! `price` is the current catalog price; line items capture their own price
//! at the time of sale and do not follow later catalog changes.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (required)
    pub name: String,
    /// Optional grouping category
    pub category: Option<String>,
    /// Unit of measure, defaults to `"pcs"` when omitted
    pub unit: Option<String>,
    /// Current catalog price (non-negative)
    pub price: f64,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A product can appear in many order line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
