//! Order line item entity - One `(order, product)` row with quantity and a
//! price captured at time of sale.
//!
//! The composite primary key guarantees at most one row per pair; upserts
//! replace quantity and price rather than accumulating. The line total
//! `quantity * price` is derived on read and never stored.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Owning order (first half of the composite key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: i64,
    /// Referenced product (second half of the composite key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i64,
    /// Number of units (positive)
    pub quantity: i32,
    /// Unit price captured at time of sale, independent of the catalog price
    pub price: f64,
}

impl Model {
    /// Derived line total: `quantity * price`. Never persisted.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// Defines relationships between OrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// Each line item references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
