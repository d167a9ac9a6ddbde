//! Payment entity - One incoming payment against an order.
//!
//! Amounts are strictly positive; the system never stores refunds.
//! `payment_method` is free text, normalized only at report time.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Order this payment settles (possibly partially)
    pub order_id: i64,
    /// Date the payment was received
    pub payment_date: Date,
    /// Paid amount (strictly positive)
    pub amount: f64,
    /// Raw payment method as entered, normalized only at report time
    pub payment_method: Option<String>,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
