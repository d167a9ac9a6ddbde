//! Order entity - One service order owned by a client and a managing employee.
//!
//! `total_amount` is derived: it must equal the rounded sum of line totals
//! over the order's items and is rewritten by reconciliation after every item
//! mutation. `status` stores the string form of
//! [`crate::core::order::OrderStatus`].
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Date the order was placed
    pub order_date: Date,
    /// Enumerated status, stored as its string form
    pub status: String,
    /// Derived sum of line totals, rounded to 2 decimals
    pub total_amount: f64,
    /// Owning client
    pub client_id: i64,
    /// Managing employee
    pub employee_id: i64,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// Each order is managed by one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    /// An order owns its line items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
    /// An order owns its payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
