//! Client entity - A customer of the service center.
//!
//! Only the name is required; phone, email, and address are optional contact
//! details. Clients are referenced by orders, so deleting a client with
//! orders fails with a referential-integrity error from the store.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (required)
    pub name: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A client can own many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
