//! Shared test utilities for `orderdesk`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{client, employee, order, product},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DatabaseConnection};

/// Creates an in-memory `SQLite` database with all tables initialized and
/// foreign keys enforced. This is the standard setup for all integration
/// tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test client with only the name set.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::create_client(db, name.to_string(), None, None, None).await
}

/// Creates a test employee with the given role.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    name: &str,
    role: employee::Role,
) -> Result<entities::employee::Model> {
    employee::create_employee(db, name.to_string(), role).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `category`: None
/// * `unit`: None (stored as `"pcs"`)
/// * `price`: 10.0
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), None, None, 10.0).await
}

/// The order date used by test orders.
///
/// # Panics
/// Never; the date literal is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_order_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

/// Sets up a complete test environment with a client, an employee, and a
/// fresh order. Returns (db, order) for common order scenarios.
pub async fn setup_with_order() -> Result<(DatabaseConnection, entities::order::Model)> {
    let db = setup_test_db().await?;
    let test_client = create_test_client(&db, "Test Client").await?;
    let test_employee = create_test_employee(&db, "Test Employee", employee::Role::Manager).await?;
    let test_order = order::create_order(
        &db,
        test_client.id,
        test_employee.id,
        test_order_date(),
        order::OrderStatus::New,
    )
    .await?;
    Ok((db, test_order))
}

/// Sets up a complete test environment with an order and a product.
/// Returns (db, order, product) for line-item tests.
pub async fn setup_with_order_and_product() -> Result<(
    DatabaseConnection,
    entities::order::Model,
    entities::product::Model,
)> {
    let (db, test_order) = setup_with_order().await?;
    let test_product = create_test_product(&db, "Test Product").await?;
    Ok((db, test_order, test_product))
}
