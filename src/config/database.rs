//! Database configuration module for the order ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions, using `Schema::create_table_from_entity` so the
//! schema always matches the Rust struct definitions without manual SQL. Foreign keys are
//! switched on at connection time so the store itself rejects deletes that would orphan
//! orders, line items, or payments.

use crate::entities::{Client, Employee, Order, OrderItem, Payment, Product};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/orderdesk.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment
/// variable, falling back to a default local file.
///
/// Foreign-key enforcement is enabled on the fresh connection; referential-integrity
/// violations then surface as store errors classified by the error layer.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let db = Database::connect(get_database_url()).await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    Ok(db)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity
/// definitions.
///
/// Reference tables come first so that the foreign keys on orders, line items, and
/// payments resolve. Uses `IF NOT EXISTS` semantics per entity via fresh statements,
/// so calling this on an existing database is harmless.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let client_table = schema.create_table_from_entity(Client);
    let employee_table = schema.create_table_from_entity(Employee);
    let product_table = schema.create_table_from_entity(Product);
    let order_table = schema.create_table_from_entity(Order);
    let order_item_table = schema.create_table_from_entity(OrderItem);
    let payment_table = schema.create_table_from_entity(Payment);

    db.execute(builder.build(&client_table)).await?;
    db.execute(builder.build(&employee_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&order_table)).await?;
    db.execute(builder.build(&order_item_table)).await?;
    db.execute(builder.build(&payment_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClientModel, OrderModel, PaymentModel, ProductModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<OrderModel> = Order::find().limit(1).all(&db).await?;
        let _: Vec<PaymentModel> = Payment::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        create_tables(&db).await?;

        // An order referencing nonexistent client/employee must be rejected
        let result = db
            .execute_unprepared(
                "INSERT INTO orders (order_date, status, total_amount, client_id, employee_id) \
                 VALUES ('2026-01-01', 'new', 0, 999, 999);",
            )
            .await;
        assert!(result.is_err());

        Ok(())
    }
}
