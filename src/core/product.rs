//! Product business logic - reference-data operations for products and services.
//!
//! Catalog prices are validated (non-negative, finite) and rounded to two
//! decimals at persist time. The unit of measure defaults to `"pcs"`.

use crate::{
    core::order::round2,
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Default unit of measure when none is given.
pub const DEFAULT_UNIT: &str = "pcs";

/// Retrieves all products, ordered alphabetically by name.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product, performing input validation.
///
/// The name is required; the price must be finite and non-negative and is
/// rounded to two decimals before it is stored.
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    category: Option<String>,
    unit: Option<String>,
    price: f64,
) -> Result<product::Model> {
    let (name, category, unit, price) = validate_product_fields(name, category, unit, price)?;

    let product = product::ActiveModel {
        name: Set(name),
        category: Set(category),
        unit: Set(unit),
        price: Set(price),
        ..Default::default()
    };

    product.insert(db).await.map_err(Into::into)
}

/// Updates an existing product's fields, with the same validation as create.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    name: String,
    category: Option<String>,
    unit: Option<String>,
    price: f64,
) -> Result<product::Model> {
    let (name, category, unit, price) = validate_product_fields(name, category, unit, price)?;

    let existing = get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Product",
            id: product_id.to_string(),
        })?;

    let mut model: product::ActiveModel = existing.into();
    model.name = Set(name);
    model.category = Set(category);
    model.unit = Set(unit);
    model.price = Set(price);

    model.update(db).await.map_err(Into::into)
}

/// Deletes a product by ID; fails with a referential-integrity store error
/// while the product appears in any order's line items.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    Product::delete_by_id(product_id).exec(db).await?;
    Ok(())
}

/// Shared validation for create/update: trims text, defaults the unit,
/// rejects empty names and bad prices.
fn validate_product_fields(
    name: String,
    category: Option<String>,
    unit: Option<String>,
    price: f64,
) -> Result<(String, Option<String>, Option<String>, f64)> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }

    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidPrice { price });
    }

    let category = category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let unit = unit
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .or_else(|| Some(DEFAULT_UNIT.to_string()));

    Ok((name, category, unit, round2(price)))
}
