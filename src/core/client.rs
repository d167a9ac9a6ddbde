//! Client business logic - reference-data operations for clients.
//!
//! Provides list, lookup, create, update, and delete operations. Deleting a
//! client that still owns orders fails at the store with a
//! referential-integrity error; the store enforces this, not this module.

use crate::{
    entities::{Client, client},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all clients, ordered alphabetically by name.
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific client by its unique ID.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new client, performing input validation.
///
/// The name is required and trimmed; empty optional fields are stored as NULL.
pub async fn create_client(
    db: &DatabaseConnection,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
) -> Result<client::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Client name cannot be empty".to_string(),
        });
    }

    let client = client::ActiveModel {
        name: Set(name),
        phone: Set(normalize_optional(phone)),
        email: Set(normalize_optional(email)),
        address: Set(normalize_optional(address)),
        ..Default::default()
    };

    client.insert(db).await.map_err(Into::into)
}

/// Updates an existing client's fields.
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
) -> Result<client::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Client name cannot be empty".to_string(),
        });
    }

    let existing = get_client_by_id(db, client_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Client",
            id: client_id.to_string(),
        })?;

    let mut model: client::ActiveModel = existing.into();
    model.name = Set(name);
    model.phone = Set(normalize_optional(phone));
    model.email = Set(normalize_optional(email));
    model.address = Set(normalize_optional(address));

    model.update(db).await.map_err(Into::into)
}

/// Deletes a client by ID.
///
/// When the client is still referenced by orders, the store rejects the
/// delete and the error surfaces with a `ReferentialIntegrity` kind.
pub async fn delete_client(db: &DatabaseConnection, client_id: i64) -> Result<()> {
    Client::delete_by_id(client_id).exec(db).await?;
    Ok(())
}

/// Trims an optional text field, mapping empty strings to None.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::StoreErrorKind;
    use crate::test_utils::{setup_test_db, setup_with_order};

    #[tokio::test]
    async fn test_create_client_requires_name() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_client(&db, "   ".to_string(), None, None, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_client_trims_and_nulls_empty_fields() -> Result<()> {
        let db = setup_test_db().await?;

        let client = create_client(
            &db,
            "  Ivanov I. I.  ".to_string(),
            Some("  ".to_string()),
            Some("ivanov@example.com".to_string()),
            None,
        )
        .await?;

        assert_eq!(client.name, "Ivanov I. I.");
        assert_eq!(client.phone, None);
        assert_eq!(client.email, Some("ivanov@example.com".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_clients_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;

        create_client(&db, "Petrov".to_string(), None, None, None).await?;
        create_client(&db, "Ivanov".to_string(), None, None, None).await?;

        let clients = list_clients(&db).await?;
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "Ivanov");
        assert_eq!(clients[1].name, "Petrov");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_client() -> Result<()> {
        let db = setup_test_db().await?;

        let client = create_client(&db, "Old Name".to_string(), None, None, None).await?;
        let updated = update_client(
            &db,
            client.id,
            "New Name".to_string(),
            Some("+7 900 000-00-00".to_string()),
            None,
            None,
        )
        .await?;

        assert_eq!(updated.id, client.id);
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.phone, Some("+7 900 000-00-00".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_client_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_client(&db, 999, "Name".to_string(), None, None, None).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_client_without_orders() -> Result<()> {
        let db = setup_test_db().await?;

        let client = create_client(&db, "Disposable".to_string(), None, None, None).await?;
        delete_client(&db, client.id).await?;
        assert!(get_client_by_id(&db, client.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_referenced_client_is_referential_error() -> Result<()> {
        let (db, order) = setup_with_order().await?;

        let result = delete_client(&db, order.client_id).await;
        match result {
            Err(Error::Store { kind, .. }) => {
                assert_eq!(kind, StoreErrorKind::ReferentialIntegrity);
            }
            other => panic!("expected referential-integrity store error, got {other:?}"),
        }

        Ok(())
    }
}
