//! Employee business logic - reference-data operations and roles.

use crate::{
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Enumerated employee role, stored in the database as its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Takes and manages orders
    Manager,
    /// Handles payments and reporting
    Accountant,
    /// Full access to reference data
    Administrator,
}

impl Role {
    /// The string form persisted in the `role` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Accountant => "accountant",
            Self::Administrator => "administrator",
        }
    }

    /// Parses a stored role string.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "manager" => Ok(Self::Manager),
            "accountant" => Ok(Self::Accountant),
            "administrator" => Ok(Self::Administrator),
            other => Err(Error::UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// Retrieves all employees, ordered alphabetically by name.
pub async fn list_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .order_by_asc(employee::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific employee by its unique ID.
pub async fn get_employee_by_id(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new employee with a validated name and role.
pub async fn create_employee(
    db: &DatabaseConnection,
    name: String,
    role: Role,
) -> Result<employee::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Employee name cannot be empty".to_string(),
        });
    }

    let employee = employee::ActiveModel {
        name: Set(name),
        role: Set(role.as_str().to_string()),
        ..Default::default()
    };

    employee.insert(db).await.map_err(Into::into)
}

/// Updates an existing employee's name and role.
pub async fn update_employee(
    db: &DatabaseConnection,
    employee_id: i64,
    name: String,
    role: Role,
) -> Result<employee::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Employee name cannot be empty".to_string(),
        });
    }

    let existing = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Employee",
            id: employee_id.to_string(),
        })?;

    let mut model: employee::ActiveModel = existing.into();
    model.name = Set(name);
    model.role = Set(role.as_str().to_string());

    model.update(db).await.map_err(Into::into)
}

/// Deletes an employee by ID; fails with a referential-integrity store error
/// while the employee still manages orders.
pub async fn delete_employee(db: &DatabaseConnection, employee_id: i64) -> Result<()> {
    Employee::delete_by_id(employee_id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::StoreErrorKind;
    use crate::test_utils::{setup_test_db, setup_with_order};

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Manager, Role::Accountant, Role::Administrator] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_unknown() {
        let result = Role::parse("janitor");
        assert!(matches!(result, Err(Error::UnknownRole { .. })));
    }

    #[tokio::test]
    async fn test_create_employee_requires_name() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_employee(&db, String::new(), Role::Manager).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_list_employees() -> Result<()> {
        let db = setup_test_db().await?;

        create_employee(&db, "Sidorov".to_string(), Role::Accountant).await?;
        create_employee(&db, "Averin".to_string(), Role::Manager).await?;

        let employees = list_employees(&db).await?;
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].name, "Averin");
        assert_eq!(employees[0].role, "manager");
        assert_eq!(employees[1].role, "accountant");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_employee_role() -> Result<()> {
        let db = setup_test_db().await?;

        let employee = create_employee(&db, "Averin".to_string(), Role::Manager).await?;
        let updated =
            update_employee(&db, employee.id, "Averin".to_string(), Role::Administrator).await?;

        assert_eq!(updated.role, "administrator");

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_referenced_employee_is_referential_error() -> Result<()> {
        let (db, order) = setup_with_order().await?;

        let result = delete_employee(&db, order.employee_id).await;
        match result {
            Err(Error::Store { kind, .. }) => {
                assert_eq!(kind, StoreErrorKind::ReferentialIntegrity);
            }
            other => panic!("expected referential-integrity store error, got {other:?}"),
        }

        Ok(())
    }
}
