use std::sync::Arc;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::employee::{CreateEmployee, Employee, UpdateEmployee};
use crate::store::Store;

/// Employee business logic over whichever backend was configured.
/// Holds no state of its own; every call round-trips to the store.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn Store>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates an employee after checking both uniqueness constraints.
    pub async fn create(&self, payload: &CreateEmployee) -> Result<Employee> {
        if self.store.find_employee(&payload.id).await?.is_some() {
            return Err(Error::duplicate("Employee", "ID"));
        }
        if self
            .store
            .find_employee_by_email(&payload.email)
            .await?
            .is_some()
        {
            return Err(Error::duplicate("Employee", "email"));
        }

        let employee = self
            .store
            .insert_employee(&payload.id, &payload.name, &payload.email, &payload.department)
            .await?;
        info!(employee_id = %employee.id, "Employee created");
        Ok(employee)
    }

    /// All employees, newest first.
    pub async fn list(&self) -> Result<Vec<Employee>> {
        self.store.list_employees().await
    }

    pub async fn get(&self, id: &str) -> Result<Employee> {
        self.store
            .find_employee(id)
            .await?
            .ok_or_else(|| Error::not_found("Employee", id))
    }

    /// Partial update: only the supplied fields change. An email change
    /// re-checks uniqueness against other employees.
    pub async fn update(&self, id: &str, changes: &UpdateEmployee) -> Result<Employee> {
        if self.store.find_employee(id).await?.is_none() {
            return Err(Error::not_found("Employee", id));
        }

        if let Some(email) = &changes.email {
            if let Some(other) = self.store.find_employee_by_email(email).await? {
                if other.id != id {
                    return Err(Error::duplicate("Employee", "email"));
                }
            }
        }

        let employee = self
            .store
            .update_employee(id, changes)
            .await?
            .ok_or_else(|| Error::not_found("Employee", id))?;
        info!(employee_id = %id, "Employee updated");
        Ok(employee)
    }

    /// Deletes the employee; the store also drops their attendance
    /// records (FK cascade on SQLite, explicit delete on MongoDB).
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_employee(id).await? {
            return Err(Error::not_found("Employee", id));
        }
        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    /// Existence probe used by the attendance service. Never raises on
    /// absence.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.store.find_employee(id).await?.is_some())
    }
}
