use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Employee record as persisted and returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "E001",
        "name": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "created_at": "2026-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = "E001")]
    pub id: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "E001")]
    pub id: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
    pub department: Option<String>,
}

impl CreateEmployee {
    /// Boundary validation. Normalizes the employee id to uppercase.
    pub fn validate(&mut self) -> Result<()> {
        validate_employee_id(&self.id)?;
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_department(&self.department)?;
        self.id = self.id.to_uppercase();
        Ok(())
    }
}

impl UpdateEmployee {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(department) = &self.department {
            validate_department(department)?;
        }
        Ok(())
    }

    /// True when no fields were supplied; the update becomes a no-op read.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.department.is_none()
    }
}

pub fn validate_employee_id(id: &str) -> Result<()> {
    if id.len() < 4 || id.len() > 20 {
        return Err(Error::validation("Employee ID must be 4-20 characters"));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::validation("Employee ID must be alphanumeric"));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len < 2 || len > 100 {
        return Err(Error::validation("Name must be 2-100 characters"));
    }
    Ok(())
}

fn validate_department(department: &str) -> Result<()> {
    let len = department.chars().count();
    if len == 0 || len > 50 {
        return Err(Error::validation("Department must be 1-50 characters"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(Error::validation("Invalid email address"));
    }
    Ok(())
}

/// Per-employee present/absent totals.
#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeAttendanceSummary {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = 3)]
    pub total_present: u64,
    #[schema(example = 2)]
    pub total_absent: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(id: &str, email: &str) -> CreateEmployee {
        CreateEmployee {
            id: id.to_string(),
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            department: "HR".to_string(),
        }
    }

    #[test]
    fn id_is_normalized_to_uppercase() {
        let mut req = create_req("e001", "jane@x.com");
        req.validate().unwrap();
        assert_eq!(req.id, "E001");
    }

    #[test]
    fn rejects_short_and_non_alphanumeric_ids() {
        assert!(create_req("E1", "jane@x.com").validate().is_err());
        assert!(create_req("E-001", "jane@x.com").validate().is_err());
        assert!(
            create_req("E00000000000000000001", "jane@x.com")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(create_req("E001", "not-an-email").validate().is_err());
        assert!(create_req("E001", "@x.com").validate().is_err());
        assert!(create_req("E001", "jane@com").validate().is_err());
        assert!(create_req("E001", "jane doe@x.com").validate().is_err());
        assert!(create_req("E001", "jane@x.com").validate().is_ok());
    }

    #[test]
    fn empty_update_is_detected() {
        let update = UpdateEmployee::default();
        assert!(update.is_empty());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn update_validates_supplied_fields_only() {
        let update = UpdateEmployee {
            name: None,
            email: Some("bad".to_string()),
            department: None,
        };
        assert!(update.validate().is_err());
    }
}
