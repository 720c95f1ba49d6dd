//! Storage interface shared by the relational and document backends.
//!
//! Services depend only on these traits; backend identity never leaks
//! into business logic. Connections are acquired per operation by the
//! underlying drivers and released on every path.

pub mod mongo;
pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::model::employee::{Employee, UpdateEmployee};

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Inserts a new employee; `created_at` is assigned by the store.
    async fn insert_employee(&self, id: &str, name: &str, email: &str, department: &str)
    -> Result<Employee>;

    async fn find_employee(&self, id: &str) -> Result<Option<Employee>>;

    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>>;

    /// All employees, newest first.
    async fn list_employees(&self) -> Result<Vec<Employee>>;

    /// Applies only the supplied fields; returns the updated row, or
    /// `None` when the id does not exist.
    async fn update_employee(&self, id: &str, changes: &UpdateEmployee)
    -> Result<Option<Employee>>;

    /// Returns whether a row was deleted. Deleting an employee also
    /// removes that employee's attendance records.
    async fn delete_employee(&self, id: &str) -> Result<bool>;

    async fn count_employees(&self) -> Result<u64>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Inserts a record and returns it with the backend-assigned id.
    async fn insert_attendance(&self, record: &NewAttendance) -> Result<Attendance>;

    async fn find_attendance(&self, id: &str) -> Result<Option<Attendance>>;

    /// Duplicate probe for the one-record-per-employee-per-date rule.
    async fn find_attendance_for_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Attendance>>;

    /// All records, optionally filtered to an exact date, date descending.
    async fn list_attendance(&self, date: Option<NaiveDate>) -> Result<Vec<Attendance>>;

    /// One employee's records, date descending.
    async fn list_attendance_for_employee(&self, employee_id: &str) -> Result<Vec<Attendance>>;

    /// Sets the status; returns the updated record, or `None` when absent.
    async fn update_attendance_status(
        &self,
        id: &str,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>>;

    async fn delete_attendance(&self, id: &str) -> Result<bool>;

    /// Count of records with the given status, optionally scoped to one
    /// employee.
    async fn count_attendance(
        &self,
        employee_id: Option<&str>,
        status: AttendanceStatus,
    ) -> Result<u64>;
}

/// Full capability set a backend must provide.
pub trait Store: EmployeeStore + AttendanceStore {}

impl<T: EmployeeStore + AttendanceStore> Store for T {}
