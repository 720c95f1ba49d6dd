use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::attendance::{Attendance, AttendanceStatus, DashboardSummary, NewAttendance};
use crate::model::employee::EmployeeAttendanceSummary;
use crate::service::employee::EmployeeService;
use crate::store::Store;

/// Attendance business logic. Employee existence is resolved through
/// the employee service, never by poking the store directly.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn Store>,
    employees: EmployeeService,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn Store>, employees: EmployeeService) -> Self {
        Self { store, employees }
    }

    /// Creates a record once the employee exists and no entry for the
    /// same (employee, date) pair is present. The check and the insert
    /// are not atomic on the document backend; concurrent creates for
    /// the same pair can race there.
    pub async fn create(&self, record: &NewAttendance) -> Result<Attendance> {
        if !self.employees.exists(&record.employee_id).await? {
            return Err(Error::not_found("Employee", &record.employee_id));
        }

        if self
            .store
            .find_attendance_for_date(&record.employee_id, record.date)
            .await?
            .is_some()
        {
            return Err(Error::duplicate("Attendance record", "date"));
        }

        let attendance = self.store.insert_attendance(record).await?;
        info!(attendance_id = %attendance.id, employee_id = %attendance.employee_id, "Attendance created");
        Ok(attendance)
    }

    /// All records, optionally narrowed to an exact date, date descending.
    pub async fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Attendance>> {
        self.store.list_attendance(date).await
    }

    pub async fn list_for_employee(&self, employee_id: &str) -> Result<Vec<Attendance>> {
        if !self.employees.exists(employee_id).await? {
            return Err(Error::not_found("Employee", employee_id));
        }
        self.store.list_attendance_for_employee(employee_id).await
    }

    /// Present/absent totals for one employee; the name comes from the
    /// employee service.
    pub async fn summary(&self, employee_id: &str) -> Result<EmployeeAttendanceSummary> {
        let employee = self.employees.get(employee_id).await?;

        let total_present = self
            .store
            .count_attendance(Some(employee_id), AttendanceStatus::Present)
            .await?;
        let total_absent = self
            .store
            .count_attendance(Some(employee_id), AttendanceStatus::Absent)
            .await?;

        Ok(EmployeeAttendanceSummary {
            employee_id: employee.id,
            name: employee.name,
            total_present,
            total_absent,
        })
    }

    pub async fn update_status(&self, id: &str, status: AttendanceStatus) -> Result<Attendance> {
        let attendance = self
            .store
            .update_attendance_status(id, status)
            .await?
            .ok_or_else(|| Error::not_found("Attendance record", id))?;
        info!(attendance_id = %id, status = %status, "Attendance updated");
        Ok(attendance)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_attendance(id).await? {
            return Err(Error::not_found("Attendance record", id));
        }
        info!(attendance_id = %id, "Attendance deleted");
        Ok(())
    }

    /// System-wide totals for the dashboard.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let total_employees = self.store.count_employees().await?;
        let total_present = self
            .store
            .count_attendance(None, AttendanceStatus::Present)
            .await?;
        let total_absent = self
            .store
            .count_attendance(None, AttendanceStatus::Absent)
            .await?;

        Ok(DashboardSummary {
            total_employees,
            total_present,
            total_absent,
        })
    }
}
