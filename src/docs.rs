use crate::model::attendance::{
    Attendance, AttendanceStatus, CreateAttendance, DashboardSummary, UpdateAttendance,
};
use crate::model::employee::{
    CreateEmployee, Employee, EmployeeAttendanceSummary, UpdateEmployee,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

A lightweight Human Resource Management System backend.

### Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Attendance Management**
  - Daily Present/Absent records, per-employee history and summaries
- **Dashboard**
  - System-wide employee and attendance totals

### Storage
Runs against either **SQLite** or **MongoDB**; the backend is selected
once at startup via `DB_TYPE` and identical service semantics apply to
both.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::create_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::employee_summary,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::dashboard_summary,
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            UpdateEmployee,
            EmployeeAttendanceSummary,
            Attendance,
            AttendanceStatus,
            CreateAttendance,
            UpdateAttendance,
            DashboardSummary,
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
