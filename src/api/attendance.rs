use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::error::Error;
use crate::model::attendance::{
    Attendance, CreateAttendance, DashboardSummary, UpdateAttendance, parse_date,
};
use crate::model::employee::EmployeeAttendanceSummary;
use crate::service::AttendanceService;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    /// Exact date filter, YYYY-MM-DD.
    pub date: Option<String>,
}

/// Create Attendance Record
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Record already exists for this date", body = Object, example = json!({
            "message": "Attendance record already exists with this date"
        })),
        (status = 422, description = "Validation failure"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    service: web::Data<AttendanceService>,
    payload: web::Json<CreateAttendance>,
) -> Result<HttpResponse, Error> {
    let record = payload.validate()?;
    let attendance = service.create(&record).await?;
    Ok(HttpResponse::Created().json(attendance))
}

/// List Attendance Records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records, date descending", body = [Attendance]),
        (status = 422, description = "Invalid date filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    service: web::Data<AttendanceService>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, Error> {
    let date = query.date.as_deref().map(parse_date).transpose()?;
    let records = service.list(date).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// List Attendance for an Employee
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee's attendance records, date descending", body = [Attendance]),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let records = service.list_for_employee(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Employee Attendance Summary
#[utoipa::path(
    get,
    path = "/api/attendance/summary/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Present/absent totals for the employee", body = EmployeeAttendanceSummary),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn employee_summary(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let summary = service.summary(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Update Attendance Status
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id", Path, description = "Attendance record ID")
    ),
    request_body = UpdateAttendance,
    responses(
        (status = 200, description = "Attendance updated", body = Attendance),
        (status = 404, description = "Attendance record not found"),
        (status = 422, description = "Validation failure"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    payload: web::Json<UpdateAttendance>,
) -> Result<HttpResponse, Error> {
    let status = payload.validate()?;
    let attendance = service.update_status(&path.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(attendance))
}

/// Delete Attendance Record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id", Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Attendance record deleted successfully"
        })),
        (status = 404, description = "Attendance record not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record deleted successfully"
    })))
}

/// Dashboard Summary
#[utoipa::path(
    get,
    path = "/api/attendance/dashboard/summary",
    responses(
        (status = 200, description = "System-wide totals", body = DashboardSummary),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn dashboard_summary(
    service: web::Data<AttendanceService>,
) -> Result<HttpResponse, Error> {
    let summary = service.dashboard_summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}
