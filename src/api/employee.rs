use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::error::Error;
use crate::model::employee::{CreateEmployee, Employee, UpdateEmployee};
use crate::service::EmployeeService;

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 409, description = "Employee ID or email already exists", body = Object, example = json!({
            "message": "Employee already exists with this ID"
        })),
        (status = 422, description = "Validation failure"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    service: web::Data<EmployeeService>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, Error> {
    let mut payload = payload.into_inner();
    payload.validate()?;

    let employee = service.create(&payload).await?;
    Ok(HttpResponse::Created().json(employee))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [Employee]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(service: web::Data<EmployeeService>) -> Result<HttpResponse, Error> {
    let employees = service.list().await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found: E999"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    service: web::Data<EmployeeService>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let employee = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Email already taken by another employee"),
        (status = 422, description = "Validation failure"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    service: web::Data<EmployeeService>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, Error> {
    let payload = payload.into_inner();
    payload.validate()?;

    let employee = service.update(&path.into_inner(), &payload).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully"
    })))
}
