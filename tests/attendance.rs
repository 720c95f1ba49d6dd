use std::sync::Arc;

use chrono::NaiveDate;
use hrms_lite::error::Error;
use hrms_lite::model::attendance::{AttendanceStatus, CreateAttendance, NewAttendance};
use hrms_lite::model::employee::CreateEmployee;
use hrms_lite::service::{AttendanceService, EmployeeService};
use hrms_lite::store::Store;
use hrms_lite::store::sqlite::SqliteStore;

async fn setup() -> (EmployeeService, AttendanceService) {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::in_memory().await.unwrap());
    let employees = EmployeeService::new(store.clone());
    let attendance = AttendanceService::new(store, employees.clone());
    (employees, attendance)
}

async fn add_employee(service: &EmployeeService, id: &str, email: &str) {
    let mut payload = CreateEmployee {
        id: id.to_string(),
        name: "Jane Doe".to_string(),
        email: email.to_string(),
        department: "Engineering".to_string(),
    };
    payload.validate().unwrap();
    service.create(&payload).await.unwrap();
}

fn record(employee_id: &str, date: &str, status: AttendanceStatus) -> NewAttendance {
    NewAttendance {
        employee_id: employee_id.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        status,
    }
}

#[actix_web::test]
async fn create_requires_existing_employee() {
    let (_, attendance) = setup().await;

    let err = attendance
        .create(&record("E404", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");
}

#[actix_web::test]
async fn create_and_fetch_record() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;

    let created = attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
    assert_eq!(created.employee_id, "E001");
    assert_eq!(created.status, AttendanceStatus::Present);
    assert!(!created.id.is_empty());

    let listed = attendance.list(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[actix_web::test]
async fn second_record_for_same_day_is_rejected() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;

    attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
    let err = attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Absent))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Duplicate { .. }), "got {err:?}");

    // Same employee on another day, and another employee on the same
    // day, are both fine.
    add_employee(&employees, "E002", "b@x.com").await;
    attendance
        .create(&record("E001", "2026-01-06", AttendanceStatus::Present))
        .await
        .unwrap();
    attendance
        .create(&record("E002", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
}

#[actix_web::test]
async fn status_is_normalized_at_the_boundary() {
    let payload = CreateAttendance {
        employee_id: "E001".to_string(),
        date: "2026-01-05".to_string(),
        status: "present".to_string(),
    };
    assert_eq!(payload.validate().unwrap().status, AttendanceStatus::Present);

    let payload = CreateAttendance {
        employee_id: "E001".to_string(),
        date: "2026-01-05".to_string(),
        status: "Maybe".to_string(),
    };
    let err = payload.validate().unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
}

#[actix_web::test]
async fn summary_counts_present_and_absent() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;

    for date in ["2026-01-05", "2026-01-06", "2026-01-07"] {
        attendance
            .create(&record("E001", date, AttendanceStatus::Present))
            .await
            .unwrap();
    }
    for date in ["2026-01-08", "2026-01-09"] {
        attendance
            .create(&record("E001", date, AttendanceStatus::Absent))
            .await
            .unwrap();
    }

    let summary = attendance.summary("E001").await.unwrap();
    assert_eq!(summary.total_present, 3);
    assert_eq!(summary.total_absent, 2);
    assert_eq!(summary.name, "Jane Doe");
}

#[actix_web::test]
async fn summary_for_missing_employee_is_not_found() {
    let (_, attendance) = setup().await;

    let err = attendance.summary("E404").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");
}

#[actix_web::test]
async fn list_filters_by_exact_date_and_sorts_descending() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;
    add_employee(&employees, "E002", "b@x.com").await;

    attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
    attendance
        .create(&record("E001", "2026-01-07", AttendanceStatus::Absent))
        .await
        .unwrap();
    attendance
        .create(&record("E002", "2026-01-06", AttendanceStatus::Present))
        .await
        .unwrap();

    let all = attendance.list(None).await.unwrap();
    let dates: Vec<String> = all.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(dates, vec!["2026-01-07", "2026-01-06", "2026-01-05"]);

    let filter = NaiveDate::parse_from_str("2026-01-06", "%Y-%m-%d").unwrap();
    let filtered = attendance.list(Some(filter)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].employee_id, "E002");
}

#[actix_web::test]
async fn per_employee_listing_is_scoped_and_sorted() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;
    add_employee(&employees, "E002", "b@x.com").await;

    attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
    attendance
        .create(&record("E001", "2026-01-06", AttendanceStatus::Absent))
        .await
        .unwrap();
    attendance
        .create(&record("E002", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();

    let records = attendance.list_for_employee("E001").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date.to_string(), "2026-01-06");
    assert!(records.iter().all(|r| r.employee_id == "E001"));

    let err = attendance.list_for_employee("E404").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");
}

#[actix_web::test]
async fn update_sets_status_by_record_id() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;

    let created = attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();

    let updated = attendance
        .update_status(&created.id, AttendanceStatus::Absent)
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, AttendanceStatus::Absent);

    let err = attendance
        .update_status("99999", AttendanceStatus::Present)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");

    // A non-numeric id can never match a relational rowid.
    let err = attendance
        .update_status("not-an-id", AttendanceStatus::Present)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");
}

#[actix_web::test]
async fn delete_removes_record_once() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;

    let created = attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();

    attendance.delete(&created.id).await.unwrap();
    let err = attendance.delete(&created.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");
}

#[actix_web::test]
async fn deleting_employee_cascades_to_attendance() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;

    attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
    attendance
        .create(&record("E001", "2026-01-06", AttendanceStatus::Absent))
        .await
        .unwrap();

    employees.delete("E001").await.unwrap();

    let remaining = attendance.list(None).await.unwrap();
    assert!(
        remaining.iter().all(|r| r.employee_id != "E001"),
        "attendance rows survived the employee delete"
    );
    assert!(remaining.is_empty());
}

#[actix_web::test]
async fn dashboard_summary_aggregates_whole_system() {
    let (employees, attendance) = setup().await;
    add_employee(&employees, "E001", "a@x.com").await;
    add_employee(&employees, "E002", "b@x.com").await;

    attendance
        .create(&record("E001", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
    attendance
        .create(&record("E002", "2026-01-05", AttendanceStatus::Present))
        .await
        .unwrap();
    attendance
        .create(&record("E001", "2026-01-06", AttendanceStatus::Absent))
        .await
        .unwrap();

    let summary = attendance.dashboard_summary().await.unwrap();
    assert_eq!(summary.total_employees, 2);
    assert_eq!(summary.total_present, 2);
    assert_eq!(summary.total_absent, 1);
}
