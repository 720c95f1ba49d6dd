//! Relational backend on SQLite.
//!
//! Multi-statement operations run inside a transaction: commit before
//! returning, rollback (on drop) before the error propagates. Engine
//! unique violations are mapped to `Duplicate` as a backstop behind the
//! service-level pre-checks.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::model::employee::{Employee, UpdateEmployee};
use crate::store::{AttendanceStore, EmployeeStore};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        department TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id TEXT NOT NULL,
        date TEXT NOT NULL,
        status TEXT NOT NULL,
        FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE,
        UNIQUE(employee_id, date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_employees_email ON employees(email)",
    "CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_employee_id ON attendance(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date)",
    "CREATE INDEX IF NOT EXISTS idx_attendance_status ON attendance(status)",
];

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// In-memory database for tests. A single connection keeps every
    /// operation on the same memory store.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch_employee(&self, id: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }
}

/// Classifies engine-level unique violations into the duplicate taxonomy.
fn map_employee_unique_err(e: sqlx::Error) -> Error {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let field = if db_err.message().contains("email") {
                "email"
            } else {
                "ID"
            };
            return Error::duplicate("Employee", field);
        }
    }
    Error::Database(e)
}

#[async_trait]
impl EmployeeStore for SqliteStore {
    async fn insert_employee(
        &self,
        id: &str,
        name: &str,
        email: &str,
        department: &str,
    ) -> Result<Employee> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO employees (id, name, email, department, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(department)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(map_employee_unique_err)?;

        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(employee)
    }

    async fn find_employee(&self, id: &str) -> Result<Option<Employee>> {
        self.fetch_employee(id).await
    }

    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    async fn update_employee(
        &self,
        id: &str,
        changes: &UpdateEmployee,
    ) -> Result<Option<Employee>> {
        // Build the SET clause from the supplied fields only.
        let mut sets: Vec<&str> = Vec::new();
        let mut bindings: Vec<&str> = Vec::new();

        if let Some(name) = &changes.name {
            sets.push("name = ?");
            bindings.push(name);
        }
        if let Some(email) = &changes.email {
            sets.push("email = ?");
            bindings.push(email);
        }
        if let Some(department) = &changes.department {
            sets.push("department = ?");
            bindings.push(department);
        }

        if sets.is_empty() {
            return self.fetch_employee(id).await;
        }

        let sql = format!("UPDATE employees SET {} WHERE id = ?", sets.join(", "));

        let mut tx = self.pool.begin().await?;

        let mut query = sqlx::query(&sql);
        for value in bindings {
            query = query.bind(value);
        }
        let result = query
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_employee_unique_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(employee))
    }

    async fn delete_employee(&self, id: &str) -> Result<bool> {
        // Attendance rows go with the employee via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_employees(&self) -> Result<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: i64,
    employee_id: String,
    date: NaiveDate,
    status: String,
}

impl AttendanceRow {
    fn into_attendance(self) -> Result<Attendance> {
        let status = AttendanceStatus::from_str(&self.status)
            .map_err(|_| Error::Internal(format!("invalid stored status: {}", self.status)))?;
        Ok(Attendance {
            id: self.id.to_string(),
            employee_id: self.employee_id,
            date: self.date,
            status,
        })
    }
}

/// Attendance ids are rowids; a non-numeric id can never match.
fn parse_attendance_id(id: &str) -> Option<i64> {
    id.parse::<i64>().ok()
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn insert_attendance(&self, record: &NewAttendance) -> Result<Attendance> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.employee_id)
        .bind(record.date)
        .bind(record.status.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                Error::duplicate("Attendance record", "date")
            } else {
                Error::Database(e)
            }
        })?;

        let row = sqlx::query_as::<_, AttendanceRow>("SELECT * FROM attendance WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.into_attendance()
    }

    async fn find_attendance(&self, id: &str) -> Result<Option<Attendance>> {
        let Some(row_id) = parse_attendance_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, AttendanceRow>("SELECT * FROM attendance WHERE id = ?")
            .bind(row_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AttendanceRow::into_attendance).transpose()
    }

    async fn find_attendance_for_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Attendance>> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            "SELECT * FROM attendance WHERE employee_id = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AttendanceRow::into_attendance).transpose()
    }

    async fn list_attendance(&self, date: Option<NaiveDate>) -> Result<Vec<Attendance>> {
        let rows = match date {
            Some(date) => {
                sqlx::query_as::<_, AttendanceRow>(
                    "SELECT * FROM attendance WHERE date = ? ORDER BY date DESC, id DESC",
                )
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AttendanceRow>(
                    "SELECT * FROM attendance ORDER BY date DESC, id DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter()
            .map(AttendanceRow::into_attendance)
            .collect()
    }

    async fn list_attendance_for_employee(&self, employee_id: &str) -> Result<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(
            "SELECT * FROM attendance WHERE employee_id = ? ORDER BY date DESC, id DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(AttendanceRow::into_attendance)
            .collect()
    }

    async fn update_attendance_status(
        &self,
        id: &str,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>> {
        let Some(row_id) = parse_attendance_id(id) else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE attendance SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(row_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, AttendanceRow>("SELECT * FROM attendance WHERE id = ?")
            .bind(row_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.into_attendance().map(Some)
    }

    async fn delete_attendance(&self, id: &str) -> Result<bool> {
        let Some(row_id) = parse_attendance_id(id) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(row_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_attendance(
        &self,
        employee_id: Option<&str>,
        status: AttendanceStatus,
    ) -> Result<u64> {
        let count = match employee_id {
            Some(employee_id) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM attendance WHERE employee_id = ? AND status = ?",
                )
                .bind(employee_id)
                .bind(status.to_string())
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE status = ?")
                    .bind(status.to_string())
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count as u64)
    }
}
