//! Document backend on MongoDB.
//!
//! No multi-operation transactions here: uniqueness relies on the
//! service-level check-then-insert pattern, which is not atomic —
//! concurrent requests for the same key can race. Accepted limitation
//! of the document path, not a bug to fix.
//!
//! The relational backend cascades employee deletes to attendance via a
//! foreign key; this adapter mirrors that with an explicit `delete_many`.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::bson::{DateTime as BsonDateTime, Document, doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection, Database};

use crate::error::{Error, Result};
use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::model::employee::{Employee, UpdateEmployee};
use crate::store::{AttendanceStore, EmployeeStore};

const EMPLOYEES: &str = "employees";
const ATTENDANCE: &str = "attendance";

/// Mongo duplicate-key error code (E11000).
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self {
            db: client.database(db_name),
        })
    }

    fn employees(&self) -> Collection<Document> {
        self.db.collection(EMPLOYEES)
    }

    fn attendance(&self) -> Collection<Document> {
        self.db.collection(ATTENDANCE)
    }

    async fn fetch_employee(&self, id: &str) -> Result<Option<Employee>> {
        let doc = self.employees().find_one(doc! { "_id": id }, None).await?;
        doc.map(doc_to_employee).transpose()
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn get_str(doc: &Document, key: &str) -> Result<String> {
    doc.get_str(key)
        .map(str::to_string)
        .map_err(|_| Error::Internal(format!("document missing string field '{key}'")))
}

fn doc_to_employee(doc: Document) -> Result<Employee> {
    let created_at = doc
        .get_datetime("created_at")
        .map(|dt| dt.to_chrono())
        .map_err(|_| Error::Internal("document missing 'created_at'".to_string()))?;
    Ok(Employee {
        id: get_str(&doc, "_id")?,
        name: get_str(&doc, "name")?,
        email: get_str(&doc, "email")?,
        department: get_str(&doc, "department")?,
        created_at,
    })
}

fn doc_to_attendance(doc: Document) -> Result<Attendance> {
    let id = doc
        .get_object_id("_id")
        .map_err(|_| Error::Internal("attendance document missing '_id'".to_string()))?
        .to_hex();
    let date_raw = get_str(&doc, "date")?;
    let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
        .map_err(|_| Error::Internal(format!("invalid stored date: {date_raw}")))?;
    let status_raw = get_str(&doc, "status")?;
    let status = status_raw
        .parse::<AttendanceStatus>()
        .map_err(|_| Error::Internal(format!("invalid stored status: {status_raw}")))?;
    Ok(Attendance {
        id,
        employee_id: get_str(&doc, "employee_id")?,
        date,
        status,
    })
}

/// Dates are stored as `YYYY-MM-DD` strings so exact-date filters and
/// descending date sorts behave the same as the relational backend.
fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl EmployeeStore for MongoStore {
    async fn insert_employee(
        &self,
        id: &str,
        name: &str,
        email: &str,
        department: &str,
    ) -> Result<Employee> {
        let document = doc! {
            "_id": id,
            "name": name,
            "email": email,
            "department": department,
            "created_at": BsonDateTime::from_chrono(Utc::now()),
        };

        self.employees()
            .insert_one(&document, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    Error::duplicate("Employee", "ID")
                } else {
                    Error::Mongo(e)
                }
            })?;

        doc_to_employee(document)
    }

    async fn find_employee(&self, id: &str) -> Result<Option<Employee>> {
        self.fetch_employee(id).await
    }

    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let doc = self
            .employees()
            .find_one(doc! { "email": email }, None)
            .await?;
        doc.map(doc_to_employee).transpose()
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let docs: Vec<Document> = self
            .employees()
            .find(None, options)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(doc_to_employee).collect()
    }

    async fn update_employee(
        &self,
        id: &str,
        changes: &UpdateEmployee,
    ) -> Result<Option<Employee>> {
        let mut set = Document::new();
        if let Some(name) = &changes.name {
            set.insert("name", name.as_str());
        }
        if let Some(email) = &changes.email {
            set.insert("email", email.as_str());
        }
        if let Some(department) = &changes.department {
            set.insert("department", department.as_str());
        }

        if set.is_empty() {
            return self.fetch_employee(id).await;
        }

        let result = self
            .employees()
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        self.fetch_employee(id).await
    }

    async fn delete_employee(&self, id: &str) -> Result<bool> {
        let result = self.employees().delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Ok(false);
        }
        // Mirror the relational ON DELETE CASCADE.
        self.attendance()
            .delete_many(doc! { "employee_id": id }, None)
            .await?;
        Ok(true)
    }

    async fn count_employees(&self) -> Result<u64> {
        let count = self.employees().count_documents(None, None).await?;
        Ok(count)
    }
}

#[async_trait]
impl AttendanceStore for MongoStore {
    async fn insert_attendance(&self, record: &NewAttendance) -> Result<Attendance> {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "employee_id": record.employee_id.as_str(),
            "date": date_string(record.date),
            "status": record.status.to_string(),
            "created_at": BsonDateTime::from_chrono(Utc::now()),
        };

        self.attendance().insert_one(document, None).await?;

        Ok(Attendance {
            id: id.to_hex(),
            employee_id: record.employee_id.clone(),
            date: record.date,
            status: record.status,
        })
    }

    async fn find_attendance(&self, id: &str) -> Result<Option<Attendance>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let doc = self.attendance().find_one(doc! { "_id": oid }, None).await?;
        doc.map(doc_to_attendance).transpose()
    }

    async fn find_attendance_for_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Attendance>> {
        let doc = self
            .attendance()
            .find_one(
                doc! { "employee_id": employee_id, "date": date_string(date) },
                None,
            )
            .await?;
        doc.map(doc_to_attendance).transpose()
    }

    async fn list_attendance(&self, date: Option<NaiveDate>) -> Result<Vec<Attendance>> {
        let filter = date.map(|d| doc! { "date": date_string(d) });
        let options = FindOptions::builder()
            .sort(doc! { "date": -1, "_id": -1 })
            .build();
        let docs: Vec<Document> = self
            .attendance()
            .find(filter, options)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(doc_to_attendance).collect()
    }

    async fn list_attendance_for_employee(&self, employee_id: &str) -> Result<Vec<Attendance>> {
        let options = FindOptions::builder()
            .sort(doc! { "date": -1, "_id": -1 })
            .build();
        let docs: Vec<Document> = self
            .attendance()
            .find(doc! { "employee_id": employee_id }, options)
            .await?
            .try_collect()
            .await?;
        docs.into_iter().map(doc_to_attendance).collect()
    }

    async fn update_attendance_status(
        &self,
        id: &str,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let result = self
            .attendance()
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "status": status.to_string() } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        let doc = self.attendance().find_one(doc! { "_id": oid }, None).await?;
        doc.map(doc_to_attendance).transpose()
    }

    async fn delete_attendance(&self, id: &str) -> Result<bool> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let result = self
            .attendance()
            .delete_one(doc! { "_id": oid }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_attendance(
        &self,
        employee_id: Option<&str>,
        status: AttendanceStatus,
    ) -> Result<u64> {
        let mut filter = doc! { "status": status.to_string() };
        if let Some(employee_id) = employee_id {
            filter.insert("employee_id", employee_id);
        }
        let count = self.attendance().count_documents(filter, None).await?;
        Ok(count)
    }
}
