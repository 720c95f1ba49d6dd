use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::{Error, Result};
use crate::model::employee::validate_employee_id;

/// Daily attendance status. Input is accepted in any casing and
/// normalized to the capitalized form; other tokens are rejected.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn parse(token: &str) -> Result<Self> {
        Self::from_str(token)
            .map_err(|_| Error::validation("Status must be 'Present' or 'Absent'"))
    }
}

/// Attendance record with the backend-native id exposed as a string
/// (rowid for SQLite, ObjectId hex for MongoDB).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "id": "1",
        "employee_id": "E001",
        "date": "2026-01-05",
        "status": "Present"
    })
)]
pub struct Attendance {
    #[schema(example = "1")]
    pub id: String,

    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(value_type = String, format = "date", example = "2026-01-05")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAttendance {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "2026-01-05", format = "date")]
    pub date: String,
    #[schema(example = "Present")]
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAttendance {
    #[schema(example = "Absent")]
    pub status: String,
}

/// Validated attendance payload handed to the service layer.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl CreateAttendance {
    pub fn validate(&self) -> Result<NewAttendance> {
        validate_employee_id(&self.employee_id)?;
        let date = parse_date(&self.date)?;
        let status = AttendanceStatus::parse(&self.status)?;
        Ok(NewAttendance {
            employee_id: self.employee_id.clone(),
            date,
            status,
        })
    }
}

impl UpdateAttendance {
    pub fn validate(&self) -> Result<AttendanceStatus> {
        AttendanceStatus::parse(&self.status)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| Error::validation("Date must be in YYYY-MM-DD format"))
}

/// System-wide attendance totals for the dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    #[schema(example = 12)]
    pub total_employees: u64,
    #[schema(example = 30)]
    pub total_present: u64,
    #[schema(example = 5)]
    pub total_absent: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_any_casing() {
        assert_eq!(
            AttendanceStatus::parse("present").unwrap(),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::parse("ABSENT").unwrap(),
            AttendanceStatus::Absent
        );
    }

    #[test]
    fn status_rejects_unknown_tokens() {
        assert!(AttendanceStatus::parse("Maybe").is_err());
        assert!(AttendanceStatus::parse("").is_err());
    }

    #[test]
    fn status_round_trips_through_display() {
        assert_eq!(AttendanceStatus::Present.to_string(), "Present");
        assert_eq!(AttendanceStatus::Absent.to_string(), "Absent");
    }

    #[test]
    fn create_payload_is_validated() {
        let req = CreateAttendance {
            employee_id: "E001".to_string(),
            date: "2026-01-05".to_string(),
            status: "present".to_string(),
        };
        let rec = req.validate().unwrap();
        assert_eq!(rec.status, AttendanceStatus::Present);
        assert_eq!(rec.date.to_string(), "2026-01-05");
    }

    #[test]
    fn create_payload_rejects_bad_date() {
        let req = CreateAttendance {
            employee_id: "E001".to_string(),
            date: "05-01-2026".to_string(),
            status: "Present".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
