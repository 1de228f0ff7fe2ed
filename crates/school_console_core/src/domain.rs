//! crates/school_console_core/src/domain.rs
//!
//! Defines the core data structures for the console: the entity records the
//! remote API serves, plus the enums they carry. These are simultaneously the
//! wire shapes and the domain shapes — the client keeps no second
//! representation to map between.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status shared by most records. Two values, toggle-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "ARCHIVED")]
    Archived,
}

impl RecordStatus {
    /// The only legal transition: ACTIVE <-> ARCHIVED.
    pub fn toggled(self) -> Self {
        match self {
            RecordStatus::Active => RecordStatus::Archived,
            RecordStatus::Archived => RecordStatus::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Active => "ACTIVE",
            RecordStatus::Archived => "ARCHIVED",
        }
    }
}

/// Three-letter month codes used on fee payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Month {
    JAN,
    FEB,
    MAR,
    APR,
    MAY,
    JUN,
    JUL,
    AUG,
    SEP,
    OCT,
    NOV,
    DEC,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::JAN,
        Month::FEB,
        Month::MAR,
        Month::APR,
        Month::MAY,
        Month::JUN,
        Month::JUL,
        Month::AUG,
        Month::SEP,
        Month::OCT,
        Month::NOV,
        Month::DEC,
    ];

    pub fn parse(code: &str) -> Option<Month> {
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == code.to_ascii_uppercase())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Month::JAN => "JAN",
            Month::FEB => "FEB",
            Month::MAR => "MAR",
            Month::APR => "APR",
            Month::MAY => "MAY",
            Month::JUN => "JUN",
            Month::JUL => "JUL",
            Month::AUG => "AUG",
            Month::SEP => "SEP",
            Month::OCT => "OCT",
            Month::NOV => "NOV",
            Month::DEC => "DEC",
        }
    }
}

/// An academic year, e.g. "2025". Referenced by classes and students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicYear {
    pub id: Uuid,
    pub year: String,
    pub status: RecordStatus,
}

/// A class within one academic year. (`Class` alone reads poorly in Rust.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: Uuid,
    pub name: String,
    pub academic_year_id: Uuid,
}

/// A section of a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub name: String,
    pub class_id: Uuid,
}

/// A student record. Fee fields are the *expected* fees; what was actually
/// paid lives on `FeePayment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub father_name: String,
    pub mother_name: String,
    pub date_of_birth: String,
    pub contact: String,
    pub address: String,
    pub enrollment_date: String,
    pub tuition_fees: i64,
    pub auto_fees: i64,
    pub day_boarding_fees: i64,
    pub class_id: Uuid,
    pub section_id: Uuid,
    pub academic_year_id: Uuid,
}

/// One fee payment by one student. `total_amount` is computed server-side as
/// the sum of the three components and is display-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeePayment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub month: Month,
    pub tuition_fees: i64,
    pub auto_fees: i64,
    pub day_boarding_fees: i64,
    pub total_amount: i64,
    pub transaction_date: DateTime<Utc>,
    pub receipt_number: Option<String>,
}

/// A transport ("auto") group and the students assigned to it, as returned by
/// the bulk `with-students` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportGroup {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub student_ids: Vec<Uuid>,
}

/// One row of the dashboard's per-student payment breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentPaymentRow {
    pub id: Uuid,
    pub name: String,
    pub total_paid: i64,
    pub total_balance: i64,
    pub payment_status: String,
}

/// Aggregate totals served by `GET /dashboard/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_students: usize,
    pub total_payments: i64,
    pub total_dues: i64,
    #[serde(default)]
    pub students_with_payments: Vec<StudentPaymentRow>,
}

/// Anything the generic store can hold must expose its id.
pub trait Identified {
    fn id(&self) -> Uuid;
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

impl_identified!(
    AcademicYear,
    SchoolClass,
    Section,
    Student,
    FeePayment,
    TransportGroup,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_status_toggles_both_ways() {
        assert_eq!(RecordStatus::Active.toggled(), RecordStatus::Archived);
        assert_eq!(RecordStatus::Archived.toggled(), RecordStatus::Active);
    }

    #[test]
    fn month_parses_case_insensitively() {
        assert_eq!(Month::parse("jan"), Some(Month::JAN));
        assert_eq!(Month::parse("DEC"), Some(Month::DEC));
        assert_eq!(Month::parse("January"), None);
    }
}
