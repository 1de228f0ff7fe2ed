//! crates/school_console_core/src/aggregate.rs
//!
//! Derived statistics computed purely from already-fetched collections.
//! No network calls, no mutable state: the same inputs always produce the
//! same outputs, empty collections produce zeros, and a payment whose
//! student has since been deleted is excluded from per-student figures while
//! still counting toward the global sum.

use crate::domain::{FeePayment, Student};
use chrono::{DateTime, Datelike, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

/// Fee statistics shown on the fee-collection screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeStats {
    /// Sum of `total_amount` over every payment, dangling ones included.
    pub total_collected: i64,
    /// Sum over students of expected fees minus that student's paid total.
    /// May go negative for an overpaying student; the sum is not clamped.
    pub pending_fees: i64,
    /// Students with at least one payment record.
    pub paid_students: usize,
    /// Students with no payment record at all.
    pub defaulters: usize,
}

/// Expected fees for one student: tuition + auto + day-boarding.
pub fn expected_fees(student: &Student) -> i64 {
    student.tuition_fees + student.auto_fees + student.day_boarding_fees
}

pub fn fee_stats(students: &[Student], payments: &[FeePayment]) -> FeeStats {
    let known: HashSet<Uuid> = students.iter().map(|s| s.id).collect();

    let total_collected = payments.iter().map(|p| p.total_amount).sum();

    // Paid totals per existing student; dangling payments fall out here.
    let mut paid_by_student: HashMap<Uuid, i64> = HashMap::new();
    for payment in payments {
        if known.contains(&payment.student_id) {
            *paid_by_student.entry(payment.student_id).or_insert(0) += payment.total_amount;
        }
    }

    let paid_students = paid_by_student.len();
    let pending_fees = students
        .iter()
        .map(|s| expected_fees(s) - paid_by_student.get(&s.id).copied().unwrap_or(0))
        .sum();

    FeeStats {
        total_collected,
        pending_fees,
        paid_students,
        defaulters: students.len() - paid_students,
    }
}

/// Amount collected in the calendar month containing `now`, matched on the
/// payment's transaction date.
pub fn collected_in_month(payments: &[FeePayment], now: DateTime<Utc>) -> i64 {
    payments
        .iter()
        .filter(|p| {
            p.transaction_date.year() == now.year() && p.transaction_date.month() == now.month()
        })
        .map(|p| p.total_amount)
        .sum()
}

/// Student head-count partitioned by class.
pub fn students_per_class(students: &[Student]) -> BTreeMap<Uuid, usize> {
    let mut counts = BTreeMap::new();
    for student in students {
        *counts.entry(student.class_id).or_insert(0) += 1;
    }
    counts
}

/// Student head-count partitioned by section.
pub fn students_per_section(students: &[Student]) -> BTreeMap<Uuid, usize> {
    let mut counts = BTreeMap::new();
    for student in students {
        *counts.entry(student.section_id).or_insert(0) += 1;
    }
    counts
}
