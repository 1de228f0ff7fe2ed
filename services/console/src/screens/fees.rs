//! services/console/src/screens/fees.rs
//!
//! The fee-collection manager: payments plus the students they belong to,
//! with the derived statistics recomputed whenever either collection
//! changes. The statistics are pure functions of the two in-memory
//! collections — this screen never asks the server for them.

use crate::screens::manager::ManagerScreen;
use chrono::{DateTime, Utc};
use school_console_core::aggregate::{self, FeeStats};
use school_console_core::catalog;
use school_console_core::domain::{FeePayment, Student};
use school_console_core::ports::Gateway;
use school_console_core::store::EntityStore;
use uuid::Uuid;

pub struct FeesScreen {
    pub manager: ManagerScreen<FeePayment>,
    pub students: EntityStore<Student>,
    stats: FeeStats,
}

impl FeesScreen {
    pub fn new() -> Self {
        Self {
            manager: ManagerScreen::new(catalog::fee_payments()),
            students: EntityStore::new(catalog::STUDENTS),
            stats: FeeStats::default(),
        }
    }

    pub async fn mount(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.manager.mount(gateway, now).await;
        self.manager
            .load_auxiliary(&mut self.students, gateway, now)
            .await;
        self.recompute();
    }

    pub async fn submit(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.manager.submit(gateway, now).await;
        self.recompute();
    }

    pub async fn confirm_delete(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.manager.confirm_delete(gateway, now).await;
        self.recompute();
    }

    /// Recomputed on every change to either input collection.
    fn recompute(&mut self) {
        self.stats = aggregate::fee_stats(self.students.items(), self.manager.store.items());
    }

    pub fn stats(&self) -> FeeStats {
        self.stats
    }

    /// Amount collected in the calendar month containing `now`.
    pub fn collected_this_month(&self, now: DateTime<Utc>) -> i64 {
        aggregate::collected_in_month(self.manager.store.items(), now)
    }

    /// Payments filtered by the owning student's name, for the search box.
    pub fn filtered(&self, search: &str) -> Vec<&FeePayment> {
        let needle = search.to_lowercase();
        self.manager
            .store
            .items()
            .iter()
            .filter(|p| {
                self.student_name(p.student_id)
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn student_name(&self, student_id: Uuid) -> Option<&str> {
        self.students
            .items()
            .iter()
            .find(|s| s.id == student_id)
            .map(|s| s.name.as_str())
    }
}

impl Default for FeesScreen {
    fn default() -> Self {
        Self::new()
    }
}
