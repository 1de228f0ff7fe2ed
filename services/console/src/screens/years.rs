//! services/console/src/screens/years.rs
//!
//! The academic-year manager: the generic manager plus the one operation no
//! other entity has — the PATCH status toggle. Full edits still go through
//! the ordinary PUT path; PATCH stays academic-year-only.

use crate::screens::manager::ManagerScreen;
use chrono::{DateTime, Utc};
use school_console_core::catalog;
use school_console_core::domain::AcademicYear;
use school_console_core::ports::Gateway;
use serde_json::json;
use uuid::Uuid;

pub struct AcademicYearsScreen {
    pub manager: ManagerScreen<AcademicYear>,
}

impl AcademicYearsScreen {
    pub fn new() -> Self {
        Self {
            manager: ManagerScreen::new(catalog::academic_years()),
        }
    }

    pub async fn mount(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.manager.mount(gateway, now).await;
    }

    /// Toggle ACTIVE <-> ARCHIVED via PATCH, then re-fetch. One notification
    /// per outcome, like every other mutation.
    pub async fn toggle_status(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>, id: Uuid) {
        let Some(year) = self.manager.store.items().iter().find(|y| y.id == id) else {
            return;
        };
        let next = year.status.toggled();
        let route = self.manager.descriptor().route;
        match gateway
            .patch(&route, id, json!({ "status": next.as_str() }))
            .await
        {
            Ok(_) => {
                self.manager
                    .notifier
                    .success(format!("Academic year set to {}!", next.as_str()), now);
                if let Err(err) = self.manager.store.invalidate(gateway).await {
                    tracing::warn!(%err, "refresh after status toggle failed");
                }
            }
            Err(err) => self.manager.notifier.error(err.to_string(), now),
        }
    }
}

impl Default for AcademicYearsScreen {
    fn default() -> Self {
        Self::new()
    }
}
