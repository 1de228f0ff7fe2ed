//! services/console/src/screens/dashboard.rs
//!
//! The dashboard: server-computed aggregate totals plus the per-student
//! payment breakdown, fetched in one call. Rendering (cards, chart) is out
//! of scope; this screen owns the data and its fetch lifecycle.

use chrono::{DateTime, Utc};
use school_console_core::catalog::DASHBOARD_PATH;
use school_console_core::domain::DashboardSummary;
use school_console_core::notify::Notifier;
use school_console_core::ports::{Gateway, GatewayError};

pub struct DashboardScreen {
    summary: DashboardSummary,
    loading: bool,
    generation: u64,
    pub notifier: Notifier,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            summary: DashboardSummary::default(),
            loading: false,
            generation: 0,
            notifier: Notifier::new(),
        }
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn mount(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.refresh(gateway, now).await;
    }

    /// Failure keeps the previous snapshot; stale overlapping responses are
    /// discarded.
    pub async fn refresh(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.generation += 1;
        let generation = self.generation;
        self.loading = true;
        let outcome = gateway.fetch(DASHBOARD_PATH).await;
        if generation != self.generation {
            return;
        }
        self.loading = false;
        match outcome.and_then(|value| {
            serde_json::from_value::<DashboardSummary>(value)
                .map_err(|e| GatewayError::Decode(e.to_string()))
        }) {
            Ok(summary) => self.summary = summary,
            Err(err) => self
                .notifier
                .error(format!("Error fetching dashboard: {err}"), now),
        }
    }
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}
