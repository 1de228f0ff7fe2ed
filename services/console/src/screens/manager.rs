//! services/console/src/screens/manager.rs
//!
//! The generic manager screen: one Entity Store, one Form Session and one
//! Notifier wired together for a single entity type. Every specific manager
//! (classes, sections, academic years, ...) is an instantiation of this over
//! a catalog descriptor; the composite screens embed it and add their extra
//! stores.
//!
//! The glue here is the single call path for mutations, which is what makes
//! the "exactly one notification per outcome" contract hold: submit and
//! confirmed delete each notify once, then re-fetch the collection.

use chrono::{DateTime, Utc};
use school_console_core::catalog::EntityDescriptor;
use school_console_core::domain::Identified;
use school_console_core::form::{CascadeRequest, FormMode, FormSession};
use school_console_core::notify::Notifier;
use school_console_core::ports::Gateway;
use school_console_core::store::EntityStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

pub struct ManagerScreen<T> {
    descriptor: EntityDescriptor,
    pub store: EntityStore<T>,
    pub form: FormSession,
    pub notifier: Notifier,
    pending_delete: Option<Uuid>,
    cancel: CancellationToken,
}

impl<T> ManagerScreen<T>
where
    T: Serialize + DeserializeOwned + Identified + Clone + Send,
{
    pub fn new(descriptor: EntityDescriptor) -> Self {
        Self {
            store: EntityStore::new(descriptor.route),
            form: FormSession::new(descriptor.schema.clone()),
            notifier: Notifier::new(),
            pending_delete: None,
            cancel: CancellationToken::new(),
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    /// Initial fetch on mount. Cancelled fetches are simply never applied —
    /// the select arm drops the response before the store sees it.
    pub async fn mount(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.refresh(gateway, now).await;
    }

    /// Full re-fetch. On failure the previous collection stays and the error
    /// is surfaced once.
    pub async fn refresh(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        let ticket = self.store.begin_load();
        let route = *self.store.route();
        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            outcome = gateway.list(&route, &[]) => outcome,
        };
        if let Err(err) = self.store.finish_load(ticket, outcome) {
            self.notifier.error(
                format!("Error fetching {}: {}", route.segment(), err),
                now,
            );
        }
    }

    /// Navigating away: in-flight fetches for this screen must not land.
    pub fn unmount(&mut self) {
        self.cancel.cancel();
    }

    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    pub fn open_edit(&mut self, record: &T) {
        match serde_json::to_value(record) {
            Ok(value) => self.form.open_edit(record.id(), &value),
            Err(err) => warn!(%err, "record not serializable for editing"),
        }
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    /// Forwarded so composite screens can react to cascade directives.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Option<CascadeRequest> {
        self.form.set_field(name, value)
    }

    /// Validate and, if the draft passes, send the create/update. Exactly one
    /// notification per outcome; on failure the draft stays open for retry.
    /// A draft that fails client-side validation makes no network call and
    /// shows its errors inline only.
    pub async fn submit(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        let Some((mode, payload)) = self.form.begin_submit() else {
            return;
        };
        let route = self.descriptor.route;
        let result = match mode {
            FormMode::Create => gateway.create(&route, payload).await,
            FormMode::Edit(id) => gateway.update(&route, id, payload).await,
        };
        match result {
            Ok(_) => {
                self.form.succeed();
                let verb = match mode {
                    FormMode::Create => "created",
                    FormMode::Edit(_) => "updated",
                };
                self.notifier.success(
                    format!("{} {} successfully!", self.descriptor.label, verb),
                    now,
                );
                self.invalidate(gateway).await;
            }
            Err(err) => {
                self.form.fail(&err);
                self.notifier.error(err.to_string(), now);
            }
        }
    }

    /// First step of deletion: nothing is sent until the user confirms.
    pub fn request_delete(&mut self, id: Uuid) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<Uuid> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step: issue the DELETE. Deleting an id the server no longer
    /// has surfaces the not-found error like any other failure.
    pub async fn confirm_delete(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match gateway.delete(&self.descriptor.route, id).await {
            Ok(()) => {
                self.notifier.success(
                    format!("{} deleted successfully!", self.descriptor.label),
                    now,
                );
                self.invalidate(gateway).await;
            }
            Err(err) => {
                self.notifier.error(err.to_string(), now);
            }
        }
    }

    /// Post-mutation re-fetch. The mutation already notified; a refresh
    /// failure only logs and leaves the stale collection, rather than
    /// issuing a second notification for one user action.
    async fn invalidate(&mut self, gateway: &dyn Gateway) {
        if let Err(err) = self.store.invalidate(gateway).await {
            warn!(
                route = self.descriptor.route.segment(),
                %err,
                "refresh after mutation failed; keeping previous collection"
            );
        }
    }

    /// Helper for screens: load an auxiliary store (parent collections) and
    /// surface a failure through this screen's notifier.
    pub async fn load_auxiliary<U>(
        &mut self,
        store: &mut EntityStore<U>,
        gateway: &dyn Gateway,
        now: DateTime<Utc>,
    ) where
        U: DeserializeOwned,
    {
        if let Err(err) = store.load(gateway).await {
            self.notifier.error(
                format!("Error fetching {}: {}", store.route().segment(), err),
                now,
            );
        }
    }
}
