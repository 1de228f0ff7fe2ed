//! services/console/src/screens/transport.rs
//!
//! The transport ("auto") manager. Groups come from the bulk
//! `with-students` listing rather than the plain collection, so this screen
//! keeps its own generation-guarded list instead of embedding the generic
//! manager; the form and confirm-delete flow follow the same contracts.
//! Assignment is staged locally (a checked set of student ids) and posted as
//! one raw id array.

use chrono::{DateTime, Utc};
use school_console_core::catalog::{
    self, EntityDescriptor, ASSIGN_STUDENTS_ACTION, TRANSPORT_WITH_STUDENTS_PATH,
};
use school_console_core::domain::TransportGroup;
use school_console_core::form::{FormMode, FormSession};
use school_console_core::notify::Notifier;
use school_console_core::ports::{Gateway, GatewayError};
use serde_json::Value;
use std::collections::BTreeSet;
use uuid::Uuid;

/// A staged bulk assignment for one group.
pub struct AssignmentDraft {
    pub group_id: Uuid,
    pub selected: BTreeSet<Uuid>,
}

pub struct TransportScreen {
    descriptor: EntityDescriptor,
    groups: Vec<TransportGroup>,
    loading: bool,
    generation: u64,
    pub form: FormSession,
    pub notifier: Notifier,
    pending_delete: Option<Uuid>,
    assignment: Option<AssignmentDraft>,
}

impl TransportScreen {
    pub fn new() -> Self {
        let descriptor = catalog::transport_groups();
        Self {
            form: FormSession::new(descriptor.schema.clone()),
            notifier: Notifier::new(),
            groups: Vec::new(),
            loading: false,
            generation: 0,
            pending_delete: None,
            assignment: None,
            descriptor,
        }
    }

    pub fn groups(&self) -> &[TransportGroup] {
        &self.groups
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn mount(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.refresh(gateway, now).await;
    }

    /// Fetch the bulk listing; a stale overlapping response is discarded and
    /// a failure keeps the previous groups.
    pub async fn refresh(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.generation += 1;
        let generation = self.generation;
        self.loading = true;
        let outcome = gateway.fetch(TRANSPORT_WITH_STUDENTS_PATH).await;
        if generation != self.generation {
            return;
        }
        self.loading = false;
        match outcome.and_then(|value| {
            serde_json::from_value::<Vec<TransportGroup>>(value)
                .map_err(|e| GatewayError::Decode(e.to_string()))
        }) {
            Ok(groups) => self.groups = groups,
            Err(err) => self
                .notifier
                .error(format!("Error fetching autos: {err}"), now),
        }
    }

    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    pub fn open_edit(&mut self, group: &TransportGroup) {
        let record = serde_json::json!({ "name": group.name });
        self.form.open_edit(group.id, &record);
    }

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
                self.notifier
                    .success(format!("Auto {verb} successfully!"), now);
                self.refresh(gateway, now).await;
            }
            Err(err) => {
                self.form.fail(&err);
                self.notifier.error(err.to_string(), now);
            }
        }
    }

    pub fn request_delete(&mut self, id: Uuid) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match gateway.delete(&self.descriptor.route, id).await {
            Ok(()) => {
                self.notifier.success("Auto deleted successfully!", now);
                self.refresh(gateway, now).await;
            }
            Err(err) => self.notifier.error(err.to_string(), now),
        }
    }

    //=====================================================================================
    // Bulk Student Assignment
    //=====================================================================================

    /// Start assigning students to one group, pre-checking the students
    /// already on it.
    pub fn begin_assignment(&mut self, group_id: Uuid) {
        let selected = self
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .map(|g| g.student_ids.iter().copied().collect())
            .unwrap_or_default();
        self.assignment = Some(AssignmentDraft { group_id, selected });
    }

    pub fn assignment(&self) -> Option<&AssignmentDraft> {
        self.assignment.as_ref()
    }

    pub fn toggle_student(&mut self, student_id: Uuid) {
        if let Some(draft) = &mut self.assignment {
            if !draft.selected.remove(&student_id) {
                draft.selected.insert(student_id);
            }
        }
    }

    pub fn cancel_assignment(&mut self) {
        self.assignment = None;
    }

    /// POST the staged set as one raw array of student ids, then re-fetch.
    pub async fn submit_assignment(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        let Some(draft) = self.assignment.take() else {
            return;
        };
        let ids: Vec<Value> = draft
            .selected
            .iter()
            .map(|id| Value::from(id.to_string()))
            .collect();
        match gateway
            .post_action(
                &self.descriptor.route,
                draft.group_id,
                ASSIGN_STUDENTS_ACTION,
                Value::Array(ids),
            )
            .await
        {
            Ok(_) => {
                self.notifier
                    .success("Students assigned successfully!", now);
                self.refresh(gateway, now).await;
            }
            Err(err) => {
                // Draft retained so the selection can be corrected and retried.
                self.assignment = Some(draft);
                self.notifier.error(err.to_string(), now);
            }
        }
    }
}

impl Default for TransportScreen {
    fn default() -> Self {
        Self::new()
    }
}
