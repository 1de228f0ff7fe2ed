//! services/console/src/screens/students.rs
//!
//! The student manager: the generic manager over students, plus the parent
//! collections its form selects from (classes, academic years) and the
//! class-scoped section options behind the cascading select.

use crate::screens::manager::ManagerScreen;
use chrono::{DateTime, Utc};
use school_console_core::catalog::{self, SECTIONS};
use school_console_core::domain::{AcademicYear, SchoolClass, Section, Student};
use school_console_core::form::CascadeRequest;
use school_console_core::ports::Gateway;
use school_console_core::store::{DependentOptions, EntityStore};
use uuid::Uuid;

pub struct StudentsScreen {
    pub manager: ManagerScreen<Student>,
    pub classes: EntityStore<SchoolClass>,
    pub academic_years: EntityStore<AcademicYear>,
    pub sections: DependentOptions<Section>,
}

impl StudentsScreen {
    pub fn new() -> Self {
        Self {
            manager: ManagerScreen::new(catalog::students()),
            classes: EntityStore::new(catalog::CLASSES),
            academic_years: EntityStore::new(catalog::ACADEMIC_YEARS),
            sections: DependentOptions::new(),
        }
    }

    /// Students, classes and academic years are independent fetches with no
    /// ordering requirement between them.
    pub async fn mount(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>) {
        self.manager.mount(gateway, now).await;
        self.manager
            .load_auxiliary(&mut self.classes, gateway, now)
            .await;
        self.manager
            .load_auxiliary(&mut self.academic_years, gateway, now)
            .await;
    }

    pub fn open_create(&mut self) {
        self.sections.clear();
        self.manager.open_create();
    }

    /// Editing pre-populates the draft and scopes section options to the
    /// student's current class, so the select is usable immediately.
    pub async fn open_edit(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>, student: &Student) {
        self.manager.open_edit(student);
        self.fetch_sections_for(gateway, now, student.class_id.to_string()).await;
    }

    /// Field edit with cascade handling: choosing a class clears the section
    /// choice and re-fetches the options scoped to the new class; a stale
    /// response from a previous choice can never be applied.
    pub async fn set_field(
        &mut self,
        gateway: &dyn Gateway,
        now: DateTime<Utc>,
        name: &str,
        value: impl Into<String>,
    ) {
        if let Some(cascade) = self.manager.set_field(name, value) {
            self.apply_cascade(gateway, now, cascade).await;
        }
    }

    async fn apply_cascade(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>, cascade: CascadeRequest) {
        if cascade.parent_value.is_empty() {
            self.sections.clear();
            return;
        }
        let query = vec![(cascade.query_param.to_string(), cascade.parent_value.clone())];
        let ticket = self.sections.begin_fetch(cascade.parent_value);
        let outcome = gateway.list(&cascade.route, &query).await;
        if let Err(err) = self.sections.finish_fetch(ticket, outcome) {
            self.manager
                .notifier
                .error(format!("Error fetching sections: {err}"), now);
        }
    }

    async fn fetch_sections_for(&mut self, gateway: &dyn Gateway, now: DateTime<Utc>, class_id: String) {
        let query = vec![("class_id".to_string(), class_id.clone())];
        let ticket = self.sections.begin_fetch(class_id);
        let outcome = gateway.list(&SECTIONS, &query).await;
        if let Err(err) = self.sections.finish_fetch(ticket, outcome) {
            self.manager
                .notifier
                .error(format!("Error fetching sections: {err}"), now);
        }
    }

    /// Section options for the class currently chosen in the form.
    pub fn section_options(&self) -> &[Section] {
        self.sections.options()
    }

    /// Case-insensitive name filter for the table's search box.
    pub fn filtered(&self, search: &str) -> Vec<&Student> {
        let needle = search.to_lowercase();
        self.manager
            .store
            .items()
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn class_name(&self, class_id: Uuid) -> Option<&str> {
        self.classes
            .items()
            .iter()
            .find(|c| c.id == class_id)
            .map(|c| c.name.as_str())
    }
}

impl Default for StudentsScreen {
    fn default() -> Self {
        Self::new()
    }
}
