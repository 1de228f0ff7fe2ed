//! crates/school_console_core/src/catalog.rs
//!
//! One descriptor per entity type: the endpoint route plus the form schema
//! (fields, validators, defaults, cascades). The per-entity manager screens
//! are instantiations of the generic store/form machinery over these
//! descriptors — this module is the only place the entities are enumerated.

use crate::form::{Cascade, FieldKind, FieldSpec, FormSchema};
use crate::ports::EntityRoute;

/// Everything a manager screen needs to know about one entity type.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// Singular display name used in notifications ("Student created successfully!").
    pub label: &'static str,
    pub route: EntityRoute,
    pub schema: FormSchema,
}

pub const ACADEMIC_YEARS: EntityRoute = EntityRoute::new("academic-years");
pub const CLASSES: EntityRoute = EntityRoute::new("classes");
pub const SECTIONS: EntityRoute = EntityRoute::new("sections");
pub const STUDENTS: EntityRoute = EntityRoute::new("students");
pub const FEE_PAYMENTS: EntityRoute = EntityRoute::new("fee_payments");
pub const TRANSPORT: EntityRoute = EntityRoute::new("auto-management");

/// Bulk transport listing with assigned student ids.
pub const TRANSPORT_WITH_STUDENTS_PATH: &str = "/auto-management/with-students";
/// Sub-resource action for bulk student assignment.
pub const ASSIGN_STUDENTS_ACTION: &str = "assign-students";
/// Server-computed aggregate totals.
pub const DASHBOARD_PATH: &str = "/dashboard/";

pub fn academic_years() -> EntityDescriptor {
    EntityDescriptor {
        label: "Academic year",
        route: ACADEMIC_YEARS,
        schema: FormSchema {
            entity: "academic_years",
            // Status is not form-editable; it starts ACTIVE and changes only
            // through the PATCH toggle.
            fields: vec![FieldSpec::required("year", FieldKind::Text)],
            cascades: vec![],
        },
    }
}

pub fn classes() -> EntityDescriptor {
    EntityDescriptor {
        label: "Class",
        route: CLASSES,
        schema: FormSchema {
            entity: "classes",
            fields: vec![
                FieldSpec::required("name", FieldKind::Text),
                FieldSpec::required("academic_year_id", FieldKind::Reference),
            ],
            cascades: vec![],
        },
    }
}

pub fn sections() -> EntityDescriptor {
    EntityDescriptor {
        label: "Section",
        route: SECTIONS,
        schema: FormSchema {
            entity: "sections",
            fields: vec![
                FieldSpec::required("name", FieldKind::Text),
                FieldSpec::required("class_id", FieldKind::Reference),
            ],
            cascades: vec![],
        },
    }
}

pub fn students() -> EntityDescriptor {
    EntityDescriptor {
        label: "Student",
        route: STUDENTS,
        schema: FormSchema {
            entity: "students",
            fields: vec![
                FieldSpec::required("name", FieldKind::Text),
                FieldSpec::required("roll_number", FieldKind::Text),
                FieldSpec::required("father_name", FieldKind::Text),
                FieldSpec::required("mother_name", FieldKind::Text),
                FieldSpec::required("date_of_birth", FieldKind::Date),
                FieldSpec::required("contact", FieldKind::Text),
                FieldSpec::required("address", FieldKind::Text),
                FieldSpec::required("enrollment_date", FieldKind::Date),
                FieldSpec::optional("tuition_fees", FieldKind::NonNegativeInt),
                FieldSpec::optional("auto_fees", FieldKind::NonNegativeInt),
                FieldSpec::optional("day_boarding_fees", FieldKind::NonNegativeInt),
                FieldSpec::required("class_id", FieldKind::Reference),
                FieldSpec::required("section_id", FieldKind::Reference),
                FieldSpec::required("academic_year_id", FieldKind::Reference),
            ],
            // Choosing a class invalidates the section choice and re-scopes
            // the section options to the new class.
            cascades: vec![Cascade {
                parent: "class_id",
                child: "section_id",
                child_route: SECTIONS,
                query_param: "class_id",
            }],
        },
    }
}

pub fn fee_payments() -> EntityDescriptor {
    EntityDescriptor {
        label: "Payment",
        route: FEE_PAYMENTS,
        schema: FormSchema {
            entity: "fee_payments",
            fields: vec![
                FieldSpec::required("student_id", FieldKind::Reference),
                FieldSpec::required("month", FieldKind::Month).with_default("JAN"),
                FieldSpec::optional("tuition_fees", FieldKind::NonNegativeInt),
                FieldSpec::optional("auto_fees", FieldKind::NonNegativeInt),
                FieldSpec::optional("day_boarding_fees", FieldKind::NonNegativeInt),
                FieldSpec::optional("receipt_number", FieldKind::Text),
            ],
            cascades: vec![],
        },
    }
}

pub fn transport_groups() -> EntityDescriptor {
    EntityDescriptor {
        label: "Auto",
        route: TRANSPORT,
        schema: FormSchema {
            entity: "auto_management",
            fields: vec![FieldSpec::required("name", FieldKind::Text)],
            cascades: vec![],
        },
    }
}
