//! crates/school_console_core/src/form.rs
//!
//! The Form Session: transient edit state for one entity instance. One
//! generic, schema-driven state machine replaces the per-entity form handling
//! the managers would otherwise each duplicate — a schema enumerates the
//! fields, their validators and defaults, and any cascading parent/child
//! relations, and the machine does the rest.
//!
//! States: Closed -> Open(Create | Edit) -> Submitting -> Closed on success,
//! or back to Open with the draft retained and field errors surfaced on
//! failure. Cancel discards the draft from any open state without a network
//! call.

use crate::domain::Month;
use crate::ports::{EntityRoute, FieldErrors, GatewayError};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

//=========================================================================================
// Schema
//=========================================================================================

/// How a field's raw input string is parsed and validated on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, trimmed before submission.
    Text,
    /// Must parse as a non-negative integer; an empty optional field
    /// submits as 0.
    NonNegativeInt,
    /// Must parse as `YYYY-MM-DD`.
    Date,
    /// Must be one of the twelve three-letter month codes.
    Month,
    /// Must parse as the UUID of a parent record.
    Reference,
}

/// One editable field of an entity form.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: "",
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: "",
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }
}

/// A parent/child dependency between two fields: choosing the parent clears
/// the child and scopes the child's option fetch to the new parent value.
#[derive(Debug, Clone)]
pub struct Cascade {
    pub parent: &'static str,
    pub child: &'static str,
    /// Collection the child's options come from.
    pub child_route: EntityRoute,
    /// Query key the parent value is sent under, e.g. `class_id`.
    pub query_param: &'static str,
}

/// The full form description for one entity type.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub entity: &'static str,
    pub fields: Vec<FieldSpec>,
    pub cascades: Vec<Cascade>,
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

//=========================================================================================
// Session State Machine
//=========================================================================================

/// Whether the draft creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

type Draft = BTreeMap<&'static str, String>;

enum FormState {
    Closed,
    Open {
        mode: FormMode,
        draft: Draft,
        field_errors: FieldErrors,
    },
    Submitting {
        mode: FormMode,
        draft: Draft,
    },
}

/// Directive to the owning screen: re-fetch the child field's options scoped
/// to the (possibly empty) new parent value.
#[derive(Debug, Clone)]
pub struct CascadeRequest {
    pub child: &'static str,
    pub route: EntityRoute,
    pub query_param: &'static str,
    pub parent_value: String,
}

/// The editable draft of a single entity instance.
pub struct FormSession {
    schema: FormSchema,
    state: FormState,
}

impl FormSession {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            state: FormState::Closed,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            FormState::Open { .. } | FormState::Submitting { .. }
        )
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting { .. })
    }

    pub fn mode(&self) -> Option<FormMode> {
        match &self.state {
            FormState::Closed => None,
            FormState::Open { mode, .. } | FormState::Submitting { mode, .. } => Some(*mode),
        }
    }

    /// Current raw value of one field, while the form is open.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        match &self.state {
            FormState::Closed => None,
            FormState::Open { draft, .. } | FormState::Submitting { draft, .. } => {
                draft.get(name).map(String::as_str)
            }
        }
    }

    /// Inline validation messages from the last failed submit attempt.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match &self.state {
            FormState::Open { field_errors, .. } if !field_errors.is_empty() => {
                Some(field_errors)
            }
            _ => None,
        }
    }

    /// Closed -> Open(Create), every field at its schema default.
    pub fn open_create(&mut self) {
        let draft = self
            .schema
            .fields
            .iter()
            .map(|f| (f.name, f.default.to_string()))
            .collect();
        self.state = FormState::Open {
            mode: FormMode::Create,
            draft,
            field_errors: FieldErrors::new(),
        };
    }

    /// Closed -> Open(Edit), fields pre-populated from the selected record.
    /// Date-kind fields keep only the date part of timestamp strings, the
    /// way the tables render them.
    pub fn open_edit(&mut self, id: Uuid, record: &Value) {
        let draft = self
            .schema
            .fields
            .iter()
            .map(|f| {
                let raw = match record.get(f.name) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    _ => String::new(),
                };
                let raw = match f.kind {
                    FieldKind::Date => raw.split('T').next().unwrap_or("").to_string(),
                    _ => raw,
                };
                (f.name, raw)
            })
            .collect();
        self.state = FormState::Open {
            mode: FormMode::Edit(id),
            draft,
            field_errors: FieldErrors::new(),
        };
    }

    /// Any open state -> Closed; the draft is discarded, nothing is sent.
    pub fn cancel(&mut self) {
        self.state = FormState::Closed;
    }

    /// Update one field. If the field is a cascade parent, its child field is
    /// cleared and a `CascadeRequest` tells the screen to re-scope the
    /// child's options. Ignored while closed or submitting.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Option<CascadeRequest> {
        let FormState::Open { draft, .. } = &mut self.state else {
            return None;
        };
        let Some(spec) = self.schema.fields.iter().find(|f| f.name == name) else {
            return None;
        };
        let value = value.into();
        draft.insert(spec.name, value.clone());

        let cascade = self.schema.cascades.iter().find(|c| c.parent == name)?;
        draft.insert(cascade.child, String::new());
        Some(CascadeRequest {
            child: cascade.child,
            route: cascade.child_route,
            query_param: cascade.query_param,
            parent_value: value,
        })
    }

    /// Validate the draft and, if it passes, move Open -> Submitting and hand
    /// the caller the payload to send. On validation failure the form stays
    /// open with inline errors and nothing is returned — no network call may
    /// be made.
    pub fn begin_submit(&mut self) -> Option<(FormMode, Value)> {
        let FormState::Open {
            mode,
            draft,
            field_errors,
        } = &mut self.state
        else {
            return None;
        };

        match build_payload(&self.schema, draft) {
            Ok(payload) => {
                let mode = *mode;
                let draft = std::mem::take(draft);
                self.state = FormState::Submitting { mode, draft };
                Some((mode, payload))
            }
            Err(errors) => {
                *field_errors = errors;
                None
            }
        }
    }

    /// Submitting -> Closed. The caller notifies and invalidates its store.
    pub fn succeed(&mut self) {
        self.state = FormState::Closed;
    }

    /// Submitting -> Open with the draft retained, so the user can retry
    /// without re-entering data. Server field errors surface inline.
    pub fn fail(&mut self, error: &GatewayError) {
        let FormState::Submitting { mode, draft } = &mut self.state else {
            return;
        };
        let mode = *mode;
        let draft = std::mem::take(draft);
        let field_errors = error.field_errors().cloned().unwrap_or_default();
        self.state = FormState::Open {
            mode,
            draft,
            field_errors,
        };
    }
}

//=========================================================================================
// Validation
//=========================================================================================

fn build_payload(schema: &FormSchema, draft: &Draft) -> Result<Value, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut payload = Map::new();

    for spec in &schema.fields {
        let raw = draft.get(spec.name).map(String::as_str).unwrap_or("");
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if spec.required {
                push_error(&mut errors, spec.name, "This field is required");
            } else if spec.kind == FieldKind::NonNegativeInt {
                payload.insert(spec.name.to_string(), Value::from(0));
            }
            continue;
        }

        match spec.kind {
            FieldKind::Text => {
                payload.insert(spec.name.to_string(), Value::from(trimmed));
            }
            FieldKind::NonNegativeInt => match trimmed.parse::<i64>() {
                Ok(n) if n >= 0 => {
                    payload.insert(spec.name.to_string(), Value::from(n));
                }
                _ => push_error(&mut errors, spec.name, "Must be a non-negative whole number"),
            },
            FieldKind::Date => match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                Ok(_) => {
                    payload.insert(spec.name.to_string(), Value::from(trimmed));
                }
                Err(_) => push_error(&mut errors, spec.name, "Must be a date (YYYY-MM-DD)"),
            },
            FieldKind::Month => match Month::parse(trimmed) {
                Some(month) => {
                    payload.insert(spec.name.to_string(), Value::from(month.as_str()));
                }
                None => push_error(&mut errors, spec.name, "Must be a three-letter month code"),
            },
            FieldKind::Reference => match trimmed.parse::<Uuid>() {
                Ok(id) => {
                    payload.insert(spec.name.to_string(), Value::from(id.to_string()));
                }
                Err(_) => push_error(&mut errors, spec.name, "Select a value"),
            },
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(payload))
    } else {
        Err(errors)
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}
