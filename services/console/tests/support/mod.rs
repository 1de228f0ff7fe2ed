//! Shared test support: an in-memory backend implementing the `Gateway` and
//! `AuthPort` ports with the same observable semantics as the real API —
//! server-assigned ids, referential-integrity rejections, derived payment
//! totals, 404s for missing records, bearer-session auth.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use school_console_core::ports::{
    AuthPort, EntityRoute, Gateway, GatewayError, GatewayResult,
};
use school_console_core::session::SessionContext;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const TOKEN: &str = "test-token";

#[derive(Default)]
struct Inner {
    /// route segment -> records (each a JSON object with an "id").
    collections: HashMap<String, Vec<Value>>,
    /// Force every authenticated call to answer 401.
    revoke_sessions: bool,
}

pub struct FakeBackend {
    inner: Mutex<Inner>,
    session: Arc<SessionContext>,
    username: String,
    password: String,
}

impl FakeBackend {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            session,
            username: "admin".to_string(),
            password: "secret".to_string(),
        }
    }

    /// Make every subsequent authenticated call fail with 401, as if the
    /// token had been invalidated server-side.
    pub fn revoke_sessions(&self) {
        self.inner.lock().unwrap().revoke_sessions = true;
    }

    /// Direct record count, bypassing the gateway (for assertions).
    pub fn count(&self, segment: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .collections
            .get(segment)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Seed a record directly, returning its id.
    pub fn seed(&self, segment: &str, mut record: Value) -> Uuid {
        let id = Uuid::new_v4();
        record["id"] = Value::from(id.to_string());
        self.inner
            .lock()
            .unwrap()
            .collections
            .entry(segment.to_string())
            .or_default()
            .push(record);
        id
    }

    fn check_auth(&self, inner: &Inner) -> GatewayResult<()> {
        if inner.revoke_sessions || self.session.bearer_token().as_deref() != Some(TOKEN) {
            self.session.expire();
            return Err(GatewayError::SessionExpired);
        }
        Ok(())
    }
}

fn field<'a>(record: &'a Value, name: &str) -> Option<&'a str> {
    record.get(name).and_then(Value::as_str)
}

fn record_id(record: &Value) -> Option<Uuid> {
    field(record, "id").and_then(|s| s.parse().ok())
}

fn exists(inner: &Inner, segment: &str, id: &str) -> bool {
    inner
        .collections
        .get(segment)
        .map(|records| records.iter().any(|r| field(r, "id") == Some(id)))
        .unwrap_or(false)
}

/// The referential checks the real backend performs on create/update.
fn check_references(inner: &Inner, segment: &str, body: &Value) -> GatewayResult<()> {
    let rules: &[(&str, &str)] = match segment {
        "classes" => &[("academic_year_id", "academic-years")],
        "sections" => &[("class_id", "classes")],
        "students" => &[
            ("class_id", "classes"),
            ("section_id", "sections"),
            ("academic_year_id", "academic-years"),
        ],
        "fee_payments" => &[("student_id", "students")],
        _ => &[],
    };
    for (fk, parent) in rules {
        let Some(value) = field(body, fk) else {
            return Err(GatewayError::rejected(format!("{fk} is required")));
        };
        if !exists(inner, parent, value) {
            return Err(GatewayError::rejected(format!(
                "{fk} references a missing record"
            )));
        }
    }
    Ok(())
}

/// Server-side field derivation on create/update.
fn derive_fields(segment: &str, record: &mut Map<String, Value>) {
    match segment {
        "academic-years" => {
            record
                .entry("status".to_string())
                .or_insert_with(|| Value::from("ACTIVE"));
        }
        "fee_payments" => {
            let total: i64 = ["tuition_fees", "auto_fees", "day_boarding_fees"]
                .iter()
                .map(|k| record.get(*k).and_then(Value::as_i64).unwrap_or(0))
                .sum();
            record.insert("total_amount".to_string(), Value::from(total));
            record
                .entry("transaction_date".to_string())
                .or_insert_with(|| Value::from(Utc::now().to_rfc3339()));
            record
                .entry("receipt_number".to_string())
                .or_insert(Value::Null);
        }
        _ => {}
    }
}

#[async_trait]
impl Gateway for FakeBackend {
    async fn list(
        &self,
        route: &EntityRoute,
        query: &[(String, String)],
    ) -> GatewayResult<Vec<Value>> {
        let inner = self.inner.lock().unwrap();
        self.check_auth(&inner)?;
        let mut records = inner
            .collections
            .get(route.segment())
            .cloned()
            .unwrap_or_default();
        for (key, value) in query {
            records.retain(|r| field(r, key) == Some(value.as_str()));
        }
        Ok(records)
    }

    async fn create(&self, route: &EntityRoute, body: Value) -> GatewayResult<Value> {
        let mut inner = self.inner.lock().unwrap();
        self.check_auth(&inner)?;
        check_references(&inner, route.segment(), &body)?;

        let Value::Object(mut record) = body else {
            return Err(GatewayError::rejected("body must be an object"));
        };
        record.insert("id".to_string(), Value::from(Uuid::new_v4().to_string()));
        derive_fields(route.segment(), &mut record);
        let record = Value::Object(record);
        inner
            .collections
            .entry(route.segment().to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, route: &EntityRoute, id: Uuid, body: Value) -> GatewayResult<Value> {
        let mut inner = self.inner.lock().unwrap();
        self.check_auth(&inner)?;
        check_references(&inner, route.segment(), &body)?;
        if !exists(&inner, route.segment(), &id.to_string()) {
            return Err(GatewayError::NotFound(format!("{} not found", id)));
        }

        let Value::Object(mut record) = body else {
            return Err(GatewayError::rejected("body must be an object"));
        };
        record.insert("id".to_string(), Value::from(id.to_string()));

        let records = inner
            .collections
            .get_mut(route.segment())
            .expect("collection exists");
        let slot = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .expect("record exists");
        // PUT replaces the record but server-owned fields survive.
        for owned in ["status", "transaction_date"] {
            if let Some(value) = slot.get(owned).cloned() {
                record.entry(owned.to_string()).or_insert(value);
            }
        }
        derive_fields(route.segment(), &mut record);
        *slot = Value::Object(record);
        Ok(slot.clone())
    }

    async fn patch(&self, route: &EntityRoute, id: Uuid, body: Value) -> GatewayResult<Value> {
        let mut inner = self.inner.lock().unwrap();
        self.check_auth(&inner)?;
        let records = inner
            .collections
            .get_mut(route.segment())
            .ok_or_else(|| GatewayError::NotFound(format!("{} not found", id)))?;
        let slot = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| GatewayError::NotFound(format!("{} not found", id)))?;
        if let (Value::Object(slot), Value::Object(patch)) = (&mut *slot, &body) {
            for (key, value) in patch {
                slot.insert(key.clone(), value.clone());
            }
        }
        Ok(slot.clone())
    }

    async fn delete(&self, route: &EntityRoute, id: Uuid) -> GatewayResult<()> {
        let mut inner = self.inner.lock().unwrap();
        self.check_auth(&inner)?;

        // The one dependent-delete rule the scenarios need: a class with
        // sections cannot go.
        if route.segment() == "classes" {
            let class_id = id.to_string();
            let has_sections = inner
                .collections
                .get("sections")
                .map(|s| s.iter().any(|r| field(r, "class_id") == Some(class_id.as_str())))
                .unwrap_or(false);
            if has_sections {
                return Err(GatewayError::rejected(
                    "Cannot delete a class that still has sections",
                ));
            }
        }

        let records = inner
            .collections
            .get_mut(route.segment())
            .ok_or_else(|| GatewayError::NotFound(format!("{} not found", id)))?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(GatewayError::NotFound(format!("{} not found", id)));
        }
        Ok(())
    }

    async fn post_action(
        &self,
        route: &EntityRoute,
        id: Uuid,
        action: &str,
        body: Value,
    ) -> GatewayResult<Value> {
        let mut inner = self.inner.lock().unwrap();
        self.check_auth(&inner)?;
        if route.segment() != "auto-management" || action != "assign-students" {
            return Err(GatewayError::NotFound(format!("{action} not found")));
        }
        let Value::Array(ids) = &body else {
            return Err(GatewayError::rejected("expected a raw array of student ids"));
        };
        for student in ids {
            let Some(student) = student.as_str() else {
                return Err(GatewayError::rejected("student ids must be strings"));
            };
            if !exists(&inner, "students", student) {
                return Err(GatewayError::rejected(format!(
                    "student {student} does not exist"
                )));
            }
        }
        let records = inner
            .collections
            .get_mut("auto-management")
            .ok_or_else(|| GatewayError::NotFound(format!("{} not found", id)))?;
        let slot = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| GatewayError::NotFound(format!("{} not found", id)))?;
        slot["student_ids"] = body;
        Ok(slot.clone())
    }

    async fn fetch(&self, path: &str) -> GatewayResult<Value> {
        let inner = self.inner.lock().unwrap();
        self.check_auth(&inner)?;
        match path {
            "/auto-management/with-students" => Ok(Value::Array(
                inner
                    .collections
                    .get("auto-management")
                    .cloned()
                    .unwrap_or_default(),
            )),
            "/dashboard/" => Ok(dashboard(&inner)),
            _ => Err(GatewayError::NotFound(path.to_string())),
        }
    }
}

/// The dashboard the real backend computes: totals plus a per-student
/// breakdown for students having at least one payment.
fn dashboard(inner: &Inner) -> Value {
    let students = inner.collections.get("students").cloned().unwrap_or_default();
    let payments = inner
        .collections
        .get("fee_payments")
        .cloned()
        .unwrap_or_default();

    let total_payments: i64 = payments
        .iter()
        .filter_map(|p| p.get("total_amount").and_then(Value::as_i64))
        .sum();

    let mut rows = Vec::new();
    let mut total_dues = 0;
    for student in &students {
        let sid = field(student, "id").unwrap_or_default();
        let paid: i64 = payments
            .iter()
            .filter(|p| field(p, "student_id") == Some(sid))
            .filter_map(|p| p.get("total_amount").and_then(Value::as_i64))
            .sum();
        let has_payment = payments.iter().any(|p| field(p, "student_id") == Some(sid));
        if !has_payment {
            continue;
        }
        let expected: i64 = ["tuition_fees", "auto_fees", "day_boarding_fees"]
            .iter()
            .map(|k| student.get(*k).and_then(Value::as_i64).unwrap_or(0))
            .sum();
        let balance = expected - paid;
        total_dues += balance;
        rows.push(json!({
            "id": sid,
            "name": field(student, "name").unwrap_or_default(),
            "total_paid": paid,
            "total_balance": balance,
            "payment_status": if balance <= 0 { "Paid" } else { "Pending" },
        }));
    }

    json!({
        "total_students": students.len(),
        "total_payments": total_payments,
        "total_dues": total_dues,
        "students_with_payments": rows,
    })
}

#[async_trait]
impl AuthPort for FakeBackend {
    async fn login(&self, username: &str, password: &str) -> GatewayResult<String> {
        if username != self.username || password != self.password {
            return Err(GatewayError::rejected("LOGIN_BAD_CREDENTIALS"));
        }
        self.session.sign_in(TOKEN.to_string());
        Ok(TOKEN.to_string())
    }

    async fn logout(&self) -> GatewayResult<()> {
        self.session.sign_out();
        Ok(())
    }
}

/// A logged-in backend plus its session, the starting point of most tests.
pub async fn signed_in() -> (Arc<FakeBackend>, Arc<SessionContext>) {
    let session = Arc::new(SessionContext::new());
    let backend = Arc::new(FakeBackend::new(session.clone()));
    backend
        .login("admin", "secret")
        .await
        .expect("test login succeeds");
    (backend, session)
}

/// Seed one academic year / class / section chain and return the ids.
pub fn seed_school(backend: &FakeBackend) -> (Uuid, Uuid, Uuid) {
    let year = backend.seed("academic-years", json!({ "year": "2025", "status": "ACTIVE" }));
    let class = backend.seed(
        "classes",
        json!({ "name": "Grade 5", "academic_year_id": year.to_string() }),
    );
    let section = backend.seed(
        "sections",
        json!({ "name": "A", "class_id": class.to_string() }),
    );
    (year, class, section)
}

/// Seed a student in the given chain with the given expected fees.
pub fn seed_student(
    backend: &FakeBackend,
    (year, class, section): (Uuid, Uuid, Uuid),
    tuition: i64,
    auto: i64,
    day_boarding: i64,
) -> Uuid {
    backend.seed(
        "students",
        json!({
            "name": "Asha Verma",
            "roll_number": "17",
            "father_name": "R Verma",
            "mother_name": "S Verma",
            "date_of_birth": "2015-06-01",
            "contact": "9999999999",
            "address": "12 School Road",
            "enrollment_date": "2025-04-01",
            "tuition_fees": tuition,
            "auto_fees": auto,
            "day_boarding_fees": day_boarding,
            "class_id": class.to_string(),
            "section_id": section.to_string(),
            "academic_year_id": year.to_string(),
        }),
    )
}
