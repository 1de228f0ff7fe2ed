mod support;

use chrono::Utc;
use console_lib::screens::{classes_screen, sections_screen, TransportScreen};
use school_console_core::notify::Severity;
use serde_json::json;
use std::collections::BTreeSet;
use uuid::Uuid;

#[tokio::test]
async fn a_class_with_sections_refuses_to_be_deleted() {
    let (backend, _session) = support::signed_in().await;
    let (_, class, _) = support::seed_school(&backend);
    let now = Utc::now();

    let mut screen = classes_screen();
    screen.mount(&*backend, now).await;
    assert_eq!(screen.store.items().len(), 1);

    screen.request_delete(class);
    screen.confirm_delete(&*backend, now).await;

    let notice = screen.notifier.current(now).expect("error surfaced");
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.message.contains("still has sections"));
    // The collection was not invalidated into an empty list.
    assert_eq!(screen.store.items().len(), 1);
    assert_eq!(backend.count("classes"), 1);
}

#[tokio::test]
async fn a_section_pointing_at_a_missing_class_is_rejected() {
    let (backend, _session) = support::signed_in().await;
    support::seed_school(&backend);
    let now = Utc::now();

    let mut screen = sections_screen();
    screen.mount(&*backend, now).await;

    screen.open_create();
    screen.set_field("name", "B");
    screen.set_field("class_id", Uuid::new_v4().to_string());
    screen.submit(&*backend, now).await;

    let notice = screen.notifier.current(now).expect("error surfaced");
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.message.contains("missing record"));
    // The form stays open with the draft intact for correction.
    assert!(screen.form.is_open());
    assert_eq!(screen.form.field_value("name"), Some("B"));
    assert_eq!(backend.count("sections"), 1);
}

#[tokio::test]
async fn assigning_students_to_a_group_round_trips() {
    let (backend, _session) = support::signed_in().await;
    let chain = support::seed_school(&backend);
    let student = support::seed_student(&backend, chain, 1000, 200, 0);
    let now = Utc::now();

    let mut screen = TransportScreen::new();
    screen.mount(&*backend, now).await;
    assert!(screen.groups().is_empty());

    screen.open_create();
    screen.form.set_field("name", "Route 3");
    screen.submit(&*backend, now).await;
    assert_eq!(
        screen.notifier.current(now).expect("notice").message,
        "Auto created successfully!"
    );
    assert_eq!(screen.groups().len(), 1);
    let group = screen.groups()[0].id;
    assert!(screen.groups()[0].student_ids.is_empty());

    screen.begin_assignment(group);
    screen.toggle_student(student);
    screen.submit_assignment(&*backend, now).await;

    assert!(screen.assignment().is_none());
    assert_eq!(screen.groups()[0].student_ids, vec![student]);
    assert_eq!(
        screen.notifier.current(now).expect("notice").message,
        "Students assigned successfully!"
    );
}

#[tokio::test]
async fn assignment_of_an_unknown_student_keeps_the_draft() {
    let (backend, _session) = support::signed_in().await;
    let group = backend.seed("auto-management", json!({ "name": "Route 1" }));
    let ghost = Uuid::new_v4();
    let now = Utc::now();

    let mut screen = TransportScreen::new();
    screen.mount(&*backend, now).await;

    screen.begin_assignment(group);
    screen.toggle_student(ghost);
    screen.submit_assignment(&*backend, now).await;

    let notice = screen.notifier.current(now).expect("error surfaced");
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.message.contains("does not exist"));
    // Selection survives for correction.
    let draft = screen.assignment().expect("draft retained");
    assert_eq!(draft.selected, BTreeSet::from([ghost]));
    assert!(screen.groups()[0].student_ids.is_empty());
}

#[tokio::test]
async fn reselecting_an_assigned_student_unchecks_them() {
    let (backend, _session) = support::signed_in().await;
    let chain = support::seed_school(&backend);
    let student = support::seed_student(&backend, chain, 500, 0, 0);
    let group = backend.seed(
        "auto-management",
        json!({ "name": "Route 2", "student_ids": [student.to_string()] }),
    );
    let now = Utc::now();

    let mut screen = TransportScreen::new();
    screen.mount(&*backend, now).await;
    assert_eq!(screen.groups()[0].student_ids, vec![student]);

    // Already-assigned students start checked.
    screen.begin_assignment(group);
    assert!(screen.assignment().expect("draft").selected.contains(&student));

    screen.toggle_student(student);
    screen.submit_assignment(&*backend, now).await;
    assert!(screen.groups()[0].student_ids.is_empty());
}
