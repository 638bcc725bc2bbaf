//! Scheduler Constraint HTTP Tests
//!
//! Run with: `cargo test --test constraints_test -- --nocapture`

mod helpers;

use axum::http::{Method, StatusCode};
use helpers::{body_to_json, create_lecturer, create_program, login_as, unique};
use serde_json::json;
use serial_test::serial;
use studyplan_server::permissions::Role;
use uuid::Uuid;

/// "Max Hours Per Day", seeded by the initial migration.
const MAX_HOURS_PER_DAY: &str = "01900000-0000-7000-8000-000000000002";

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_constraint_types_are_seeded() {
    let app = helpers::fresh_test_app().await;
    let mut guard = app.cleanup_guard();
    let token = login_as(&app, &mut guard, Role::Student, None).await;

    let resp = app.send(Method::GET, "/api/constraint-types", &token, None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_to_json(resp).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    for expected in [
        "Avoid Gaps",
        "Lecturer Unavailable",
        "Max Hours Per Day",
        "Preferred Time Slot",
        "Room Type Required",
    ] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_admin_creates_global_constraint_with_defaults() {
    let app = helpers::fresh_test_app().await;
    let mut guard = app.cleanup_guard();
    let token = login_as(&app, &mut guard, Role::Admin, None).await;

    let resp = app
        .send(
            Method::POST,
            "/api/scheduler-constraints",
            &token,
            Some(json!({
                "constraint_type_id": MAX_HOURS_PER_DAY,
                "hardness": "Hard",
                "scope": "Global"
            })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_to_json(resp).await;
    let id: Uuid = json["id"].as_str().unwrap().parse().unwrap();
    guard.delete_row("scheduler_constraints", id);
    assert_eq!(json["hardness"], "hard");
    assert_eq!(json["scope"], "global");
    assert_eq!(json["weight"], 10);
    assert_eq!(json["config"], json!({}));
    assert_eq!(json["is_enabled"], true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_unknown_constraint_type_is_rejected() {
    let app = helpers::fresh_test_app().await;
    let mut guard = app.cleanup_guard();
    let token = login_as(&app, &mut guard, Role::Pm, None).await;

    let resp = app
        .send(
            Method::POST,
            "/api/scheduler-constraints",
            &token,
            Some(json!({
                "constraint_type_id": Uuid::now_v7(),
                "hardness": "soft",
                "scope": "global"
            })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_hosp_constraints_stay_in_own_programs() {
    let app = helpers::fresh_test_app().await;
    let mut guard = app.cleanup_guard();
    let head = create_lecturer(&app.pool, "Ken", "Thompson").await;
    let own = create_program(&app.pool, &unique("Unix"), "UNX", Some(head)).await;
    let foreign = create_program(&app.pool, &unique("Plan9"), "P9", None).await;
    let token = login_as(&app, &mut guard, Role::Hosp, Some(head)).await;

    // Global scope is reserved for administrators
    let resp = app
        .send(
            Method::POST,
            "/api/scheduler-constraints",
            &token,
            Some(json!({
                "constraint_type_id": MAX_HOURS_PER_DAY,
                "hardness": "soft",
                "scope": "global"
            })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .send(
            Method::POST,
            "/api/scheduler-constraints",
            &token,
            Some(json!({
                "constraint_type_id": MAX_HOURS_PER_DAY,
                "hardness": "soft",
                "weight": 3,
                "scope": "program",
                "target_id": own,
                "config": { "max_hours": 6 }
            })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let id: Uuid = body_to_json(resp).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    guard.delete_row("scheduler_constraints", id);
    guard.delete_program(own);
    guard.delete_program(foreign);
    guard.delete_lecturer(head);

    let uri = format!("/api/scheduler-constraints/{id}");
    let resp = app
        .send(Method::PUT, &uri, &token, Some(json!({ "weight": 5, "is_enabled": false })))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_to_json(resp).await;
    assert_eq!(json["weight"], 5);
    assert_eq!(json["is_enabled"], false);
    assert_eq!(json["config"], json!({ "max_hours": 6 }));

    let resp = app
        .send(Method::PUT, &uri, &token, Some(json!({ "target_id": foreign })))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_to_json(resp).await["error"], "CANNOT_RELOCATE");

    let resp = app.send(Method::DELETE, &uri, &token, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app.send(Method::DELETE, &uri, &token, None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_student_reads_but_cannot_write_constraints() {
    let app = helpers::fresh_test_app().await;
    let mut guard = app.cleanup_guard();
    let token = login_as(&app, &mut guard, Role::Student, None).await;

    let resp = app
        .send(Method::GET, "/api/scheduler-constraints", &token, None)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .send(
            Method::POST,
            "/api/scheduler-constraints",
            &token,
            Some(json!({
                "constraint_type_id": MAX_HOURS_PER_DAY,
                "hardness": "hard",
                "scope": "global"
            })),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
