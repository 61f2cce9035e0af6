#![allow(clippy::unwrap_used)]
// Reconciliation scenarios against a wiremock ReportPortal.

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rpdac_api::ReportPortalClient;
use rpdac_core::reconcile::load_file;
use rpdac_core::{
    AnyObject, CoreError, Kind, Object, ObjectService, Outcome, Reconciler, error_chain,
};

const PROJECT: &str = "test_project";

const D1: &str = r#"
kind: Dashboard
name: D1
description: ""
widgets:
  - name: W1
    description: ""
    widgetType: statisticTrend
    widgetSize: { width: 12, height: 6 }
    widgetPosition: { positionX: 0, positionY: 0 }
    filters: [F1]
    contentParameters:
      contentFields:
        - statistics$executions$passed
        - statistics$defects$system_issue$KCC
      itemsCount: 168
      widgetOptions:
        timeline: launch
"#;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Reconciler) {
    let server = MockServer::start().await;
    let client = ReportPortalClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, Reconciler::new(Arc::new(client)))
}

fn project_path(suffix: &str) -> String {
    format!("/api/v1/{PROJECT}/{suffix}")
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn d1() -> AnyObject {
    AnyObject::from_yaml(D1).unwrap()
}

fn settings() -> Value {
    json!({
        "project": 4,
        "subTypes": {
            "SYSTEM_ISSUE": [
                { "id": 5, "locator": "si001", "typeRef": "SYSTEM_ISSUE",
                  "longName": "System Issue", "shortName": "SI", "color": "#0274d1" },
                { "id": 12, "locator": "si_1iuqflmhg6hk6", "typeRef": "SYSTEM_ISSUE",
                  "longName": "Kafka Cluster at Capacity", "shortName": "KCC", "color": "#00b0ff" }
            ]
        }
    })
}

fn filter_f1() -> Value {
    json!({
        "owner": "dbizzarr",
        "share": true,
        "id": 2,
        "name": "F1",
        "type": "Launch",
        "description": "",
        "conditions": [ { "filteringField": "name", "condition": "eq", "value": "mk-e2e-test-suite" } ],
        "orders": [ { "sortingColumn": "startTime", "isAsc": false } ]
    })
}

fn remote_d1(description: &str, widget_id: i64, widget_name: &str) -> Value {
    json!({
        "owner": "dbizzarr",
        "share": true,
        "id": 1,
        "name": "D1",
        "description": description,
        "widgets": [{
            "widgetName": widget_name,
            "widgetId": widget_id,
            "widgetType": "statisticTrend",
            "widgetSize": { "width": 12, "height": 6 },
            "widgetPosition": { "positionX": 0, "positionY": 0 },
            "share": true
        }]
    })
}

fn remote_w1(id: i64) -> Value {
    json!({
        "description": "",
        "owner": "dbizzarr",
        "share": true,
        "id": id,
        "name": "W1 #cc9a",
        "widgetType": "statisticTrend",
        "contentParameters": {
            "contentFields": [
                "statistics$executions$passed",
                "statistics$defects$system_issue$si_1iuqflmhg6hk6"
            ],
            "itemsCount": 168,
            "widgetOptions": { "timeline": "launch" }
        },
        "appliedFilters": [filter_f1()],
        "content": null
    })
}

fn new_w1_body() -> Value {
    json!({
        "name": "W1 #cc9a",
        "description": "",
        "share": true,
        "widgetType": "statisticTrend",
        "contentParameters": {
            "contentFields": [
                "statistics$executions$passed",
                "statistics$defects$system_issue$si_1iuqflmhg6hk6"
            ],
            "itemsCount": 168,
            "widgetOptions": { "timeline": "launch" }
        },
        "filterIds": [2]
    })
}

fn add_w1_body(widget_id: i64) -> Value {
    json!({
        "addWidget": {
            "widgetId": widget_id,
            "share": true,
            "widgetName": "W1",
            "widgetType": "statisticTrend",
            "widgetSize": { "width": 12, "height": 6 },
            "widgetPosition": { "positionX": 0, "positionY": 0 }
        }
    })
}

async fn mount_dashboard_lookup(server: &MockServer, name: &str, content: Value) {
    Mock::given(method("GET"))
        .and(path(project_path("dashboard")))
        .and(query_param("filter.eq.name", name))
        .respond_with(ok(json!({ "content": content })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_filter_lookup(server: &MockServer, name: &str, content: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(project_path("filter")))
        .and(query_param("filter.eq.name", name))
        .respond_with(ok(json!({ "content": content })))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_settings(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path(project_path("settings")))
        .respond_with(ok(settings()))
        .expect(times)
        .mount(server)
        .await;
}

/// Fail the test if any mutating call reaches the server.
async fn forbid_writes(server: &MockServer) {
    for verb in ["POST", "PUT", "DELETE"] {
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }
}

// ── Dashboard scenarios ─────────────────────────────────────────────

#[tokio::test]
async fn test_apply_dashboard_creates_when_missing() {
    let (server, reconciler) = setup().await;

    mount_dashboard_lookup(&server, "D1", json!([])).await;
    mount_filter_lookup(&server, "F1", json!([filter_f1()]), 1).await;
    mount_settings(&server, 1).await;

    Mock::given(method("POST"))
        .and(path(project_path("dashboard")))
        .and(body_json(json!({ "name": "D1", "description": "", "share": true })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(project_path("widget")))
        .and(body_json(new_w1_body()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 3 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(project_path("dashboard/1/add")))
        .and(body_json(add_w1_body(3)))
        .respond_with(ok(json!({ "message": "added" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler.apply_object(PROJECT, &d1()).await.unwrap();
    assert_eq!(outcome, Outcome::Created);
}

#[tokio::test]
async fn test_apply_dashboard_skips_when_equal() {
    let (server, reconciler) = setup().await;

    mount_dashboard_lookup(&server, "D1", json!([remote_d1("", 3, "W1")])).await;
    mount_settings(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(project_path("widget/3")))
        .respond_with(ok(remote_w1(3)))
        .expect(1)
        .mount(&server)
        .await;
    forbid_writes(&server).await;

    let outcome = reconciler.apply_object(PROJECT, &d1()).await.unwrap();
    assert_eq!(outcome, Outcome::Skipped);
}

#[tokio::test]
async fn test_fetched_dashboard_equals_its_definition() {
    let (server, reconciler) = setup().await;

    mount_dashboard_lookup(&server, "D1", json!([remote_d1("", 3, "W1")])).await;
    mount_settings(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(project_path("widget/3")))
        .respond_with(ok(remote_w1(3)))
        .mount(&server)
        .await;

    let fetched = reconciler
        .dashboards()
        .get_by_name(PROJECT, "D1")
        .await
        .unwrap()
        .unwrap();

    let AnyObject::Dashboard(target) = d1() else {
        panic!("expected a dashboard");
    };
    assert!(fetched.equals(&target));
    assert_eq!(fetched.remote_id(), Some(1));
    assert_eq!(fetched.widgets()[0].name, "W1");
    assert_eq!(fetched.widgets()[0].remote_id(), Some(3));
}

#[tokio::test]
async fn test_apply_dashboard_updates_by_recreating_widgets() {
    let (server, reconciler) = setup().await;

    mount_dashboard_lookup(&server, "D1", json!([remote_d1("old description", 2, "W1")])).await;
    Mock::given(method("GET"))
        .and(path(project_path("widget/2")))
        .respond_with(ok(remote_w1(2)))
        .expect(1)
        .mount(&server)
        .await;
    // Once to materialize the current dashboard, once to encode the target.
    mount_settings(&server, 2).await;
    mount_filter_lookup(&server, "F1", json!([filter_f1()]), 1).await;

    Mock::given(method("DELETE"))
        .and(path(project_path("dashboard/1/2")))
        .respond_with(ok(json!({ "message": "removed" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(project_path("dashboard/1")))
        .and(body_json(json!({ "name": "D1", "description": "", "share": true })))
        .respond_with(ok(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(project_path("widget")))
        .and(body_json(new_w1_body()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(project_path("dashboard/1/add")))
        .and(body_json(add_w1_body(7)))
        .respond_with(ok(json!({ "message": "added" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler.apply_object(PROJECT, &d1()).await.unwrap();
    assert_eq!(outcome, Outcome::Updated);
}

#[tokio::test]
async fn test_unknown_filter_aborts_before_any_write() {
    let (server, reconciler) = setup().await;

    mount_dashboard_lookup(&server, "D1", json!([])).await;
    mount_filter_lookup(&server, "F1", json!([]), 1).await;
    forbid_writes(&server).await;

    let err = reconciler.apply_object(PROJECT, &d1()).await.unwrap_err();
    assert!(
        matches!(&err, CoreError::FilterNotResolved { filter, widget } if filter == "F1" && widget == "W1"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_lookup_failure_is_not_treated_as_missing() {
    let (server, reconciler) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("dashboard")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errorCode": 5000,
            "message": "Unclassified error"
        })))
        .mount(&server)
        .await;
    forbid_writes(&server).await;

    let err = reconciler.apply_object(PROJECT, &d1()).await.unwrap_err();
    assert!(matches!(err, CoreError::Remote { .. }), "got: {err:?}");
    assert!(!err.is_not_found());
}

// ── Filter scenarios ────────────────────────────────────────────────

fn f1_definition(value: &str) -> AnyObject {
    AnyObject::from_yaml(&format!(
        r#"
kind: Filter
name: F1
type: Launch
description: ""
conditions:
  - {{ filteringField: name, condition: eq, value: {value} }}
orders:
  - {{ sortingColumn: startTime, isAsc: false }}
"#
    ))
    .unwrap()
}

#[tokio::test]
async fn test_apply_filter_creates_shared_filter() {
    let (server, reconciler) = setup().await;

    mount_filter_lookup(&server, "F1", json!([]), 1).await;
    Mock::given(method("POST"))
        .and(path(project_path("filter")))
        .and(body_json(json!({
            "share": true,
            "name": "F1",
            "type": "Launch",
            "description": "",
            "conditions": [ { "filteringField": "name", "condition": "eq", "value": "mk-e2e-test-suite" } ],
            "orders": [ { "sortingColumn": "startTime", "isAsc": false } ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 2 })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler
        .apply_object(PROJECT, &f1_definition("mk-e2e-test-suite"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Created);
}

#[tokio::test]
async fn test_apply_filter_skips_when_equal() {
    let (server, reconciler) = setup().await;

    mount_filter_lookup(&server, "F1", json!([filter_f1()]), 1).await;
    forbid_writes(&server).await;

    let outcome = reconciler
        .apply_object(PROJECT, &f1_definition("mk-e2e-test-suite"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped);
}

#[tokio::test]
async fn test_apply_filter_updates_by_origin_id() {
    let (server, reconciler) = setup().await;

    mount_filter_lookup(&server, "F1", json!([filter_f1()]), 1).await;
    Mock::given(method("PUT"))
        .and(path(project_path("filter/2")))
        .and(body_json(json!({
            "share": true,
            "name": "F1",
            "type": "Launch",
            "description": "",
            "conditions": [ { "filteringField": "name", "condition": "eq", "value": "nightly" } ],
            "orders": [ { "sortingColumn": "startTime", "isAsc": false } ]
        })))
        .respond_with(ok(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = reconciler
        .apply_object(PROJECT, &f1_definition("nightly"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Updated);
}

// ── Batch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_continues_past_unsupported_kind() {
    let (server, reconciler) = setup().await;
    let dir = tempfile::tempdir().unwrap();

    fs::write(
        dir.path().join("1-first.yml"),
        "kind: Filter\nname: first\ntype: Launch\nconditions: []\norders: []\n",
    )
    .unwrap();
    fs::write(dir.path().join("2-launch.yml"), "kind: Launch\nname: nightly\n").unwrap();
    fs::write(
        dir.path().join("3-third.yaml"),
        "kind: Filter\nname: third\ntype: Launch\nconditions: []\norders: []\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not an object").unwrap();

    mount_filter_lookup(&server, "first", json!([]), 1).await;
    mount_filter_lookup(&server, "third", json!([]), 1).await;
    Mock::given(method("POST"))
        .and(path(project_path("filter")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 10 })))
        .expect(2)
        .mount(&server)
        .await;

    let err = reconciler
        .apply(PROJECT, dir.path(), true)
        .await
        .unwrap_err();

    let CoreError::BatchFailed {
        failed,
        total,
        report,
    } = err
    else {
        panic!("expected BatchFailed");
    };
    assert_eq!((failed, total), (1, 3));

    let names: Vec<_> = report
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["1-first.yml", "2-launch.yml", "3-third.yaml"]);

    assert_eq!(report.files[0].result.as_ref().unwrap().outcome, Outcome::Created);
    assert!(matches!(
        report.files[1].result,
        Err(CoreError::UnsupportedKind { ref kind, .. }) if kind == "Launch"
    ));
    let third = report.files[2].result.as_ref().unwrap();
    assert_eq!((third.kind, third.name.as_str()), (Kind::Filter, "third"));
}

#[tokio::test]
async fn test_batch_failure_names_the_unmapped_field() {
    let (server, reconciler) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("d1.yml"), D1).unwrap();

    mount_dashboard_lookup(&server, "D1", json!([])).await;
    mount_filter_lookup(&server, "F1", json!([filter_f1()]), 1).await;
    Mock::given(method("GET"))
        .and(path(project_path("settings")))
        .respond_with(ok(json!({ "project": 4, "subTypes": {} })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(project_path("dashboard")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(project_path("widget")))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = reconciler
        .apply(PROJECT, dir.path(), true)
        .await
        .unwrap_err();
    let CoreError::BatchFailed { report, .. } = err else {
        panic!("expected BatchFailed");
    };

    let failure = report.files[0].result.as_ref().unwrap_err();
    assert!(matches!(failure, CoreError::WidgetFailed { .. }), "got: {failure:?}");
    let message = error_chain(failure);
    assert!(message.contains("W1"), "got: {message}");
    assert!(
        message.contains("statistics$defects$system_issue$KCC"),
        "got: {message}"
    );
}

#[tokio::test]
async fn test_directory_requires_recursive_flag() {
    let (server, reconciler) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("f.yml"), "kind: Filter\nname: f\n").unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    forbid_writes(&server).await;

    let err = reconciler
        .apply(PROJECT, dir.path(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotRecursive { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_single_file_failure_is_returned_directly() {
    let (_server, reconciler) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("launch.yml");
    fs::write(&file, "kind: Launch\nname: nightly\n").unwrap();

    let err = reconciler.apply(PROJECT, &file, false).await.unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedKind { .. }), "got: {err:?}");
}

// ── Export / delete ─────────────────────────────────────────────────

#[tokio::test]
async fn test_export_writes_portable_definition() {
    let (server, reconciler) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("d1.yml");

    Mock::given(method("GET"))
        .and(path(project_path("dashboard/1")))
        .respond_with(ok(remote_d1("", 3, "W1 #cc9a")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(project_path("widget/3")))
        .respond_with(ok(remote_w1(3)))
        .expect(1)
        .mount(&server)
        .await;
    mount_settings(&server, 1).await;

    let exported = reconciler
        .export(Kind::Dashboard, PROJECT, 1, &file)
        .await
        .unwrap();

    let text = fs::read_to_string(&file).unwrap();
    assert!(text.starts_with("kind: Dashboard\n"), "got:\n{text}");
    assert!(text.contains("statistics$defects$system_issue$KCC"));
    assert!(!text.contains("#cc9a"));
    assert!(!text.contains("owner"));

    assert_eq!(load_file(&file).unwrap(), exported);
    assert_eq!(exported, d1());
}

#[tokio::test]
async fn test_delete_dashboard_by_name() {
    let (server, reconciler) = setup().await;

    mount_dashboard_lookup(
        &server,
        "D1",
        json!([{ "id": 1, "name": "D1", "description": "", "widgets": [] }]),
    )
    .await;
    mount_settings(&server, 1).await;
    Mock::given(method("DELETE"))
        .and(path(project_path("dashboard/1")))
        .respond_with(ok(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    reconciler
        .delete(Kind::Dashboard, PROJECT, "D1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_filter_is_not_found() {
    let (server, reconciler) = setup().await;

    mount_filter_lookup(&server, "ghost", json!([]), 1).await;
    forbid_writes(&server).await;

    let err = reconciler
        .delete(Kind::Filter, PROJECT, "ghost")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, CoreError::NotFound { kind: Kind::Filter, .. }));
}

#[tokio::test]
async fn test_create_file_skips_lookup() {
    let (server, reconciler) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("f1.yml");
    fs::write(&file, "kind: Filter\nname: F1\ntype: Launch\n").unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(project_path("filter")))
        .and(body_json(json!({
            "share": true,
            "name": "F1",
            "type": "Launch",
            "description": "",
            "conditions": [],
            "orders": []
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 5 })))
        .expect(1)
        .mount(&server)
        .await;

    let created = reconciler.create_file(PROJECT, &file).await.unwrap();
    assert_eq!(created.kind(), Kind::Filter);
    assert_eq!(created.name(), "F1");
}
