#![allow(clippy::unwrap_used)]
// Integration tests for `ReportPortalClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rpdac_api::types::{DashboardWidget, NewDashboard, NewWidget, WidgetPosition, WidgetSize};
use rpdac_api::{Error, ReportPortalClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ReportPortalClient) {
    let server = MockServer::start().await;
    let client = ReportPortalClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn project_path(suffix: &str) -> String {
    format!("/api/v1/test_project/{suffix}")
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    let token: secrecy::SecretString = "s3cr3t".to_string().into();
    let client =
        ReportPortalClient::from_token(&server.uri(), &token, &TransportConfig::default()).unwrap();

    Mock::given(method("GET"))
        .and(path(project_path("settings")))
        .and(header("authorization", "Bearer s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "project": 4,
            "subTypes": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = client.get_project_settings("test_project").await.unwrap();
    assert_eq!(settings.project_id, 4);
}

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("dashboard/1")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_token",
            "error_description": "Invalid access token"
        })))
        .mount(&server)
        .await;

    let result = client.get_dashboard("test_project", 1).await;
    assert!(
        matches!(result, Err(Error::InvalidToken)),
        "expected InvalidToken, got: {result:?}"
    );
}

// ── Dashboards ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_dashboard_by_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("dashboard")))
        .and(query_param("filter.eq.name", "MK E2E Tests Overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "owner": "dbizzarr",
                "share": true,
                "id": 1,
                "name": "MK E2E Tests Overview",
                "description": "",
                "widgets": [{
                    "widgetName": "Unique bugs [Last 7 days] #9eaf",
                    "widgetId": 67,
                    "widgetType": "uniqueBugTable",
                    "widgetSize": { "width": 12, "height": 7 },
                    "widgetPosition": { "positionX": 0, "positionY": 44 },
                    "share": true
                }]
            }],
            "page": { "number": 1, "size": 20, "totalElements": 1, "totalPages": 1 }
        })))
        .mount(&server)
        .await;

    let dashboard = client
        .get_dashboard_by_name("test_project", "MK E2E Tests Overview")
        .await
        .unwrap();

    assert_eq!(dashboard.id, 1);
    assert_eq!(dashboard.widgets.len(), 1);
    assert_eq!(dashboard.widgets[0].widget_id, 67);
    assert_eq!(
        dashboard.widgets[0].widget_position,
        WidgetPosition {
            position_x: 0,
            position_y: 44
        }
    );
}

#[tokio::test]
async fn test_get_dashboard_by_name_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("dashboard")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let err = client
        .get_dashboard_by_name("test_project", "missing")
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

#[tokio::test]
async fn test_server_error_is_not_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("dashboard")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errorCode": 5000,
            "message": "Unclassified error"
        })))
        .mount(&server)
        .await;

    let err = client
        .get_dashboard_by_name("test_project", "any")
        .await
        .unwrap_err();

    assert!(!err.is_not_found());
    match err {
        Error::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 500);
            assert_eq!(code, Some(5000));
            assert_eq!(message, "Unclassified error");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_dashboard_returns_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(project_path("dashboard")))
        .and(body_json(json!({
            "name": "D1",
            "description": "",
            "share": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client
        .create_dashboard(
            "test_project",
            &NewDashboard {
                name: "D1".into(),
                description: String::new(),
                share: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(id, 42);
}

#[tokio::test]
async fn test_add_widget_wraps_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(project_path("dashboard/42/add")))
        .and(body_json(json!({
            "addWidget": {
                "widgetId": 7,
                "share": true,
                "widgetName": "W1",
                "widgetType": "statisticTrend",
                "widgetSize": { "width": 12, "height": 6 },
                "widgetPosition": { "positionX": 0, "positionY": 13 }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Widget with ID = '7' was successfully added to the dashboard with ID = '42'"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .add_widget_to_dashboard(
            "test_project",
            42,
            &DashboardWidget {
                widget_id: 7,
                share: true,
                widget_name: "W1".into(),
                widget_type: "statisticTrend".into(),
                widget_size: WidgetSize {
                    width: 12,
                    height: 6,
                },
                widget_position: WidgetPosition {
                    position_x: 0,
                    position_y: 13,
                },
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_widget_from_dashboard() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(project_path("dashboard/1/2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "removed" })))
        .expect(1)
        .mount(&server)
        .await;

    let done = client
        .remove_widget_from_dashboard("test_project", 1, 2)
        .await
        .unwrap();
    assert_eq!(done.message, "removed");
}

// ── Widgets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_widget_sends_filter_ids() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(project_path("widget")))
        .and(body_json(json!({
            "name": "W1 #9eaf",
            "description": "",
            "share": true,
            "widgetType": "uniqueBugTable",
            "contentParameters": {
                "contentFields": [],
                "itemsCount": 168,
                "widgetOptions": { "latest": false }
            },
            "filterIds": [2]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 67 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut widget = NewWidget {
        name: "W1 #9eaf".into(),
        share: true,
        widget_type: "uniqueBugTable".into(),
        filter_ids: vec![2],
        ..NewWidget::default()
    };
    widget.content_parameters.items_count = 168;
    widget
        .content_parameters
        .widget_options
        .insert("latest".into(), json!(false));

    let id = client.create_widget("test_project", &widget).await.unwrap();
    assert_eq!(id, 67);
}

#[tokio::test]
async fn test_malformed_body_keeps_preview() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("widget/3")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.get_widget("test_project", 3).await.unwrap_err();
    match err {
        Error::Deserialization { message, body } => {
            assert!(message.contains("body preview"));
            assert_eq!(body, "<html>oops</html>");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Filters ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_filter_by_name_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("filter")))
        .and(query_param("filter.eq.name", "mk-e2e-test-suite"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
        .mount(&server)
        .await;

    let err = client
        .get_filter_by_name("test_project", "mk-e2e-test-suite")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { resource: "filter", .. }));
}

#[tokio::test]
async fn test_filter_http_404_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(project_path("filter/99")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorCode": 40421,
            "message": "User filter with ID '99' not found"
        })))
        .mount(&server)
        .await;

    let err = client.get_filter("test_project", 99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.api_error_code(), Some(40421));
}
