// Wire types for the ReportPortal v1 REST API.
//
// Field names follow the service's camelCase JSON. Response types default
// every field the service may omit so that partial payloads still decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Envelopes ────────────────────────────────────────────────────────

/// Paged list envelope returned by search endpoints (`?filter.eq.name=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
}

/// `{ "id": … }` returned by every create endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCreated {
    pub id: i64,
}

/// `{ "message": … }` returned by update/delete endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCompletion {
    #[serde(default)]
    pub message: String,
}

// ── Dashboards ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub share: bool,
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub widgets: Vec<DashboardWidget>,
}

/// A widget slot on a dashboard: placement plus a reference to the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidget {
    #[serde(default)]
    pub widget_id: i64,
    #[serde(default)]
    pub share: bool,
    #[serde(default)]
    pub widget_name: String,
    #[serde(default)]
    pub widget_type: String,
    #[serde(default)]
    pub widget_size: WidgetSize,
    #[serde(default)]
    pub widget_position: WidgetPosition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSize {
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPosition {
    pub position_x: i64,
    pub position_y: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDashboard {
    pub name: String,
    pub description: String,
    pub share: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDashboard {
    pub name: String,
    pub description: String,
    pub share: bool,
}

/// Body of `PUT dashboard/{id}/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWidget {
    pub add_widget: DashboardWidget,
}

// ── Widgets ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub share: bool,
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub widget_type: String,
    #[serde(default)]
    pub content_parameters: WidgetContentParameters,
    #[serde(default)]
    pub applied_filters: Vec<Filter>,
    /// Rendered widget data. Not interpreted.
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetContentParameters {
    #[serde(default)]
    pub content_fields: Vec<String>,
    #[serde(default)]
    pub items_count: i64,
    #[serde(default)]
    pub widget_options: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWidget {
    pub name: String,
    pub description: String,
    pub share: bool,
    pub widget_type: String,
    pub content_parameters: WidgetContentParameters,
    #[serde(rename = "filterIds")]
    pub filter_ids: Vec<i64>,
}

// ── Filters ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub share: bool,
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub filter_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub conditions: Vec<FilterCondition>,
    #[serde(default)]
    pub orders: Vec<FilterOrder>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub filtering_field: String,
    pub condition: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOrder {
    pub sorting_column: String,
    pub is_asc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFilter {
    pub share: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub filter_type: String,
    pub description: String,
    pub conditions: Vec<FilterCondition>,
    pub orders: Vec<FilterOrder>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFilter {
    pub share: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub filter_type: String,
    pub description: String,
    pub conditions: Vec<FilterCondition>,
    pub orders: Vec<FilterOrder>,
}

// ── Project settings ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(rename = "project", default)]
    pub project_id: i64,
    /// Issue sub-types grouped by their parent type (`SYSTEM_ISSUE`, …).
    #[serde(default)]
    pub sub_types: BTreeMap<String, Vec<IssueSubType>>,
}

/// A defect category. `locator` is generated per project instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSubType {
    #[serde(default)]
    pub id: i64,
    pub locator: String,
    #[serde(default)]
    pub type_ref: String,
    #[serde(default)]
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub color: String,
}
