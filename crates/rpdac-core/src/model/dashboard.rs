// ── Dashboard and widget domain types ──

use rpdac_api::types as api;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Kind;
use super::object::{AnyObject, Object};
use crate::equal::{SetMember, sets_equal};

/// A dashboard: a named, described set of widgets.
///
/// `widgets` is `None` when the file omits the key, which is not the same
/// as an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<Vec<Widget>>,

    #[serde(skip)]
    pub(crate) origin: Option<api::Dashboard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    /// Unique within the parent dashboard only.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub widget_type: String,
    #[serde(default)]
    pub widget_size: WidgetSize,
    #[serde(default)]
    pub widget_position: WidgetPosition,
    /// Filter names, resolved to ids on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<String>>,
    #[serde(default)]
    pub content_parameters: ContentParameters,

    #[serde(skip)]
    pub(crate) origin: Option<api::Widget>,
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_fields: Option<Vec<String>>,
    #[serde(default)]
    pub items_count: i64,
    /// Passed through to the service untouched.
    #[serde(default)]
    pub widget_options: Map<String, Value>,
}

impl Dashboard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The widgets, or an empty slice when none are declared.
    pub fn widgets(&self) -> &[Widget] {
        self.widgets.as_deref().unwrap_or_default()
    }

    /// The remote record this dashboard was materialized from.
    pub fn origin(&self) -> Option<&api::Dashboard> {
        self.origin.as_ref()
    }

    pub fn remote_id(&self) -> Option<i64> {
        self.origin.as_ref().map(|o| o.id)
    }

    pub fn with_origin(mut self, origin: api::Dashboard) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl Widget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn filters(&self) -> &[String] {
        self.filters.as_deref().unwrap_or_default()
    }

    pub fn origin(&self) -> Option<&api::Widget> {
        self.origin.as_ref()
    }

    pub fn remote_id(&self) -> Option<i64> {
        self.origin.as_ref().map(|o| o.id)
    }

    pub fn with_origin(mut self, origin: api::Widget) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Field-by-field comparison; `filters` and `content_fields` as sets.
    pub fn equals(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.widget_type == other.widget_type
            && self.widget_size == other.widget_size
            && self.widget_position == other.widget_position
            && sets_equal(self.filters.as_deref(), other.filters.as_deref())
            && self.content_parameters.equals(&other.content_parameters)
    }
}

impl ContentParameters {
    pub fn content_fields(&self) -> &[String] {
        self.content_fields.as_deref().unwrap_or_default()
    }

    pub fn equals(&self, other: &Self) -> bool {
        self.items_count == other.items_count
            && self.widget_options == other.widget_options
            && sets_equal(
                self.content_fields.as_deref(),
                other.content_fields.as_deref(),
            )
    }
}

impl SetMember for Widget {
    fn set_key(&self) -> String {
        self.name.clone()
    }

    fn same_as(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Object for Dashboard {
    const KIND: Kind = Kind::Dashboard;

    fn name(&self) -> &str {
        &self.name
    }

    /// Name, description and the widgets as a set keyed by widget name.
    fn equals(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && sets_equal(self.widgets.as_deref(), other.widgets.as_deref())
    }

    fn from_any(object: &AnyObject) -> Option<&Self> {
        match object {
            AnyObject::Dashboard(d) => Some(d),
            AnyObject::Filter(_) => None,
        }
    }
}

impl PartialEq for Dashboard {
    fn eq(&self, other: &Self) -> bool {
        Object::equals(self, other)
    }
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl PartialEq for ContentParameters {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}
