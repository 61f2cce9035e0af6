// ── Wire-to-domain conversions ──
//
// Bridges `rpdac_api::types` records and `rpdac_core::model` objects.
// Everything written to the service is sent with `share: true`.

use std::collections::BTreeMap;

use rpdac_api::types as api;

use crate::codec::{SubTypeMap, decode_fields, encode_fields};
use crate::error::CoreError;
use crate::model::{
    ContentParameters, Dashboard, Filter, FilterCondition, FilterOrder, Widget, WidgetPosition,
    WidgetSize,
};
use crate::naming::{local_widget_name, remote_widget_name};

// ── Filter ─────────────────────────────────────────────────────────

impl From<api::FilterCondition> for FilterCondition {
    fn from(c: api::FilterCondition) -> Self {
        Self {
            filtering_field: c.filtering_field,
            condition: c.condition,
            value: c.value,
        }
    }
}

impl From<&FilterCondition> for api::FilterCondition {
    fn from(c: &FilterCondition) -> Self {
        Self {
            filtering_field: c.filtering_field.clone(),
            condition: c.condition.clone(),
            value: c.value.clone(),
        }
    }
}

impl From<api::FilterOrder> for FilterOrder {
    fn from(o: api::FilterOrder) -> Self {
        Self {
            sorting_column: o.sorting_column,
            is_asc: o.is_asc,
        }
    }
}

impl From<&FilterOrder> for api::FilterOrder {
    fn from(o: &FilterOrder) -> Self {
        Self {
            sorting_column: o.sorting_column.clone(),
            is_asc: o.is_asc,
        }
    }
}

/// Materialize a remote filter; the record becomes the origin.
impl From<api::Filter> for Filter {
    fn from(record: api::Filter) -> Self {
        Self {
            name: record.name.clone(),
            filter_type: record.filter_type.clone(),
            description: record.description.clone(),
            conditions: Some(record.conditions.iter().cloned().map(Into::into).collect()),
            orders: Some(record.orders.iter().cloned().map(Into::into).collect()),
            origin: Some(record),
        }
    }
}

fn wire_conditions(f: &Filter) -> Vec<api::FilterCondition> {
    f.conditions.iter().flatten().map(Into::into).collect()
}

fn wire_orders(f: &Filter) -> Vec<api::FilterOrder> {
    f.orders.iter().flatten().map(Into::into).collect()
}

impl From<&Filter> for api::NewFilter {
    fn from(f: &Filter) -> Self {
        Self {
            share: true,
            name: f.name.clone(),
            filter_type: f.filter_type.clone(),
            description: f.description.clone(),
            conditions: wire_conditions(f),
            orders: wire_orders(f),
        }
    }
}

impl From<&Filter> for api::UpdateFilter {
    fn from(f: &Filter) -> Self {
        Self {
            share: true,
            name: f.name.clone(),
            filter_type: f.filter_type.clone(),
            description: f.description.clone(),
            conditions: wire_conditions(f),
            orders: wire_orders(f),
        }
    }
}

// ── Dashboard ──────────────────────────────────────────────────────

impl From<&Dashboard> for api::NewDashboard {
    fn from(d: &Dashboard) -> Self {
        Self {
            name: d.name.clone(),
            description: d.description.clone(),
            share: true,
        }
    }
}

impl From<&Dashboard> for api::UpdateDashboard {
    fn from(d: &Dashboard) -> Self {
        Self {
            name: d.name.clone(),
            description: d.description.clone(),
            share: true,
        }
    }
}

impl From<api::WidgetSize> for WidgetSize {
    fn from(s: api::WidgetSize) -> Self {
        Self {
            width: s.width,
            height: s.height,
        }
    }
}

impl From<WidgetSize> for api::WidgetSize {
    fn from(s: WidgetSize) -> Self {
        Self {
            width: s.width,
            height: s.height,
        }
    }
}

impl From<api::WidgetPosition> for WidgetPosition {
    fn from(p: api::WidgetPosition) -> Self {
        Self {
            position_x: p.position_x,
            position_y: p.position_y,
        }
    }
}

impl From<WidgetPosition> for api::WidgetPosition {
    fn from(p: WidgetPosition) -> Self {
        Self {
            position_x: p.position_x,
            position_y: p.position_y,
        }
    }
}

// ── Widget ─────────────────────────────────────────────────────────

/// Materialize a remote widget placed on a dashboard.
///
/// Strips the dashboard suffix from the name, decodes sub-type locators and
/// replaces applied filters by their names. The record becomes the origin.
pub fn widget_from_remote(
    record: api::Widget,
    slot: &api::DashboardWidget,
    dashboard_hash: &str,
    decode_map: &SubTypeMap,
) -> Result<Widget, CoreError> {
    let content_fields = decode_fields(&record.content_parameters.content_fields, decode_map)?;

    Ok(Widget {
        name: local_widget_name(&record.name, dashboard_hash).to_owned(),
        description: record.description.clone(),
        widget_type: record.widget_type.clone(),
        widget_size: slot.widget_size.into(),
        widget_position: slot.widget_position.into(),
        filters: Some(
            record
                .applied_filters
                .iter()
                .map(|f| f.name.clone())
                .collect(),
        ),
        content_parameters: ContentParameters {
            content_fields: Some(content_fields),
            items_count: record.content_parameters.items_count,
            widget_options: record.content_parameters.widget_options.clone(),
        },
        origin: Some(record),
    })
}

/// Build the create payload for a widget of the dashboard with the given
/// hash. Every filter name must be present in `filter_ids`.
pub fn new_widget(
    widget: &Widget,
    dashboard_hash: &str,
    filter_ids: &BTreeMap<String, i64>,
    encode_map: &SubTypeMap,
) -> Result<api::NewWidget, CoreError> {
    let filter_ids = widget
        .filters()
        .iter()
        .map(|name| {
            filter_ids
                .get(name)
                .copied()
                .ok_or_else(|| CoreError::FilterNotResolved {
                    filter: name.clone(),
                    widget: widget.name.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let content_fields = encode_fields(widget.content_parameters.content_fields(), encode_map)?;

    Ok(api::NewWidget {
        name: remote_widget_name(&widget.name, dashboard_hash),
        description: widget.description.clone(),
        share: true,
        widget_type: widget.widget_type.clone(),
        content_parameters: api::WidgetContentParameters {
            content_fields,
            items_count: widget.content_parameters.items_count,
            widget_options: widget.content_parameters.widget_options.clone(),
        },
        filter_ids,
    })
}

/// Placement of a created widget on its dashboard. Uses the local name.
pub fn dashboard_slot(widget: &Widget, widget_id: i64) -> api::DashboardWidget {
    api::DashboardWidget {
        widget_id,
        share: true,
        widget_name: widget.name.clone(),
        widget_type: widget.widget_type.clone(),
        widget_size: widget.widget_size.into(),
        widget_position: widget.widget_position.into(),
    }
}
