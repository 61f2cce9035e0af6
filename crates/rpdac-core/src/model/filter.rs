// ── Filter domain types ──

use rpdac_api::types as api;
use serde::{Deserialize, Serialize};

use super::Kind;
use super::object::{AnyObject, Object};
use crate::equal::{SetMember, sets_equal};

/// A saved launch filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub filter_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<FilterCondition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<FilterOrder>>,

    #[serde(skip)]
    pub(crate) origin: Option<api::Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub filtering_field: String,
    pub condition: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOrder {
    pub sorting_column: String,
    pub is_asc: bool,
}

impl Filter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn origin(&self) -> Option<&api::Filter> {
        self.origin.as_ref()
    }

    pub fn remote_id(&self) -> Option<i64> {
        self.origin.as_ref().map(|o| o.id)
    }

    pub fn with_origin(mut self, origin: api::Filter) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl Object for Filter {
    const KIND: Kind = Kind::Filter;

    fn name(&self) -> &str {
        &self.name
    }

    // Orders are compared as a set, so a change of sort precedence alone
    // is not detected.
    fn equals(&self, other: &Self) -> bool {
        self.name == other.name
            && self.filter_type == other.filter_type
            && self.description == other.description
            && sets_equal(self.conditions.as_deref(), other.conditions.as_deref())
            && sets_equal(self.orders.as_deref(), other.orders.as_deref())
    }

    fn from_any(object: &AnyObject) -> Option<&Self> {
        match object {
            AnyObject::Filter(f) => Some(f),
            AnyObject::Dashboard(_) => None,
        }
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        Object::equals(self, other)
    }
}

impl SetMember for FilterCondition {
    fn set_key(&self) -> String {
        format!("{}${}${}", self.filtering_field, self.condition, self.value)
    }

    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

impl SetMember for FilterOrder {
    fn set_key(&self) -> String {
        format!("{}${}", self.sorting_column, self.is_asc)
    }

    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}
