// ── Sub-type field codec ──
//
// Content fields such as `statistics$defects$system_issue$si_1iuqflmhg6hk6`
// embed a locator that ReportPortal generates per project. Files use the
// sub-type short name instead (`…$system_issue$KCC`) so that they stay
// portable between projects and instances.

use std::collections::BTreeMap;

use rpdac_api::types::ProjectSettings;
use tracing::warn;

use crate::error::CoreError;

const FIELD_SEPARATOR: char = '$';

/// One-directional lookup table for the 4th segment of defect fields.
///
/// Built from project settings in the decode direction (locator to short
/// name); [`inverse`](Self::inverse) gives the encode direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubTypeMap {
    entries: BTreeMap<String, String>,
}

impl SubTypeMap {
    /// Locator → short name, for every sub-type of every issue type.
    pub fn from_settings(settings: &ProjectSettings) -> Self {
        settings
            .sub_types
            .values()
            .flatten()
            .map(|sub| (sub.locator.clone(), sub.short_name.clone()))
            .collect()
    }

    /// Swap keys and values. If two keys share a value only one survives.
    pub fn inverse(&self) -> Self {
        let mut entries = BTreeMap::new();
        for (key, value) in &self.entries {
            if let Some(previous) = entries.insert(value.clone(), key.clone()) {
                warn!(
                    value = %value,
                    kept = %key,
                    dropped = %previous,
                    "sub-type short name maps to more than one locator"
                );
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the 4th segment of every `statistics$defects$…` field.
    ///
    /// Other fields, and defect fields with fewer than 4 segments, pass
    /// through. Fails on the first 4th segment without an entry.
    pub fn rewrite(&self, fields: &[String]) -> Result<Vec<String>, CoreError> {
        fields.iter().map(|field| self.rewrite_one(field)).collect()
    }

    fn rewrite_one(&self, field: &str) -> Result<String, CoreError> {
        let mut segments: Vec<&str> = field.split(FIELD_SEPARATOR).collect();

        let is_defect = segments.len() >= 4 && segments[0] == "statistics" && segments[1] == "defects";
        if !is_defect {
            return Ok(field.to_owned());
        }

        let mapped = self
            .get(segments[3])
            .ok_or_else(|| CoreError::FieldNotMapped {
                field: field.to_owned(),
            })?;
        segments[3] = mapped;

        Ok(segments.join("$"))
    }
}

impl FromIterator<(String, String)> for SubTypeMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Remote locators → portable short names.
pub fn decode_fields(fields: &[String], decode_map: &SubTypeMap) -> Result<Vec<String>, CoreError> {
    decode_map.rewrite(fields)
}

/// Portable short names → remote locators. `encode_map` is the inverse of
/// the decode map.
pub fn encode_fields(fields: &[String], encode_map: &SubTypeMap) -> Result<Vec<String>, CoreError> {
    encode_map.rewrite(fields)
}
