//! Persisted form of the consent state.
//!
//! Written as `{"<category>": {"required": bool, "enabled": bool}, ...}`.
//! Snapshots saved by the older inline script also carry `name` and
//! `description`; those are ignored on read.

use super::category::CategoryId;
use super::state::ConsentState;
use crate::error::ConsentError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    entries: BTreeMap<CategoryId, PersistedCategory>,
}

impl Snapshot {
    pub fn from_state(state: &ConsentState) -> Self {
        let entries = state
            .iter()
            .map(|c| {
                (
                    c.id,
                    PersistedCategory {
                        required: Some(c.required),
                        enabled: c.enabled,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Strictly validates `text`. Unknown category ids are skipped, but a
    /// known id with a missing or mistyped field rejects the whole snapshot.
    pub fn parse(text: &str) -> Result<Self, ConsentError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut entries = BTreeMap::new();

        for (key, value) in raw {
            let Some(id) = CategoryId::parse(&key) else {
                log::debug!("Ignoring unknown cookie category in saved preferences: {}", key);
                continue;
            };
            let entry: PersistedCategory = serde_json::from_value(value)
                .map_err(|e| ConsentError::InvalidShape(format!("{}: {}", key, e)))?;
            entries.insert(id, entry);
        }

        Ok(Self { entries })
    }

    pub fn to_json(&self) -> String {
        let map: BTreeMap<&str, &PersistedCategory> =
            self.entries.iter().map(|(id, c)| (id.as_str(), c)).collect();
        // A map of plain structs can't fail to serialize
        serde_json::to_string(&map).unwrap_or_else(|_| String::from("{}"))
    }

    pub fn enabled_values(&self) -> impl Iterator<Item = (CategoryId, bool)> + '_ {
        self.entries.iter().map(|(id, c)| (*id, c.enabled))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
