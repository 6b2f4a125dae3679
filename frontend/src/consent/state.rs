use super::category::{CategoryId, CookieCategory};
use super::snapshot::Snapshot;
use serde::Serialize;
use std::collections::BTreeMap;

/// The four cookie categories and whether each one is switched on.
///
/// The key set is fixed at construction. Every mutator goes through
/// `CookieCategory::set_enabled`, so a required category is on after any
/// call, whatever the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConsentState {
    categories: BTreeMap<CategoryId, CookieCategory>,
}

impl ConsentState {
    pub fn new() -> Self {
        let categories = CategoryId::ALL
            .into_iter()
            .map(|id| (id, CookieCategory::default_for(id)))
            .collect();
        Self { categories }
    }

    pub fn get(&self, id: CategoryId) -> Option<&CookieCategory> {
        self.categories.get(&id)
    }

    pub fn is_enabled(&self, id: CategoryId) -> bool {
        self.get(id).map(|c| c.enabled).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CookieCategory> {
        self.categories.values()
    }

    pub fn accept_all(&mut self) {
        for category in self.categories.values_mut() {
            category.set_enabled(true);
        }
    }

    pub fn reject_all(&mut self) {
        for category in self.categories.values_mut() {
            category.set_enabled(false);
        }
    }

    pub fn set_enabled(&mut self, id: CategoryId, enabled: bool) -> bool {
        match self.categories.get_mut(&id) {
            Some(category) => category.set_enabled(enabled),
            None => false,
        }
    }

    /// Applies `(category, checked)` pairs read from toggle controls.
    /// Categories without a control keep their value.
    pub fn apply_controls<I>(&mut self, controls: I)
    where
        I: IntoIterator<Item = (CategoryId, bool)>,
    {
        for (id, checked) in controls {
            self.set_enabled(id, checked);
        }
    }

    /// Overlays `enabled` values from a validated snapshot. Ids that aren't
    /// part of this state were already dropped while parsing.
    pub fn merge(&mut self, snapshot: &Snapshot) {
        for (id, enabled) in snapshot.enabled_values() {
            self.set_enabled(id, enabled);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(self)
    }
}

impl Default for ConsentState {
    fn default() -> Self {
        Self::new()
    }
}
