//! Family and group classification tables.
//!
//! Every entity (cell, sub-entity or node) carries an integer family id.
//! Families are named, and groups are human-readable labels that each cover
//! one or more families. The table is mesh-wide metadata: splitting copies it
//! unchanged into every partition.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Family name → id table plus the many-to-many family ↔ group relation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyGroups {
    families: BTreeMap<String, i32>,
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl FamilyGroups {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers family `name` with `id`.
    ///
    /// Returns the previous id, if any.
    pub fn add_family(&mut self, name: &str, id: i32) -> Option<i32> {
        self.families.insert(name.to_string(), id)
    }

    /// Attaches `group` to family `family`, registering the group if needed.
    pub fn add_family_to_group(&mut self, group: &str, family: &str) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(family.to_string());
    }

    /// Returns the id of family `name`.
    pub fn family_id(&self, name: &str) -> Option<i32> {
        self.families.get(name).copied()
    }

    /// Returns the name of the family with `id`, if registered.
    pub fn family_name(&self, id: i32) -> Option<&str> {
        self.families
            .iter()
            .find_map(|(name, &fid)| (fid == id).then_some(name.as_str()))
    }

    /// Families covered by `group`, in name order.
    pub fn families_on_group<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Family ids covered by `group`, sorted ascending.
    pub fn family_ids_on_group(&self, group: &str) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .families_on_group(group)
            .filter_map(|name| self.family_id(name))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Groups that reference family `family`, in name order.
    pub fn groups_on_family(&self, family: &str) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|(_, fams)| fams.contains(family))
            .map(|(g, _)| g.as_str())
            .collect()
    }

    /// Iterate over `(family name, id)` pairs.
    pub fn families(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.families.iter().map(|(n, &id)| (n.as_str(), id))
    }

    /// Iterate over group names.
    pub fn groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.keys().map(String::as_str)
    }

    /// Returns true when the table has no families and no groups.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty() && self.groups.is_empty()
    }
}
