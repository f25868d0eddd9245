//! Per-partition output bundle.
//!
//! A [`PartitionBundle`] is a self-standing mesh (nodes and entities renumbered
//! from 0) together with the field series restricted to it. It owns all of its
//! data; nothing points back into the source mesh. The [`GlobalNumbering`] it
//! carries records, as plain ids, where each local node and entity came from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::field::FieldSeries;
use crate::topology::mesh::Mesh;

/// Source ids of a partition's local nodes and entities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalNumbering {
    /// `nodes[local]` is the source node id of local node `local`.
    pub nodes: Vec<usize>,
    /// `entities[level][local]` is the source entity id at `level`.
    pub entities: BTreeMap<i32, Vec<usize>>,
}

impl GlobalNumbering {
    /// Source id of local node `local`.
    pub fn source_node(&self, local: usize) -> Option<usize> {
        self.nodes.get(local).copied()
    }

    /// Source id of local entity `local` on `level`.
    pub fn source_entity(&self, level: i32, local: usize) -> Option<usize> {
        self.entities.get(&level)?.get(local).copied()
    }
}

/// Mesh and fields of one partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionBundle {
    /// Position of this partition in the input assignment.
    pub partition: usize,
    /// Partition mesh, renumbered from 0.
    pub mesh: Mesh,
    /// Retained field series, in source order.
    pub fields: Vec<FieldSeries>,
    /// Local-to-source id maps.
    pub numbering: GlobalNumbering,
}

impl PartitionBundle {
    /// Field series `name`, if retained for this partition.
    pub fn field(&self, name: &str) -> Option<&FieldSeries> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Names of retained series.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(FieldSeries::name)
    }
}

static_assertions::assert_impl_all!(PartitionBundle: Send, Sync);
