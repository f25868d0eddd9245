//! Multi-level unstructured mesh.
//!
//! A [`Mesh`] owns one coordinate array shared by all of its levels. Levels
//! are indexed relative to the top dimension: `0` holds the volume cells,
//! `-1` the faces below them, and so on. Each level is a [`LevelMesh`]: a
//! cell-type array, a CSR connectivity into the shared node numbering, and an
//! optional family id per entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshSplitError;
use crate::topology::cell_type::CellType;
use crate::topology::connectivity::Connectivity;
use crate::topology::families::FamilyGroups;

/// Entities of one level: geometric types, connectivity, families.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelMesh {
    cell_types: Vec<CellType>,
    connectivity: Connectivity,
    families: Option<Vec<i32>>,
}

impl LevelMesh {
    /// Create a level from per-entity types and connectivity.
    ///
    /// Consistency between the two is checked by
    /// [`validate_mesh`](crate::topology::validation::validate_mesh).
    pub fn new(cell_types: Vec<CellType>, connectivity: Connectivity) -> Self {
        Self {
            cell_types,
            connectivity,
            families: None,
        }
    }

    /// Builder-style family assignment.
    pub fn with_families(mut self, families: Vec<i32>) -> Self {
        self.families = Some(families);
        self
    }

    /// Number of entities on this level.
    #[inline]
    pub fn len(&self) -> usize {
        self.connectivity.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connectivity.is_empty()
    }

    #[inline]
    pub fn cell_types(&self) -> &[CellType] {
        &self.cell_types
    }

    #[inline]
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Node ids of entity `e`.
    #[inline]
    pub fn entity(&self, e: usize) -> &[usize] {
        self.connectivity.entity(e)
    }

    #[inline]
    pub fn families(&self) -> Option<&[i32]> {
        self.families.as_deref()
    }

    pub fn set_families(&mut self, families: Option<Vec<i32>>) {
        self.families = families;
    }

    /// New level holding entities `ids` (in that order) with their types and
    /// families. Node ids are left in the source numbering.
    pub fn select(&self, ids: &[usize]) -> Self {
        Self {
            cell_types: ids.iter().map(|&e| self.cell_types[e]).collect(),
            connectivity: self.connectivity.select(ids),
            families: self
                .families
                .as_ref()
                .map(|f| ids.iter().map(|&e| f[e]).collect()),
        }
    }

    /// Replace the connectivity, keeping types and families.
    pub(crate) fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// A multi-level mesh with shared coordinates and classification metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    name: String,
    space_dim: usize,
    coords: Vec<f64>,
    levels: BTreeMap<i32, LevelMesh>,
    node_families: Option<Vec<i32>>,
    families: FamilyGroups,
}

impl Mesh {
    /// Create a mesh with interleaved coordinates (`space_dim` values per node)
    /// and no levels.
    pub fn new(
        name: impl Into<String>,
        space_dim: usize,
        coords: Vec<f64>,
    ) -> Result<Self, MeshSplitError> {
        if space_dim == 0 || coords.len() % space_dim != 0 {
            return Err(MeshSplitError::CoordinateLength {
                len: coords.len(),
                dim: space_dim,
            });
        }
        Ok(Self {
            name: name.into(),
            space_dim,
            coords,
            ..Default::default()
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn space_dim(&self) -> usize {
        self.space_dim
    }

    /// Number of nodes in the shared coordinate array.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        if self.space_dim == 0 {
            0
        } else {
            self.coords.len() / self.space_dim
        }
    }

    /// Flat interleaved coordinates.
    #[inline]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Coordinates of node `n`.
    #[inline]
    pub fn node_coords(&self, n: usize) -> &[f64] {
        &self.coords[n * self.space_dim..(n + 1) * self.space_dim]
    }

    /// Insert or replace level `level`. Returns the previous level, if any.
    pub fn set_level(
        &mut self,
        level: i32,
        mesh: LevelMesh,
    ) -> Result<Option<LevelMesh>, MeshSplitError> {
        if level > 0 {
            return Err(MeshSplitError::InvalidLevel(level));
        }
        Ok(self.levels.insert(level, mesh))
    }

    /// Level `level`, or [`MeshSplitError::MissingLevel`].
    pub fn level(&self, level: i32) -> Result<&LevelMesh, MeshSplitError> {
        self.levels
            .get(&level)
            .ok_or(MeshSplitError::MissingLevel(level))
    }

    /// Returns true when the mesh carries level `level`.
    pub fn has_level(&self, level: i32) -> bool {
        self.levels.contains_key(&level)
    }

    /// Iterate over `(level, mesh)` from the most detailed (most negative)
    /// level up to level 0.
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = (i32, &LevelMesh)> + '_ {
        self.levels.iter().map(|(&l, m)| (l, m))
    }

    /// Present levels, most detailed first.
    pub fn level_ids(&self) -> Vec<i32> {
        self.levels.keys().copied().collect()
    }

    /// Number of level-0 cells (0 if the mesh has no top level).
    pub fn n_cells(&self) -> usize {
        self.levels.get(&0).map_or(0, LevelMesh::len)
    }

    /// Number of entities on `level`.
    pub fn n_entities(&self, level: i32) -> Result<usize, MeshSplitError> {
        self.level(level).map(LevelMesh::len)
    }

    #[inline]
    pub fn node_families(&self) -> Option<&[i32]> {
        self.node_families.as_deref()
    }

    pub fn set_node_families(&mut self, families: Option<Vec<i32>>) {
        self.node_families = families;
    }

    #[inline]
    pub fn families(&self) -> &FamilyGroups {
        &self.families
    }

    #[inline]
    pub fn families_mut(&mut self) -> &mut FamilyGroups {
        &mut self.families
    }

    pub fn set_families(&mut self, families: FamilyGroups) {
        self.families = families;
    }

    /// Entities of `level` whose family belongs to `group`, ascending.
    pub fn entities_on_group(&self, level: i32, group: &str) -> Result<Vec<usize>, MeshSplitError> {
        let lev = self.level(level)?;
        Ok(match lev.families() {
            Some(fams) => ids_with_family_in(fams, &self.families.family_ids_on_group(group)),
            None => Vec::new(),
        })
    }

    /// Nodes whose family belongs to `group`, ascending.
    pub fn nodes_on_group(&self, group: &str) -> Vec<usize> {
        match self.node_families() {
            Some(fams) => ids_with_family_in(fams, &self.families.family_ids_on_group(group)),
            None => Vec::new(),
        }
    }

    /// Assemble a mesh from already-consistent parts.
    pub(crate) fn from_parts(
        name: String,
        space_dim: usize,
        coords: Vec<f64>,
        levels: BTreeMap<i32, LevelMesh>,
        node_families: Option<Vec<i32>>,
        families: FamilyGroups,
    ) -> Self {
        Self {
            name,
            space_dim,
            coords,
            levels,
            node_families,
            families,
        }
    }
}

fn ids_with_family_in(fams: &[i32], wanted: &[i32]) -> Vec<usize> {
    fams.iter()
        .enumerate()
        .filter_map(|(i, f)| wanted.binary_search(f).is_ok().then_some(i))
        .collect()
}
