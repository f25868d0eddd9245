//! Per-partition mesh extraction.
//!
//! [`split_mesh_levels`] cuts one partition out of a multi-level mesh: the
//! partition's level-0 cells select the retained nodes, and every lower level
//! keeps exactly the entities whose nodes are all retained. A sub-entity lying
//! on an interface between two partitions is therefore emitted by both.

use std::collections::BTreeMap;

use crate::algs::renumber::{NodeMaps, canonical_permutation, compact_nodes, is_identity};
use crate::data::bundle::GlobalNumbering;
use crate::mesh_error::MeshSplitError;
use crate::topology::mesh::{LevelMesh, Mesh};

/// Mesh of one partition plus the maps tying it to the source.
#[derive(Debug, Clone)]
pub struct MeshPart {
    /// Partition mesh: compacted nodes, levels in canonical order.
    pub mesh: Mesh,
    /// Node maps between source and partition numbering.
    pub maps: NodeMaps,
    /// `selections[level][local]` is the source id of local entity `local`.
    pub selections: BTreeMap<i32, Vec<usize>>,
}

impl MeshPart {
    /// Source ids of the local entities of `level`.
    pub fn selection(&self, level: i32) -> Result<&[usize], MeshSplitError> {
        self.selections
            .get(&level)
            .map(Vec::as_slice)
            .ok_or(MeshSplitError::MissingLevel(level))
    }

    /// Plain-data copy of the local-to-source maps.
    pub fn numbering(&self) -> GlobalNumbering {
        GlobalNumbering {
            nodes: self.maps.sub_to_parent.clone(),
            entities: self.selections.clone(),
        }
    }
}

/// Entities of `level` all of whose nodes are set in `in_set`.
///
/// Partial inclusion excludes the entity. Nodes beyond `in_set.len()` count
/// as absent.
pub fn entities_fully_in_node_set(level: &LevelMesh, in_set: &[bool]) -> Vec<usize> {
    level
        .connectivity()
        .iter()
        .enumerate()
        .filter(|(_, nodes)| nodes.iter().all(|&n| in_set.get(n).copied().unwrap_or(false)))
        .map(|(e, _)| e)
        .collect()
}

/// Membership mask of `node_ids` over `n_nodes` nodes.
pub fn node_mask(node_ids: &[usize], n_nodes: usize) -> Result<Vec<bool>, MeshSplitError> {
    let mut mask = vec![false; n_nodes];
    for &id in node_ids {
        *mask
            .get_mut(id)
            .ok_or(MeshSplitError::NodeOutOfRange { id, n_nodes })? = true;
    }
    Ok(mask)
}

/// [`entities_fully_in_node_set`] for an explicit list of node ids.
pub fn entities_fully_in_node_ids(
    level: &LevelMesh,
    node_ids: &[usize],
    n_nodes: usize,
) -> Result<Vec<usize>, MeshSplitError> {
    let mask = node_mask(node_ids, n_nodes)?;
    Ok(entities_fully_in_node_set(level, &mask))
}

/// Extract the partition made of level-0 cells `cell_ids`.
///
/// Level 0 holds exactly `cell_ids`; each level below holds the entities
/// fully inside the retained node set. All levels share the compacted
/// coordinates, every level is put in canonical order, and family arrays
/// (per level and per node) follow their entities. The family/group table
/// is copied unchanged.
pub fn split_mesh_levels(mesh: &Mesh, cell_ids: &[usize]) -> Result<MeshPart, MeshSplitError> {
    let compacted = compact_nodes(mesh, cell_ids)?;
    let maps = compacted.maps;

    let mut levels = BTreeMap::new();
    let mut selections = BTreeMap::new();

    let (cells, top_ids) = canonicalize(compacted.cells, cell_ids.to_vec());
    levels.insert(0, cells);
    selections.insert(0, top_ids);

    let retained = maps.retained_mask();
    for (level, lev) in mesh.levels().filter(|(l, _)| *l < 0) {
        let part = entities_fully_in_node_set(lev, &retained);
        log::debug!(
            "level {level}: {} of {} entities fully inside {} retained nodes",
            part.len(),
            lev.len(),
            maps.n_sub()
        );
        let sub = lev.select(&part);
        let connectivity = sub
            .connectivity()
            .renumber_nodes(|n| maps.to_sub(n))
            .ok_or_else(|| {
                MeshSplitError::InvalidPermutation(format!(
                    "level {level}: retained entity references a dropped node"
                ))
            })?;
        let (sub, part) = canonicalize(sub.with_connectivity(connectivity), part);
        levels.insert(level, sub);
        selections.insert(level, part);
    }

    let node_families = mesh
        .node_families()
        .map(|fams| maps.sub_to_parent.iter().map(|&n| fams[n]).collect());

    let part_mesh = Mesh::from_parts(
        mesh.name().to_string(),
        mesh.space_dim(),
        compacted.coords,
        levels,
        node_families,
        mesh.families().clone(),
    );

    Ok(MeshPart {
        mesh: part_mesh,
        maps,
        selections,
    })
}

/// Reorder `level` (and the matching source ids) into canonical order.
fn canonicalize(level: LevelMesh, source_ids: Vec<usize>) -> (LevelMesh, Vec<usize>) {
    let n2o = canonical_permutation(level.cell_types());
    if is_identity(&n2o) {
        return (level, source_ids);
    }
    let ids = n2o.iter().map(|&o| source_ids[o]).collect();
    (level.select(&n2o), ids)
}
