//! Renumbering utilities: node compaction, old↔new maps, canonical cell order.
//!
//! Conventions: an *old-to-new* array `o2n` sends position `i` of the input to
//! position `o2n[i]` of the output; a *new-to-old* array `n2o` lists, for each
//! output position, the input position it came from.

use crate::data::field::FieldValues;
use crate::mesh_error::MeshSplitError;
use crate::topology::cell_type::CellType;
use crate::topology::mesh::{LevelMesh, Mesh};

/// Bidirectional mapping between parent (source) and sub (compacted) node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMaps {
    /// Indexed by parent node id; `None` for nodes not retained.
    pub parent_to_sub: Vec<Option<usize>>,
    /// Indexed by sub node id.
    pub sub_to_parent: Vec<usize>,
}

impl NodeMaps {
    /// Build maps from a usage mask: retained nodes are numbered from 0 in
    /// increasing parent order.
    pub fn from_used(used: &[bool]) -> Self {
        let mut parent_to_sub = vec![None; used.len()];
        let mut sub_to_parent = Vec::with_capacity(used.iter().filter(|&&u| u).count());
        for (parent, _) in used.iter().enumerate().filter(|(_, u)| **u) {
            parent_to_sub[parent] = Some(sub_to_parent.len());
            sub_to_parent.push(parent);
        }
        Self {
            parent_to_sub,
            sub_to_parent,
        }
    }

    /// Sub id of `parent`, if retained.
    #[inline]
    pub fn to_sub(&self, parent: usize) -> Option<usize> {
        self.parent_to_sub.get(parent).copied().flatten()
    }

    /// Parent id of `sub`.
    #[inline]
    pub fn to_parent(&self, sub: usize) -> Option<usize> {
        self.sub_to_parent.get(sub).copied()
    }

    #[inline]
    pub fn is_retained(&self, parent: usize) -> bool {
        self.to_sub(parent).is_some()
    }

    /// Number of retained nodes.
    #[inline]
    pub fn n_sub(&self) -> usize {
        self.sub_to_parent.len()
    }

    /// Number of parent nodes.
    #[inline]
    pub fn n_parent(&self) -> usize {
        self.parent_to_sub.len()
    }

    /// Membership mask over parent nodes.
    pub fn retained_mask(&self) -> Vec<bool> {
        self.parent_to_sub.iter().map(Option::is_some).collect()
    }
}

/// Level-0 sub-mesh over compacted nodes, as produced by [`compact_nodes`].
#[derive(Debug, Clone)]
pub struct CompactedCells {
    /// Selected cells, connectivity in sub node ids.
    pub cells: LevelMesh,
    /// Interleaved coordinates of the retained nodes, in sub order.
    pub coords: Vec<f64>,
    /// Node maps between source and compacted numbering.
    pub maps: NodeMaps,
}

/// Check that every id addresses an entity of a level with `n_entities`.
pub fn check_entity_ids(
    level: i32,
    ids: &[usize],
    n_entities: usize,
) -> Result<(), MeshSplitError> {
    match ids.iter().find(|&&id| id >= n_entities) {
        Some(&id) => Err(MeshSplitError::EntityIdOutOfRange {
            level,
            id,
            n_entities,
        }),
        None => Ok(()),
    }
}

/// Extract level-0 cells `cell_ids` and drop every node they do not
/// reference.
///
/// `maps.sub_to_parent` has one entry per distinct node referenced by the
/// selection, and `to_parent(to_sub(n)) == Some(n)` for each of them.
pub fn compact_nodes(mesh: &Mesh, cell_ids: &[usize]) -> Result<CompactedCells, MeshSplitError> {
    let top = mesh.level(0)?;
    check_entity_ids(0, cell_ids, top.len())?;
    let selected = top.select(cell_ids);

    let n_nodes = mesh.n_nodes();
    let mut used = vec![false; n_nodes];
    for &n in selected.connectivity().nodes() {
        *used
            .get_mut(n)
            .ok_or(MeshSplitError::NodeOutOfRange { id: n, n_nodes })? = true;
    }
    let maps = NodeMaps::from_used(&used);

    let connectivity = selected
        .connectivity()
        .renumber_nodes(|n| maps.to_sub(n))
        .ok_or_else(|| {
            MeshSplitError::InvalidPermutation("selected cell references unmapped node".into())
        })?;

    let dim = mesh.space_dim();
    let mut coords = Vec::with_capacity(maps.n_sub() * dim);
    for &parent in &maps.sub_to_parent {
        coords.extend_from_slice(mesh.node_coords(parent));
    }

    Ok(CompactedCells {
        cells: selected.with_connectivity(connectivity),
        coords,
        maps,
    })
}

/// Invert a permutation: turns `o2n` into `n2o` and vice versa.
pub fn invert_permutation(perm: &[usize]) -> Result<Vec<usize>, MeshSplitError> {
    let n = perm.len();
    let mut inv = vec![usize::MAX; n];
    for (i, &p) in perm.iter().enumerate() {
        if p >= n {
            return Err(MeshSplitError::InvalidPermutation(format!(
                "target {p} out of range for length {n}"
            )));
        }
        if inv[p] != usize::MAX {
            return Err(MeshSplitError::InvalidPermutation(format!(
                "target {p} hit twice"
            )));
        }
        inv[p] = i;
    }
    Ok(inv)
}

/// Stable permutation (`n2o`) grouping `cell_types` by canonical rank.
pub fn canonical_permutation(cell_types: &[CellType]) -> Vec<usize> {
    let mut n2o: Vec<usize> = (0..cell_types.len()).collect();
    n2o.sort_by_key(|&i| cell_types[i].canonical_rank());
    n2o
}

/// Old-to-new renumbering putting the entities of `level` into canonical
/// order: grouped by cell type, extraction order kept within a type.
pub fn canonical_cell_order(level: &LevelMesh) -> Vec<usize> {
    canonical_order_of(level.cell_types())
}

/// [`canonical_cell_order`] from the cell types alone.
pub fn canonical_order_of(cell_types: &[CellType]) -> Vec<usize> {
    let n2o = canonical_permutation(cell_types);
    let mut o2n = vec![0; n2o.len()];
    for (new, &old) in n2o.iter().enumerate() {
        o2n[old] = new;
    }
    o2n
}

/// Returns true when `perm` (either direction) is the identity.
pub fn is_identity(perm: &[usize]) -> bool {
    perm.iter().enumerate().all(|(i, &p)| i == p)
}

/// Move tuple `i` of `values` to position `o2n[i]`.
pub fn renumber_tuples(values: &FieldValues, o2n: &[usize]) -> Result<FieldValues, MeshSplitError> {
    if o2n.len() != values.n_tuples() {
        return Err(MeshSplitError::InvalidPermutation(format!(
            "{} entries for {} tuples",
            o2n.len(),
            values.n_tuples()
        )));
    }
    let n2o = invert_permutation(o2n)?;
    Ok(values.select_tuples(&n2o))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::connectivity::Connectivity;

    #[test]
    fn node_maps_round_trip() {
        let maps = NodeMaps::from_used(&[false, true, true, false, true]);
        assert_eq!(maps.sub_to_parent, vec![1, 2, 4]);
        assert_eq!(maps.to_sub(0), None);
        assert_eq!(maps.to_sub(4), Some(2));
        for sub in 0..maps.n_sub() {
            let parent = maps.to_parent(sub).unwrap();
            assert_eq!(maps.to_sub(parent), Some(sub));
        }
    }

    #[test]
    fn invert_rejects_non_bijections() {
        assert_eq!(invert_permutation(&[2, 0, 1]).unwrap(), vec![1, 2, 0]);
        assert!(invert_permutation(&[0, 0]).is_err());
        assert!(invert_permutation(&[0, 2]).is_err());
    }

    #[test]
    fn canonical_order_is_stable_by_type() {
        let level = LevelMesh::new(
            vec![
                CellType::Quadrilateral,
                CellType::Triangle,
                CellType::Quadrilateral,
                CellType::Triangle,
            ],
            Connectivity::from_entities([
                vec![0usize, 1, 2, 3],
                vec![0, 1, 2],
                vec![0, 1, 2, 3],
                vec![0, 1, 2],
            ]),
        );
        let o2n = canonical_cell_order(&level);
        assert_eq!(o2n, vec![2, 0, 3, 1]);

        let values = FieldValues::scalar(vec![10.0, 20.0, 30.0, 40.0]);
        let sorted = renumber_tuples(&values, &o2n).unwrap();
        assert_eq!(sorted.data(), &[20.0, 40.0, 10.0, 30.0]);
    }

    #[test]
    fn entity_id_check() {
        assert!(check_entity_ids(-1, &[0, 2], 3).is_ok());
        assert_eq!(
            check_entity_ids(-1, &[0, 3], 3),
            Err(MeshSplitError::EntityIdOutOfRange {
                level: -1,
                id: 3,
                n_entities: 3
            })
        );
    }
}
