//! Partition assignment consumed by the splitter.
//!
//! The graph partitioner that decides which cell goes where lives outside this
//! crate; its output arrives here either as one cell-id set per partition or
//! as a per-cell owner array.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshSplitError;

pub type PartitionId = usize;

/// Ordered list of level-0 cell-id sets, one per partition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionAssignment(Vec<Vec<usize>>);

impl PartitionAssignment {
    pub fn new(parts: Vec<Vec<usize>>) -> Self {
        Self(parts)
    }

    /// Group cells by owner: partition `p` receives, in increasing order,
    /// every cell `c` with `owners[c] == p`.
    pub fn from_cell_owners(
        owners: &[PartitionId],
        n_parts: usize,
    ) -> Result<Self, MeshSplitError> {
        let mut parts = vec![Vec::new(); n_parts];
        for (cell, &owner) in owners.iter().enumerate() {
            let part = parts
                .get_mut(owner)
                .ok_or(MeshSplitError::OwnerOutOfRange {
                    cell,
                    owner,
                    n_parts,
                })?;
            part.push(cell);
        }
        Ok(Self(parts))
    }

    /// Number of partitions (including empty ones).
    #[inline]
    pub fn n_parts(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cells of partition `index`.
    pub fn part(&self, index: PartitionId) -> Result<&[usize], MeshSplitError> {
        self.0
            .get(index)
            .map(Vec::as_slice)
            .ok_or(MeshSplitError::PartitionIndexOutOfRange {
                index,
                n_parts: self.0.len(),
            })
    }

    /// Iterate over `(partition, cells)`.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PartitionId, &[usize])> + '_ {
        self.0.iter().enumerate().map(|(i, p)| (i, p.as_slice()))
    }

    /// Check that every id addresses one of `n_cells` level-0 cells and that
    /// no partition lists a cell twice. Overlap between partitions is not
    /// checked.
    pub fn validate(&self, n_cells: usize) -> Result<(), MeshSplitError> {
        // Last partition that listed each cell; one scratch array for all parts.
        let mut seen_in = vec![usize::MAX; n_cells];
        for (partition, cells) in self.iter() {
            for &id in cells {
                let slot = seen_in
                    .get_mut(id)
                    .ok_or(MeshSplitError::CellIdOutOfRange {
                        partition,
                        id,
                        n_cells,
                    })?;
                if *slot == partition {
                    return Err(MeshSplitError::DuplicateCellId { partition, id });
                }
                *slot = partition;
            }
        }
        Ok(())
    }
}

impl From<Vec<Vec<usize>>> for PartitionAssignment {
    fn from(parts: Vec<Vec<usize>>) -> Self {
        Self(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owners_group_into_sets() {
        let a = PartitionAssignment::from_cell_owners(&[1, 0, 1, 2], 4).unwrap();
        assert_eq!(a.n_parts(), 4);
        assert_eq!(a.part(0).unwrap(), &[1]);
        assert_eq!(a.part(1).unwrap(), &[0, 2]);
        assert!(a.part(3).unwrap().is_empty());
        assert_eq!(
            a.part(4),
            Err(MeshSplitError::PartitionIndexOutOfRange { index: 4, n_parts: 4 })
        );
    }

    #[test]
    fn owner_beyond_count_is_rejected() {
        assert_eq!(
            PartitionAssignment::from_cell_owners(&[0, 2], 2),
            Err(MeshSplitError::OwnerOutOfRange {
                cell: 1,
                owner: 2,
                n_parts: 2
            })
        );
    }

    #[test]
    fn validate_ranges_and_duplicates() {
        let ok = PartitionAssignment::new(vec![vec![0, 1], vec![1, 2]]);
        assert!(ok.validate(3).is_ok());

        let out = PartitionAssignment::new(vec![vec![0], vec![3]]);
        assert_eq!(
            out.validate(3),
            Err(MeshSplitError::CellIdOutOfRange {
                partition: 1,
                id: 3,
                n_cells: 3
            })
        );

        let dup = PartitionAssignment::new(vec![vec![2, 0, 2]]);
        assert_eq!(
            dup.validate(3),
            Err(MeshSplitError::DuplicateCellId { partition: 0, id: 2 })
        );
    }
}
