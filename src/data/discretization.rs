//! Spatial discretization kinds of field data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the tuples of a field step live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discretization {
    /// One tuple per cell.
    Cells,
    /// One tuple per node.
    Nodes,
    /// Gauss-point values gathered per cell.
    GaussPoints,
    /// Per-element-node Gauss values gathered per cell.
    GaussNe,
}

impl Discretization {
    /// All kinds, in dispatch-table order.
    pub const ALL: [Discretization; 4] = [
        Discretization::Cells,
        Discretization::Nodes,
        Discretization::GaussPoints,
        Discretization::GaussNe,
    ];

    /// True for kinds whose tuples are indexed by cells of some level.
    #[inline]
    pub fn is_cell_resident(self) -> bool {
        !matches!(self, Discretization::Nodes)
    }

    /// Index of this kind in [`Discretization::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Discretization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Discretization::Cells => "ON_CELLS",
            Discretization::Nodes => "ON_NODES",
            Discretization::GaussPoints => "ON_GAUSS_PT",
            Discretization::GaussNe => "ON_GAUSS_NE",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_table() {
        for (i, d) in Discretization::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn only_nodes_are_node_resident() {
        let cell_kinds: Vec<_> = Discretization::ALL
            .into_iter()
            .filter(|d| d.is_cell_resident())
            .collect();
        assert_eq!(cell_kinds.len(), 3);
        assert_eq!(Discretization::Nodes.to_string(), "ON_NODES");
    }
}
