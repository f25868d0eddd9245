//! Compressed (CSR) entity-to-node connectivity.
//!
//! Each entity owns the contiguous slice `nodes[offsets[e]..offsets[e + 1]]`.
//! The table is immutable once built; extraction and renumbering always
//! produce a fresh table.

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshSplitError;

/// Variable-length entity-to-node table in CSR layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConnectivity")]
pub struct Connectivity {
    offsets: Vec<usize>,
    nodes: Vec<usize>,
}

#[derive(Deserialize)]
struct RawConnectivity {
    offsets: Vec<usize>,
    nodes: Vec<usize>,
}

impl TryFrom<RawConnectivity> for Connectivity {
    type Error = MeshSplitError;

    fn try_from(raw: RawConnectivity) -> Result<Self, Self::Error> {
        Connectivity::from_csr(raw.offsets, raw.nodes)
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            nodes: Vec::new(),
        }
    }
}

impl Connectivity {
    /// Build from raw CSR arrays, checking that `offsets` is a prefix sum
    /// ending at `nodes.len()`.
    pub fn from_csr(offsets: Vec<usize>, nodes: Vec<usize>) -> Result<Self, MeshSplitError> {
        let Some(&first) = offsets.first() else {
            return Err(MeshSplitError::MalformedOffsets("empty offsets".into()));
        };
        if first != 0 {
            return Err(MeshSplitError::MalformedOffsets(format!(
                "first offset is {first}, expected 0"
            )));
        }
        if let Some(i) = offsets.windows(2).position(|w| w[1] < w[0]) {
            return Err(MeshSplitError::MalformedOffsets(format!(
                "offsets decrease at entity {i}"
            )));
        }
        let last = offsets[offsets.len() - 1];
        if last != nodes.len() {
            return Err(MeshSplitError::MalformedOffsets(format!(
                "last offset {last} != {} nodes",
                nodes.len()
            )));
        }
        Ok(Self { offsets, nodes })
    }

    /// Build from one node list per entity.
    pub fn from_entities<I, E>(entities: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<[usize]>,
    {
        let mut out = Self::default();
        for e in entities {
            out.push(e.as_ref());
        }
        out
    }

    fn push(&mut self, nodes: &[usize]) {
        self.nodes.extend_from_slice(nodes);
        self.offsets.push(self.nodes.len());
    }

    /// Number of entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node ids of entity `e`.
    ///
    /// # Panics
    /// Panics if `e >= self.len()`.
    #[inline]
    pub fn entity(&self, e: usize) -> &[usize] {
        &self.nodes[self.offsets[e]..self.offsets[e + 1]]
    }

    /// Iterate over entities in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.nodes[w[0]..w[1]])
    }

    /// Flat node array.
    #[inline]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Prefix-sum offsets, one more than the entity count.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// New table holding the entities at `ids`, in that order.
    ///
    /// # Panics
    /// Panics if an id is out of range; callers validate ids first.
    pub fn select(&self, ids: &[usize]) -> Self {
        let mut out = Self {
            offsets: Vec::with_capacity(ids.len() + 1),
            nodes: Vec::new(),
        };
        out.offsets.push(0);
        for &e in ids {
            out.push(self.entity(e));
        }
        out
    }

    /// Rewrite every node id through `map`. Returns `None` if any node maps
    /// to `None`.
    pub fn renumber_nodes<F>(&self, mut map: F) -> Option<Self>
    where
        F: FnMut(usize) -> Option<usize>,
    {
        let nodes = self
            .nodes
            .iter()
            .map(|&n| map(n))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            offsets: self.offsets.clone(),
            nodes,
        })
    }
}
