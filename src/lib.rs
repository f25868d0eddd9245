#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-splitter
//!
//! mesh-splitter cuts a multi-level unstructured mesh, together with the
//! time-dependent fields defined on it, into one self-standing bundle per
//! partition. It is the decomposition step between a graph partitioner, which
//! decides which volume cell goes where, and a writer or communication layer
//! that ships each bundle to its consumer.
//!
//! ## Features
//! - Multi-level meshes: volume cells at level 0 and lower-dimensional
//!   entities (faces, edges, ...) at negative levels, sharing one coordinate
//!   array, with family/group classification
//! - Node compaction and canonical (type-grouped) cell ordering per partition
//! - Sub-entities kept exactly when all of their nodes are retained, so
//!   interface entities appear in every partition that touches them
//! - Cell, Gauss-point and node fields, with or without profiles; node
//!   profile resolution is cached across timesteps
//! - Optional rayon-parallel partition loop (`rayon` feature)
//!
//! ## Determinism
//!
//! Output depends only on the inputs: node ids are compacted in increasing
//! source order, cells are grouped by type with a stable sort, and bundles are
//! returned in assignment order whether or not the `rayon` feature is used.
//!
//! ## Usage
//!
//! ```
//! use mesh_splitter::prelude::*;
//!
//! let mut mesh = Mesh::new("line", 1, vec![0.0, 1.0, 2.0])?;
//! mesh.set_level(
//!     0,
//!     LevelMesh::new(
//!         vec![CellType::Segment; 2],
//!         Connectivity::from_entities([[0usize, 1], [1, 2]]),
//!     ),
//! )?;
//! let assignment = PartitionAssignment::from_cell_owners(&[0, 1], 2)?;
//! let bundles = split_into_bundles(&mesh, &[], &assignment, &SplitConfig::default())?;
//! assert_eq!(bundles[1].numbering.nodes, vec![1, 2]);
//! # Ok::<(), MeshSplitError>(())
//! ```

pub mod algs;
pub mod data;
pub mod mesh_error;
pub mod partitioning;
pub mod topology;

/// A convenient prelude to import the most-used types and entry points:
pub mod prelude {
    pub use crate::algs::distribute::{
        ProfiledCellPolicy, SplitConfig, split_into_bundles, split_partition,
    };
    pub use crate::algs::node_field::NodeFieldCache;
    pub use crate::data::bundle::{GlobalNumbering, PartitionBundle};
    pub use crate::data::discretization::Discretization;
    pub use crate::data::field::{FieldSeries, FieldStep, FieldValues, Profile, StepTime};
    pub use crate::mesh_error::MeshSplitError;
    pub use crate::partitioning::{PartitionAssignment, PartitionId};
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::connectivity::Connectivity;
    pub use crate::topology::families::FamilyGroups;
    pub use crate::topology::mesh::{LevelMesh, Mesh};
    pub use crate::topology::validation::validate_mesh;
}
