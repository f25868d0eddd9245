//! Splitting algorithms: renumbering utilities, per-partition mesh
//! extraction, field splitters and the bundle assembler.

pub mod distribute;
pub mod field_split;
pub mod node_field;
pub mod renumber;
pub mod submesh;

pub use distribute::{ProfiledCellPolicy, SplitConfig, split_into_bundles, split_partition};
pub use field_split::{PartitionContext, StepSplitter, step_splitter};
pub use node_field::{NodeFieldCache, NodeFieldKey, NodeProfileResolution, ResolvedNodeProfile};
pub use renumber::{NodeMaps, canonical_cell_order, compact_nodes};
pub use submesh::{MeshPart, entities_fully_in_node_set, split_mesh_levels};
