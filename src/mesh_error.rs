//! MeshSplitError: Unified error type for mesh-splitter public APIs
//!
//! Every variant is a precondition violation: the caller handed the splitter
//! a mesh, field, or assignment that breaks one of its input contracts. A
//! split aborts on the first one; there is no partial result.

use thiserror::Error;

/// Unified error type for mesh splitting operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshSplitError {
    /// A partition references a level-0 cell that does not exist.
    #[error("partition {partition}: cell id {id} out of range (mesh has {n_cells} level-0 cells)")]
    CellIdOutOfRange {
        partition: usize,
        id: usize,
        n_cells: usize,
    },
    /// The same cell id appears twice in one partition's cell set.
    #[error("partition {partition}: cell id {id} listed more than once")]
    DuplicateCellId { partition: usize, id: usize },
    /// An entity id passed to an index utility does not exist on its level.
    #[error("level {level}: entity id {id} out of range ({n_entities} entities)")]
    EntityIdOutOfRange {
        level: i32,
        id: usize,
        n_entities: usize,
    },
    /// A node id passed to an index utility does not exist.
    #[error("node id {id} out of range ({n_nodes} nodes)")]
    NodeOutOfRange { id: usize, n_nodes: usize },
    /// A partition index does not address any entry of the assignment.
    #[error("partition index {index} out of range ({n_parts} partitions)")]
    PartitionIndexOutOfRange { index: usize, n_parts: usize },
    /// A per-cell owner array names a partition beyond the requested count.
    #[error("cell {cell} owned by partition {owner}, but only {n_parts} partitions requested")]
    OwnerOutOfRange {
        cell: usize,
        owner: usize,
        n_parts: usize,
    },
    /// Connectivity references a node missing from the coordinate array.
    #[error("level {level}, entity {entity}: node {node} out of range ({n_nodes} nodes)")]
    NodeIdOutOfRange {
        level: i32,
        entity: usize,
        node: usize,
        n_nodes: usize,
    },
    /// An entity's connectivity length disagrees with its geometric type.
    #[error("level {level}, entity {entity}: expected {expected} nodes, found {found}")]
    ConnectivityLength {
        level: i32,
        entity: usize,
        expected: usize,
        found: usize,
    },
    /// A variable-size entity has fewer nodes than its type allows.
    #[error("level {level}, entity {entity}: at least {min} nodes required, found {found}")]
    TooFewNodes {
        level: i32,
        entity: usize,
        min: usize,
        found: usize,
    },
    /// An entity lists the same node twice.
    #[error("level {level}, entity {entity}: node {node} repeated")]
    RepeatedNode {
        level: i32,
        entity: usize,
        node: usize,
    },
    /// Offsets of a CSR connectivity table are not a valid prefix sum.
    #[error("malformed connectivity offsets: {0}")]
    MalformedOffsets(String),
    /// The number of cell types does not match the number of entities.
    #[error("level {level}: {types} cell types for {entities} entities")]
    CellTypeCount {
        level: i32,
        types: usize,
        entities: usize,
    },
    /// A level was requested that the mesh does not carry.
    #[error("mesh has no level {0}")]
    MissingLevel(i32),
    /// Levels are relative to the top dimension and must not be positive.
    #[error("level {0} is invalid: levels are 0 (cells) or negative (sub-entities)")]
    InvalidLevel(i32),
    /// The mesh carries no level-0 cells at all.
    #[error("mesh has no level-0 cells")]
    MissingTopLevel,
    /// A family array does not have one entry per entity.
    #[error("family array on {what}: expected {expected} entries, found {found}")]
    FamilyLength {
        what: String,
        expected: usize,
        found: usize,
    },
    /// The flat coordinate array is not a whole number of points.
    #[error("coordinate array of length {len} is not a multiple of space dimension {dim}")]
    CoordinateLength { len: usize, dim: usize },
    /// A field step's payload does not match its support.
    #[error(
        "field `{field}` at ({iteration}, {order}): {tuples} tuples for {expected} supporting entities"
    )]
    FieldSizeMismatch {
        field: String,
        iteration: i32,
        order: i32,
        tuples: usize,
        expected: usize,
    },
    /// A field payload's flat length is not a multiple of its component count.
    #[error("field payload of length {len} is not a multiple of {components} components")]
    ComponentMismatch { len: usize, components: usize },
    /// A profile is not strictly increasing.
    #[error("profile `{name}` is not strictly increasing at position {position}")]
    ProfileNotIncreasing { name: String, position: usize },
    /// A profile references an entity beyond its support.
    #[error("profile `{name}`: id {id} out of range ({n_entities} entities)")]
    ProfileOutOfRange {
        name: String,
        id: usize,
        n_entities: usize,
    },
    /// The plain cell-field splitter only handles fields without profiles.
    #[error("field `{0}` carries a cell profile; use the profiled cell path")]
    ProfiledCellField(String),
    /// The plain node-field path was handed a cell-resident field, or vice versa.
    #[error("field `{field}`: discretization {found} not handled here")]
    DiscretizationMismatch { field: String, found: String },
    /// A permutation is not a bijection on `0..len`.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
}
