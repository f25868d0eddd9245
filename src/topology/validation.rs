//! Mesh validation helpers.
//!
//! The splitter assumes every node index in every level is a valid index into
//! the shared coordinate array, and that classification arrays line up with
//! their entities. [`validate_mesh`] checks those contracts up front so that
//! splitting itself can index without further checks.

use crate::mesh_error::MeshSplitError;
use crate::topology::cell_type::CellType;
use crate::topology::mesh::{LevelMesh, Mesh};

/// Optional validation toggles for mesh checks.
#[derive(Debug, Clone, Copy)]
pub struct MeshValidationOptions {
    /// Ensure each entity's node count matches its cell type.
    pub check_node_counts: bool,
    /// How to handle an entity that lists the same node more than once.
    pub repeated_nodes: RepeatedNodeHandling,
}

impl Default for MeshValidationOptions {
    fn default() -> Self {
        Self {
            check_node_counts: true,
            repeated_nodes: RepeatedNodeHandling::Warn,
        }
    }
}

impl MeshValidationOptions {
    /// Enable all checks, failing on every finding.
    pub fn all() -> Self {
        Self {
            check_node_counts: true,
            repeated_nodes: RepeatedNodeHandling::Error,
        }
    }
}

/// Behavior for repeated nodes inside one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatedNodeHandling {
    /// Skip the check.
    Ignore,
    /// Log a warning for each offending entity.
    Warn,
    /// Return an error on the first offending entity.
    Error,
}

/// Validate `mesh` with default options.
pub fn validate_mesh(mesh: &Mesh) -> Result<(), MeshSplitError> {
    validate_mesh_with(mesh, MeshValidationOptions::default())
}

/// Validate every level, the node family array and the top level's presence.
pub fn validate_mesh_with(
    mesh: &Mesh,
    options: MeshValidationOptions,
) -> Result<(), MeshSplitError> {
    if !mesh.has_level(0) {
        return Err(MeshSplitError::MissingTopLevel);
    }
    let dim = mesh.space_dim();
    if dim == 0 || mesh.coords().len() % dim != 0 {
        return Err(MeshSplitError::CoordinateLength {
            len: mesh.coords().len(),
            dim,
        });
    }
    let n_nodes = mesh.n_nodes();
    for (level, lev) in mesh.levels() {
        validate_level(level, lev, n_nodes, options)?;
    }
    if let Some(fams) = mesh.node_families() {
        if fams.len() != n_nodes {
            return Err(MeshSplitError::FamilyLength {
                what: "nodes".into(),
                expected: n_nodes,
                found: fams.len(),
            });
        }
    }
    Ok(())
}

fn validate_level(
    level: i32,
    lev: &LevelMesh,
    n_nodes: usize,
    options: MeshValidationOptions,
) -> Result<(), MeshSplitError> {
    if lev.cell_types().len() != lev.len() {
        return Err(MeshSplitError::CellTypeCount {
            level,
            types: lev.cell_types().len(),
            entities: lev.len(),
        });
    }
    if let Some(fams) = lev.families() {
        if fams.len() != lev.len() {
            return Err(MeshSplitError::FamilyLength {
                what: format!("level {level}"),
                expected: lev.len(),
                found: fams.len(),
            });
        }
    }

    for (entity, (nodes, &ct)) in lev
        .connectivity()
        .iter()
        .zip(lev.cell_types())
        .enumerate()
    {
        if let Some(&node) = nodes.iter().find(|&&n| n >= n_nodes) {
            return Err(MeshSplitError::NodeIdOutOfRange {
                level,
                entity,
                node,
                n_nodes,
            });
        }
        if options.check_node_counts {
            check_node_count(level, entity, ct, nodes.len())?;
        }
        if options.repeated_nodes != RepeatedNodeHandling::Ignore {
            if let Some(node) = first_repeated(nodes) {
                match options.repeated_nodes {
                    RepeatedNodeHandling::Warn => {
                        log::warn!(
                            "Repeated node in entity: level={level} entity={entity} node={node}"
                        );
                    }
                    RepeatedNodeHandling::Error => {
                        return Err(MeshSplitError::RepeatedNode {
                            level,
                            entity,
                            node,
                        });
                    }
                    RepeatedNodeHandling::Ignore => {}
                }
            }
        }
    }
    Ok(())
}

fn check_node_count(
    level: i32,
    entity: usize,
    ct: CellType,
    found: usize,
) -> Result<(), MeshSplitError> {
    match ct.node_count() {
        Some(expected) if expected != found => Err(MeshSplitError::ConnectivityLength {
            level,
            entity,
            expected,
            found,
        }),
        Some(_) => Ok(()),
        None => {
            let min = if ct == CellType::Polygon { 3 } else { 4 };
            if found < min {
                Err(MeshSplitError::TooFewNodes {
                    level,
                    entity,
                    min,
                    found,
                })
            } else {
                Ok(())
            }
        }
    }
}

fn first_repeated(nodes: &[usize]) -> Option<usize> {
    // Entities are small; quadratic scan beats hashing here.
    nodes
        .iter()
        .enumerate()
        .find_map(|(i, n)| nodes[..i].contains(n).then_some(*n))
}
