//! Mesh topology: cell types, CSR connectivity, multi-level meshes and their
//! family/group classification.
//!
//! Most users build a [`Mesh`] level by level with [`Mesh::set_level`] and
//! check it with [`validate_mesh`].

pub mod cell_type;
pub mod connectivity;
pub mod families;
pub mod mesh;
pub mod validation;

pub use cell_type::CellType;
pub use connectivity::Connectivity;
pub use families::FamilyGroups;
pub use mesh::{LevelMesh, Mesh};
pub use validation::{MeshValidationOptions, RepeatedNodeHandling, validate_mesh, validate_mesh_with};
