//! Field data carried alongside the mesh, and the per-partition bundle.

pub mod bundle;
pub mod discretization;
pub mod field;

pub use bundle::{GlobalNumbering, PartitionBundle};
pub use discretization::Discretization;
pub use field::{FieldSeries, FieldStep, FieldValues, Profile, StepTime};
