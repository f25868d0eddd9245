//! Cell-resident field splitting and the per-kind dispatch table.
//!
//! Cell, Gauss-point and Gauss-per-element steps all carry one tuple per
//! entity of some level, so they share one handler. Node steps go through
//! [`split_node_step`]. [`step_splitter`] picks the handler for a
//! [`Discretization`] from a fixed table.

use crate::algs::node_field::{NodeFieldCache, split_node_step};
use crate::algs::renumber::{canonical_order_of, check_entity_ids, is_identity, renumber_tuples};
use crate::algs::submesh::MeshPart;
use crate::data::discretization::Discretization;
use crate::data::field::{FieldStep, Profile};
use crate::mesh_error::MeshSplitError;
use crate::partitioning::PartitionId;
use crate::topology::mesh::Mesh;

/// Everything a step handler needs to know about the partition it fills.
#[derive(Clone, Copy, Debug)]
pub struct PartitionContext<'a> {
    /// Position of the partition in the assignment.
    pub index: PartitionId,
    /// Mesh being split.
    pub source: &'a Mesh,
    /// Mesh and maps of this partition.
    pub part: &'a MeshPart,
    /// Level-0 cells of this partition, as assigned.
    pub cells: &'a [usize],
}

impl<'a> PartitionContext<'a> {
    /// Source entities of `level` taken by this partition, in extraction order.
    pub fn extracted(&self, level: i32) -> Result<&'a [usize], MeshSplitError> {
        if level == 0 {
            Ok(self.cells)
        } else {
            self.part.selection(level)
        }
    }
}

/// Handler restricting one step of a named field to one partition.
///
/// `Ok(None)` means the step contributes nothing to the partition.
pub type StepSplitter = fn(
    &PartitionContext<'_>,
    &str,
    &FieldStep,
    &mut NodeFieldCache,
) -> Result<Option<FieldStep>, MeshSplitError>;

/// Handlers indexed by [`Discretization::index`].
pub const STEP_SPLITTERS: [StepSplitter; 4] = [
    split_cell_resident,
    split_node_resident,
    split_cell_resident,
    split_cell_resident,
];

/// Handler for steps of kind `kind`.
#[inline]
pub fn step_splitter(kind: Discretization) -> StepSplitter {
    STEP_SPLITTERS[kind.index()]
}

fn split_cell_resident(
    ctx: &PartitionContext<'_>,
    field: &str,
    step: &FieldStep,
    _cache: &mut NodeFieldCache,
) -> Result<Option<FieldStep>, MeshSplitError> {
    let out = match step.profile() {
        None => split_cell_step(field, step, ctx.source, ctx.extracted(step.level())?)?,
        Some(_) => split_profiled_cell_step(field, step, ctx.source, ctx.part)?,
    };
    Ok(Some(out))
}

fn split_node_resident(
    ctx: &PartitionContext<'_>,
    field: &str,
    step: &FieldStep,
    cache: &mut NodeFieldCache,
) -> Result<Option<FieldStep>, MeshSplitError> {
    split_node_step(field, step, ctx.source, ctx.part, ctx.index, cache)
}

fn check_cell_resident(field: &str, step: &FieldStep) -> Result<(), MeshSplitError> {
    if step.discretization().is_cell_resident() {
        Ok(())
    } else {
        Err(MeshSplitError::DiscretizationMismatch {
            field: field.to_string(),
            found: step.discretization().to_string(),
        })
    }
}

/// Restrict an unprofiled cell-resident step to the entities `ids` of its
/// level, then reorder the tuples into canonical cell order.
///
/// `ids` are source entity ids in extraction order. A profiled step is
/// rejected with [`MeshSplitError::ProfiledCellField`]; see
/// [`split_profiled_cell_step`].
pub fn split_cell_step(
    field: &str,
    step: &FieldStep,
    source: &Mesh,
    ids: &[usize],
) -> Result<FieldStep, MeshSplitError> {
    check_cell_resident(field, step)?;
    if step.profile().is_some() {
        return Err(MeshSplitError::ProfiledCellField(field.to_string()));
    }
    step.validate(field, source)?;

    let level = source.level(step.level())?;
    check_entity_ids(step.level(), ids, level.len())?;

    let extracted = step.values().select_tuples(ids);
    let types: Vec<_> = ids.iter().map(|&e| level.cell_types()[e]).collect();
    let o2n = canonical_order_of(&types);
    let values = if is_identity(&o2n) {
        extracted
    } else {
        renumber_tuples(&extracted, &o2n)?
    };
    Ok(step.with_values(values, None))
}

/// Restrict a profiled cell-resident step to partition `part`.
///
/// The new profile lists, in increasing order, the partition-local entities
/// of the step's level whose source id is in the source profile; it keeps
/// the source profile's name. Tuples follow the new profile.
pub fn split_profiled_cell_step(
    field: &str,
    step: &FieldStep,
    source: &Mesh,
    part: &MeshPart,
) -> Result<FieldStep, MeshSplitError> {
    check_cell_resident(field, step)?;
    let Some(profile) = step.profile() else {
        return split_cell_step(field, step, source, part.selection(step.level())?);
    };
    step.validate(field, source)?;

    let mut local = Vec::new();
    let mut positions = Vec::new();
    for (i, &src) in part.selection(step.level())?.iter().enumerate() {
        if let Some(pos) = profile.position(src) {
            local.push(i);
            positions.push(pos);
        }
    }
    let values = step.values().select_tuples(&positions);
    let profile = Profile::new(profile.name(), local)?;
    Ok(step.with_values(values, Some(profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::submesh::split_mesh_levels;
    use crate::data::field::{FieldValues, StepTime};
    use crate::topology::cell_type::CellType;
    use crate::topology::connectivity::Connectivity;
    use crate::topology::mesh::LevelMesh;

    //  3---4---5
    //  | 0 | 2/|
    //  |   | /1|
    //  0---1---2
    fn mixed() -> Mesh {
        let coords = vec![0., 0., 1., 0., 2., 0., 0., 1., 1., 1., 2., 1.];
        let mut m = Mesh::new("mixed", 2, coords).unwrap();
        m.set_level(
            0,
            LevelMesh::new(
                vec![CellType::Quadrilateral, CellType::Triangle, CellType::Triangle],
                Connectivity::from_entities([
                    vec![0usize, 1, 4, 3],
                    vec![1, 2, 5],
                    vec![1, 5, 4],
                ]),
            ),
        )
        .unwrap();
        m.set_level(
            -1,
            LevelMesh::new(
                vec![CellType::Segment; 3],
                Connectivity::from_entities([[0usize, 1], [1, 4], [2, 5]]),
            ),
        )
        .unwrap();
        m
    }

    fn cell_step(level: i32, data: Vec<f64>) -> FieldStep {
        FieldStep::on_cells(
            StepTime::new(3, -1, 0.5),
            Discretization::Cells,
            level,
            FieldValues::scalar(data),
        )
    }

    #[test]
    fn cell_values_follow_canonical_order() {
        let m = mixed();
        let step = cell_step(0, vec![10.0, 11.0, 12.0]);
        let out = split_cell_step("P", &step, &m, &[0, 2]).unwrap();
        // Triangle 2 moves ahead of quad 0.
        assert_eq!(out.values().data(), &[12.0, 10.0]);
        assert_eq!(out.time(), step.time());
    }

    #[test]
    fn dispatch_matches_mesh_split() {
        let m = mixed();
        let cells = [0, 2];
        let part = split_mesh_levels(&m, &cells).unwrap();
        let ctx = PartitionContext {
            index: 0,
            source: &m,
            part: &part,
            cells: &cells,
        };
        let mut cache = NodeFieldCache::new();
        let step = cell_step(0, vec![10.0, 11.0, 12.0]);
        let out = step_splitter(Discretization::Cells)(&ctx, "P", &step, &mut cache)
            .unwrap()
            .unwrap();
        let expected: Vec<f64> = part
            .selection(0)
            .unwrap()
            .iter()
            .map(|&c| 10.0 + c as f64)
            .collect();
        assert_eq!(out.values().data(), expected.as_slice());

        // Faces [0,1] and [1,4] are retained; [2,5] is not.
        let faces = cell_step(-1, vec![20.0, 21.0, 22.0]);
        let out = step_splitter(Discretization::Cells)(&ctx, "F", &faces, &mut cache)
            .unwrap()
            .unwrap();
        assert_eq!(out.values().data(), &[20.0, 21.0]);
    }

    #[test]
    fn profiled_cell_step_is_rejected_by_plain_path() {
        let m = mixed();
        let step = cell_step(0, vec![1.0]).with_profile(Profile::new("p", vec![1]).unwrap());
        assert_eq!(
            split_cell_step("P", &step, &m, &[1]),
            Err(MeshSplitError::ProfiledCellField("P".into()))
        );
    }

    #[test]
    fn profiled_cell_step_keeps_local_profile() {
        let m = mixed();
        let part = split_mesh_levels(&m, &[2, 0]).unwrap();
        // Canonical local order: triangle 2, then quad 0.
        assert_eq!(part.selection(0).unwrap(), &[2, 0]);
        let step = cell_step(0, vec![5.0, 6.0]).with_profile(Profile::new("p", vec![0, 1]).unwrap());
        let out = split_profiled_cell_step("P", &step, &m, &part).unwrap();
        assert_eq!(out.profile().unwrap().ids(), &[1]);
        assert_eq!(out.profile().unwrap().name(), "p");
        assert_eq!(out.values().data(), &[5.0]);
    }

    #[test]
    fn missing_level_is_a_mismatch() {
        let m = mixed();
        let step = cell_step(-2, vec![]);
        assert_eq!(
            split_cell_step("P", &step, &m, &[]),
            Err(MeshSplitError::MissingLevel(-2))
        );
    }

    #[test]
    fn node_step_is_rejected_by_cell_path() {
        let m = mixed();
        let step = FieldStep::on_nodes(StepTime::default(), FieldValues::scalar(vec![0.0; 6]));
        assert!(matches!(
            split_cell_step("T", &step, &m, &[0]),
            Err(MeshSplitError::DiscretizationMismatch { .. })
        ));
    }
}
