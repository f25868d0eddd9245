//! Assemble one self-standing bundle per partition.
//!
//! [`split_into_bundles`] validates its inputs, then for every partition of
//! the assignment extracts the mesh levels ([`split_mesh_levels`]) and runs
//! each field step through the handler for its discretization kind. Steps
//! that end up with no tuples are dropped. Bundles come back in assignment
//! order whether or not the partitions were processed in parallel.

use crate::algs::field_split::{PartitionContext, step_splitter};
use crate::algs::node_field::NodeFieldCache;
use crate::algs::submesh::split_mesh_levels;
use crate::data::bundle::PartitionBundle;
use crate::data::field::FieldSeries;
use crate::mesh_error::MeshSplitError;
use crate::partitioning::{PartitionAssignment, PartitionId};
use crate::topology::mesh::Mesh;
use crate::topology::validation::{MeshValidationOptions, validate_mesh_with};

/// What to do with cell-resident steps that carry a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfiledCellPolicy {
    /// Intersect the profile with each partition.
    #[default]
    Split,
    /// Drop every series holding such a step, with a warning.
    Skip,
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Process partitions on the rayon pool. Ignored without the `rayon` feature.
    pub parallel: bool,
    pub profiled_cell_fields: ProfiledCellPolicy,
    /// Leave a series out of a bundle when none of its steps survive.
    pub drop_empty_series: bool,
    /// Checks run on the source mesh before splitting.
    pub validation: MeshValidationOptions,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            profiled_cell_fields: ProfiledCellPolicy::Split,
            drop_empty_series: true,
            validation: MeshValidationOptions::default(),
        }
    }
}

/// Split `mesh` and `fields` into one bundle per partition of `assignment`.
///
/// Fails before producing anything if the mesh, a field step or the
/// assignment is invalid. Any error met while splitting aborts the whole run.
pub fn split_into_bundles(
    mesh: &Mesh,
    fields: &[FieldSeries],
    assignment: &PartitionAssignment,
    config: &SplitConfig,
) -> Result<Vec<PartitionBundle>, MeshSplitError> {
    validate_mesh_with(mesh, config.validation)?;
    for series in fields {
        series.validate(mesh)?;
    }
    assignment.validate(mesh.n_cells())?;

    let series = retained_series(fields, config);
    log::debug!(
        "splitting `{}` into {} partitions, {} of {} field series",
        mesh.name(),
        assignment.n_parts(),
        series.len(),
        fields.len()
    );

    #[cfg(feature = "rayon")]
    if config.parallel {
        use rayon::prelude::*;
        let parts: Vec<_> = assignment.iter().collect();
        return parts
            .into_par_iter()
            .map(|(index, cells)| {
                let mut cache = NodeFieldCache::new();
                assemble(mesh, &series, index, cells, config, &mut cache)
            })
            .collect();
    }

    let mut cache = NodeFieldCache::new();
    let bundles = assignment
        .iter()
        .map(|(index, cells)| assemble(mesh, &series, index, cells, config, &mut cache))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!(
        "node profile cache: {} entries, {} hits, {} misses",
        cache.len(),
        cache.hits(),
        cache.misses()
    );
    Ok(bundles)
}

/// Build the bundle of a single partition made of level-0 cells `cells`.
///
/// Unlike [`split_into_bundles`] this does not validate the mesh or fields
/// up front; ids are still range-checked. `cache` may be shared across calls
/// for different partitions.
pub fn split_partition(
    mesh: &Mesh,
    fields: &[FieldSeries],
    index: PartitionId,
    cells: &[usize],
    config: &SplitConfig,
    cache: &mut NodeFieldCache,
) -> Result<PartitionBundle, MeshSplitError> {
    let series = retained_series(fields, config);
    assemble(mesh, &series, index, cells, config, cache)
}

fn has_profiled_cell_step(series: &FieldSeries) -> bool {
    series
        .steps()
        .iter()
        .any(|s| s.discretization().is_cell_resident() && s.profile().is_some())
}

fn retained_series<'a>(fields: &'a [FieldSeries], config: &SplitConfig) -> Vec<&'a FieldSeries> {
    fields
        .iter()
        .filter(|series| {
            let skip = config.profiled_cell_fields == ProfiledCellPolicy::Skip
                && has_profiled_cell_step(series);
            if skip {
                log::warn!(
                    "field `{}` has a profiled cell step and is not split",
                    series.name()
                );
            }
            !skip
        })
        .collect()
}

fn assemble(
    mesh: &Mesh,
    fields: &[&FieldSeries],
    index: PartitionId,
    cells: &[usize],
    config: &SplitConfig,
    cache: &mut NodeFieldCache,
) -> Result<PartitionBundle, MeshSplitError> {
    let part = split_mesh_levels(mesh, cells)?;
    log::debug!(
        "partition {index}: {} cells, {} nodes, levels {:?}",
        cells.len(),
        part.mesh.n_nodes(),
        part.mesh.level_ids()
    );

    let ctx = PartitionContext {
        index,
        source: mesh,
        part: &part,
        cells,
    };

    let mut out_fields = Vec::with_capacity(fields.len());
    for series in fields {
        let mut out = series.empty_like();
        for step in series.steps() {
            let split = step_splitter(step.discretization());
            match split(&ctx, series.name(), step, cache)? {
                Some(s) if s.n_tuples() > 0 => out.push_step(s),
                _ => {}
            }
        }
        if out.is_empty() && config.drop_empty_series {
            log::debug!("partition {index}: field `{}` has no data here", series.name());
            continue;
        }
        out_fields.push(out);
    }

    let numbering = part.numbering();
    Ok(PartitionBundle {
        partition: index,
        mesh: part.mesh,
        fields: out_fields,
        numbering,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::discretization::Discretization;
    use crate::data::field::{FieldStep, FieldValues, Profile, StepTime};
    use crate::topology::cell_type::CellType;
    use crate::topology::connectivity::Connectivity;
    use crate::topology::mesh::LevelMesh;

    fn line() -> Mesh {
        let mut m = Mesh::new("line", 1, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        m.set_level(
            0,
            LevelMesh::new(
                vec![CellType::Segment; 3],
                Connectivity::from_entities([[0usize, 1], [1, 2], [2, 3]]),
            ),
        )
        .unwrap();
        m.set_level(
            -1,
            LevelMesh::new(
                vec![CellType::Vertex; 2],
                Connectivity::from_entities([[0usize], [3]]),
            ),
        )
        .unwrap();
        m
    }

    fn profiled_cells() -> FieldSeries {
        let mut s = FieldSeries::new("P");
        s.push_step(
            FieldStep::on_cells(
                StepTime::default(),
                Discretization::Cells,
                0,
                FieldValues::scalar(vec![7.0]),
            )
            .with_profile(Profile::new("p", vec![2]).unwrap()),
        );
        s
    }

    #[test]
    fn bundles_follow_assignment_order() {
        let m = line();
        let a = PartitionAssignment::new(vec![vec![2], vec![0, 1]]);
        let bundles = split_into_bundles(&m, &[], &a, &SplitConfig::default()).unwrap();
        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles[0].partition, 0);
        assert_eq!(bundles[0].numbering.nodes, vec![2, 3]);
        assert_eq!(bundles[1].numbering.nodes, vec![0, 1, 2]);
        assert_eq!(bundles[0].numbering.entities[&-1], vec![1]);
        assert_eq!(bundles[1].numbering.entities[&-1], vec![0]);
    }

    #[test]
    fn empty_steps_and_series_are_dropped() {
        let m = line();
        let a = PartitionAssignment::new(vec![vec![0], vec![2]]);
        let fields = [profiled_cells()];
        let bundles = split_into_bundles(&m, &fields, &a, &SplitConfig::default()).unwrap();
        assert!(bundles[0].field("P").is_none());
        let p = bundles[1].field("P").unwrap();
        assert_eq!(p.steps()[0].profile().unwrap().ids(), &[0]);

        let keep = SplitConfig {
            drop_empty_series: false,
            ..Default::default()
        };
        let bundles = split_into_bundles(&m, &fields, &a, &keep).unwrap();
        assert!(bundles[0].field("P").unwrap().is_empty());
    }

    #[test]
    fn skip_policy_drops_profiled_cell_series() {
        let m = line();
        let a = PartitionAssignment::new(vec![vec![0, 1, 2]]);
        let config = SplitConfig {
            profiled_cell_fields: ProfiledCellPolicy::Skip,
            ..Default::default()
        };
        let bundles = split_into_bundles(&m, &[profiled_cells()], &a, &config).unwrap();
        assert_eq!(bundles[0].field_names().count(), 0);
    }

    #[test]
    fn invalid_assignment_fails_before_splitting() {
        let m = line();
        let a = PartitionAssignment::new(vec![vec![0], vec![3]]);
        assert_eq!(
            split_into_bundles(&m, &[], &a, &SplitConfig::default()),
            Err(MeshSplitError::CellIdOutOfRange {
                partition: 1,
                id: 3,
                n_cells: 3
            })
        );
    }
}
