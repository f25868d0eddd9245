//! Time-dependent fields defined on a mesh.
//!
//! A [`FieldSeries`] is a named sequence of [`FieldStep`]s. Each step holds a
//! tuple array ([`FieldValues`]) laid out one tuple per resident entity, and
//! optionally a [`Profile`] restricting the step to a subset of entities.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::data::discretization::Discretization;
use crate::mesh_error::MeshSplitError;
use crate::topology::mesh::Mesh;

/// Iteration/order/time stamp of a step.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct StepTime {
    pub iteration: i32,
    pub order: i32,
    pub time: f64,
}

impl StepTime {
    pub fn new(iteration: i32, order: i32, time: f64) -> Self {
        Self {
            iteration,
            order,
            time,
        }
    }
}

/// Strictly increasing subset of entity ids on which a step is defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct Profile {
    name: String,
    ids: Vec<usize>,
}

impl Profile {
    /// Build a profile, checking that `ids` is strictly increasing.
    pub fn new(name: impl Into<String>, ids: Vec<usize>) -> Result<Self, MeshSplitError> {
        let name = name.into();
        if let Some(position) = ids.iter().tuple_windows().position(|(a, b)| b <= a) {
            return Err(MeshSplitError::ProfileNotIncreasing {
                name,
                position: position + 1,
            });
        }
        Ok(Self { name, ids })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of entity `id` in the profile.
    #[inline]
    pub fn position(&self, id: usize) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// True when the profile is exactly `0..n`.
    pub fn is_full(&self, n: usize) -> bool {
        // Strictly increasing, so length n and last == n - 1 implies 0..n.
        self.ids.len() == n && self.ids.last().is_none_or(|&l| l + 1 == n)
    }
}

#[derive(Deserialize)]
struct RawProfile {
    name: String,
    ids: Vec<usize>,
}

impl TryFrom<RawProfile> for Profile {
    type Error = MeshSplitError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        Profile::new(raw.name, raw.ids)
    }
}

/// Flat tuple array with a fixed component count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldValues")]
pub struct FieldValues {
    n_components: usize,
    data: Vec<f64>,
}

impl FieldValues {
    /// Wrap `data` as tuples of `n_components` values.
    pub fn new(n_components: usize, data: Vec<f64>) -> Result<Self, MeshSplitError> {
        if n_components == 0 || data.len() % n_components != 0 {
            return Err(MeshSplitError::ComponentMismatch {
                len: data.len(),
                components: n_components,
            });
        }
        Ok(Self { n_components, data })
    }

    /// Single-component values.
    pub fn scalar(data: Vec<f64>) -> Self {
        Self {
            n_components: 1,
            data,
        }
    }

    #[inline]
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    #[inline]
    pub fn n_tuples(&self) -> usize {
        self.data.len() / self.n_components
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Tuple `i`.
    #[inline]
    pub fn tuple(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_components..(i + 1) * self.n_components]
    }

    /// New array holding tuples `ids`, in that order.
    ///
    /// # Panics
    /// Panics if an id is out of range; callers validate ids first.
    pub fn select_tuples(&self, ids: &[usize]) -> Self {
        let mut data = Vec::with_capacity(ids.len() * self.n_components);
        for &i in ids {
            data.extend_from_slice(self.tuple(i));
        }
        Self {
            n_components: self.n_components,
            data,
        }
    }
}

#[derive(Deserialize)]
struct RawFieldValues {
    n_components: usize,
    data: Vec<f64>,
}

impl TryFrom<RawFieldValues> for FieldValues {
    type Error = MeshSplitError;

    fn try_from(raw: RawFieldValues) -> Result<Self, Self::Error> {
        FieldValues::new(raw.n_components, raw.data)
    }
}

/// One timestep of a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldStep {
    time: StepTime,
    discretization: Discretization,
    level: i32,
    values: FieldValues,
    profile: Option<Profile>,
}

impl FieldStep {
    /// Node-resident step.
    pub fn on_nodes(time: StepTime, values: FieldValues) -> Self {
        Self {
            time,
            discretization: Discretization::Nodes,
            level: 0,
            values,
            profile: None,
        }
    }

    /// Cell-resident step (cells, Gauss points or Gauss-per-element) on `level`.
    pub fn on_cells(
        time: StepTime,
        discretization: Discretization,
        level: i32,
        values: FieldValues,
    ) -> Self {
        Self {
            time,
            discretization,
            level,
            values,
            profile: None,
        }
    }

    /// Builder-style profile assignment.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    #[inline]
    pub fn time(&self) -> StepTime {
        self.time
    }

    #[inline]
    pub fn discretization(&self) -> Discretization {
        self.discretization
    }

    /// Level of the supporting cells; meaningless for node steps.
    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    #[inline]
    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    #[inline]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Number of resident tuples.
    #[inline]
    pub fn n_tuples(&self) -> usize {
        self.values.n_tuples()
    }

    /// Check this step of field `field` against `mesh`.
    pub fn validate(&self, field: &str, mesh: &Mesh) -> Result<(), MeshSplitError> {
        let support = self.support_size(mesh)?;
        let expected = match self.profile() {
            Some(pfl) => {
                if let Some(&id) = pfl.ids().last().filter(|&&id| id >= support) {
                    return Err(MeshSplitError::ProfileOutOfRange {
                        name: pfl.name().to_string(),
                        id,
                        n_entities: support,
                    });
                }
                pfl.len()
            }
            None => support,
        };
        if self.n_tuples() != expected {
            return Err(MeshSplitError::FieldSizeMismatch {
                field: field.to_string(),
                iteration: self.time.iteration,
                order: self.time.order,
                tuples: self.n_tuples(),
                expected,
            });
        }
        Ok(())
    }

    /// Copy of this step's metadata with new values and profile.
    pub(crate) fn with_values(&self, values: FieldValues, profile: Option<Profile>) -> Self {
        Self {
            time: self.time,
            discretization: self.discretization,
            level: self.level,
            values,
            profile,
        }
    }

    /// Number of entities of the supporting kind on `mesh`.
    pub fn support_size(&self, mesh: &Mesh) -> Result<usize, MeshSplitError> {
        if self.discretization.is_cell_resident() {
            mesh.n_entities(self.level)
        } else {
            Ok(mesh.n_nodes())
        }
    }
}

/// Named sequence of timesteps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSeries {
    name: String,
    components: Vec<String>,
    steps: Vec<FieldStep>,
}

impl FieldSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Builder-style component names.
    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    #[inline]
    pub fn steps(&self) -> &[FieldStep] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn push_step(&mut self, step: FieldStep) {
        self.steps.push(step);
    }

    /// Empty series sharing this one's name and components.
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            components: self.components.clone(),
            steps: Vec::new(),
        }
    }

    /// Check every step against `mesh`: its level exists, its profile lies
    /// within the supporting entities, and its tuple count matches.
    pub fn validate(&self, mesh: &Mesh) -> Result<(), MeshSplitError> {
        self.steps
            .iter()
            .try_for_each(|step| step.validate(&self.name, mesh))
    }
}
