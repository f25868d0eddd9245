//! Node-resident field splitting.
//!
//! An unprofiled node field is restricted to a partition by reading its
//! tuples through the partition's node map. A profiled one first needs its
//! profile tied to the mesh: the *anchor level* is the most detailed level on
//! which the entities lying fully inside the profile cover exactly the
//! profile's nodes. Finding it scans whole levels, so the outcome (together
//! with the partition's sub-profile) is memoized in a [`NodeFieldCache`] and
//! every further timestep of the series only gathers tuples.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::algs::submesh::{MeshPart, entities_fully_in_node_set, node_mask};
use crate::data::discretization::Discretization;
use crate::data::field::{FieldStep, Profile};
use crate::mesh_error::MeshSplitError;
use crate::topology::mesh::Mesh;

/// Cache key for one profiled node field on one partition.
///
/// The profile name is part of the key so that a series switching profiles
/// between steps resolves each profile separately.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeFieldKey {
    pub field: String,
    pub profile: String,
    pub partition: usize,
}

impl NodeFieldKey {
    pub fn new(field: &str, profile: &str, partition: usize) -> Self {
        Self {
            field: field.to_string(),
            profile: profile.to_string(),
            partition,
        }
    }
}

/// Outcome of tying a node profile to the mesh for one partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeProfileResolution {
    /// The profile matches whole entities of `anchor_level`.
    Resolved(ResolvedNodeProfile),
    /// No level reconstructs the profile; the field is skipped.
    Irrelevant,
}

/// Cached restriction of a node profile to one partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedNodeProfile {
    /// Most detailed level whose entities reconstruct the profile exactly.
    pub anchor_level: i32,
    /// `positions[k]` is the index in the source profile of sub-profile node `k`.
    pub positions: Vec<usize>,
    /// Nodes of the `support` entities, in partition node ids (ascending).
    pub sub_profile: Vec<usize>,
    /// Partition-local entities of the anchor level lying fully inside the
    /// profile.
    pub support: Vec<usize>,
}

/// Resolution cache for profiled node fields, owned by one split invocation.
#[derive(Debug, Default)]
pub struct NodeFieldCache {
    entries: HashMap<NodeFieldKey, NodeProfileResolution>,
    hits: usize,
    misses: usize,
}

impl NodeFieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached resolution for `key`, if any.
    pub fn get(&self, key: &NodeFieldKey) -> Option<&NodeProfileResolution> {
        self.entries.get(key)
    }

    /// Cached resolution for `key`, computing and storing it on first use.
    pub fn get_or_resolve<F>(
        &mut self,
        key: NodeFieldKey,
        resolve: F,
    ) -> Result<&NodeProfileResolution, MeshSplitError>
    where
        F: FnOnce() -> Result<NodeProfileResolution, MeshSplitError>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(o) => {
                self.hits += 1;
                Ok(&*o.into_mut())
            }
            Entry::Vacant(v) => {
                self.misses += 1;
                Ok(&*v.insert(resolve()?))
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    #[inline]
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that had to resolve.
    #[inline]
    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// Most detailed level of `mesh` whose entities lying fully inside `profile`
/// reference exactly the profile's nodes.
///
/// Levels are tried from the most negative up to 0 and the first match wins,
/// even if a coarser level would also match.
pub fn find_anchor_level(mesh: &Mesh, profile: &Profile) -> Result<Option<i32>, MeshSplitError> {
    let n_nodes = mesh.n_nodes();
    let in_profile = node_mask(profile.ids(), n_nodes)?;
    let mut covered = vec![false; n_nodes];
    for (level, lev) in mesh.levels() {
        covered.fill(false);
        let mut n_covered = 0;
        for e in entities_fully_in_node_set(lev, &in_profile) {
            for &n in lev.entity(e) {
                if !covered[n] {
                    covered[n] = true;
                    n_covered += 1;
                }
            }
        }
        // Every covered node is in the profile, so equal counts mean equal sets.
        if n_covered == profile.len() {
            return Ok(Some(level));
        }
    }
    Ok(None)
}

/// Tie `profile` to the mesh and restrict it to partition `part`.
pub fn resolve_node_profile(
    mesh: &Mesh,
    part: &MeshPart,
    profile: &Profile,
) -> Result<NodeProfileResolution, MeshSplitError> {
    let Some(anchor_level) = find_anchor_level(mesh, profile)? else {
        return Ok(NodeProfileResolution::Irrelevant);
    };

    let retained: Vec<usize> = profile
        .ids()
        .iter()
        .filter_map(|&parent| part.maps.to_sub(parent))
        .collect();
    let local_mask = node_mask(&retained, part.mesh.n_nodes())?;
    let anchor = part.mesh.level(anchor_level)?;
    let support = entities_fully_in_node_set(anchor, &local_mask);

    // Only nodes of whole anchor entities survive, so the sub-profile
    // resolves again on the partition mesh.
    let mut in_support = vec![false; part.mesh.n_nodes()];
    for &e in &support {
        for &n in anchor.entity(e) {
            in_support[n] = true;
        }
    }
    let mut sub_profile = Vec::new();
    let mut positions = Vec::new();
    for (sub, _) in in_support.iter().enumerate().filter(|(_, kept)| **kept) {
        let pos = part
            .maps
            .to_parent(sub)
            .and_then(|parent| profile.position(parent))
            .ok_or_else(|| {
                MeshSplitError::InvalidPermutation(format!(
                    "partition node {sub} outside profile `{}`",
                    profile.name()
                ))
            })?;
        sub_profile.push(sub);
        positions.push(pos);
    }

    Ok(NodeProfileResolution::Resolved(ResolvedNodeProfile {
        anchor_level,
        positions,
        sub_profile,
        support,
    }))
}

/// Restrict one node-resident step of `field` to partition `partition`.
///
/// Returns `None` when the step's profile is irrelevant to the mesh, or when
/// the partition holds no anchor-level entity lying fully inside it.
pub fn split_node_step(
    field: &str,
    step: &FieldStep,
    source: &Mesh,
    part: &MeshPart,
    partition: usize,
    cache: &mut NodeFieldCache,
) -> Result<Option<FieldStep>, MeshSplitError> {
    if step.discretization() != Discretization::Nodes {
        return Err(MeshSplitError::DiscretizationMismatch {
            field: field.to_string(),
            found: step.discretization().to_string(),
        });
    }
    step.validate(field, source)?;

    let profile = match step.profile() {
        Some(p) if !p.is_full(source.n_nodes()) => p,
        _ => {
            let values = step.values().select_tuples(&part.maps.sub_to_parent);
            return Ok(Some(step.with_values(values, None)));
        }
    };

    let key = NodeFieldKey::new(field, profile.name(), partition);
    let resolution =
        cache.get_or_resolve(key, || resolve_node_profile(source, part, profile))?;
    match resolution {
        NodeProfileResolution::Irrelevant => {
            log::debug!(
                "field `{field}`: profile `{}` matches no mesh level, skipped on partition {partition}",
                profile.name()
            );
            Ok(None)
        }
        NodeProfileResolution::Resolved(r) if r.support.is_empty() => Ok(None),
        NodeProfileResolution::Resolved(r) => {
            let values = step.values().select_tuples(&r.positions);
            let sub_profile = Profile::new(profile.name(), r.sub_profile.clone())?;
            Ok(Some(step.with_values(values, Some(sub_profile))))
        }
    }
}
