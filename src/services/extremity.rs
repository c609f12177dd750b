//! Landmark detection for hierarchy inference.
//!
//! A landmark is a distal bone (head, a hand or a foot) recognised from its name. Names
//! are compared after stripping the skeleton's naming prefix and lowercasing.
//!
//! Laterality is decided by plain letter containment: a hand or foot name containing
//! `r` is a right-side candidate, otherwise one containing `l` is a left-side
//! candidate. This is a heuristic and misreads names with incidental letters
//! (`forearm`, `collar`). Saved mapping files depend on the current rule, so it is
//! kept as is.

use crate::models::{BoneGraph, BoneId};
use std::collections::BTreeMap;
use std::fmt;

/// Anchor bones used to start a co-walk. Declaration order is the walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Landmark {
    Head,
    HandL,
    HandR,
    FootL,
    FootR,
}

impl Landmark {
    pub const ALL: [Landmark; 5] = [
        Landmark::Head,
        Landmark::HandL,
        Landmark::HandR,
        Landmark::FootL,
        Landmark::FootR,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Landmark::Head => "head",
            Landmark::HandL => "hand_l",
            Landmark::HandR => "hand_r",
            Landmark::FootL => "foot_l",
            Landmark::FootR => "foot_r",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Landmarks found in one skeleton, iterated in [`Landmark::ALL`] order
pub type LandmarkMap = BTreeMap<Landmark, BoneId>;

/// Strip `prefix` if present and lowercase the rest
fn normalized_name(name: &str, prefix: &str) -> String {
    name.strip_prefix(prefix).unwrap_or(name).to_lowercase()
}

/// Record `bone` as `side` unless the opposite side's bone is an ancestor of `bone`
/// (both would sit on the same chain).
fn record_lateral<G: BoneGraph>(
    graph: &G,
    bone: BoneId,
    side: Landmark,
    opposite: Landmark,
    landmarks: &mut LandmarkMap,
) {
    match landmarks.get(&opposite) {
        Some(&other) if graph.is_ancestor(other, bone) => {
            tracing::debug!(
                "Rejected '{}' as {}: {} bone '{}' is its ancestor",
                graph.bone_name(bone),
                side,
                opposite,
                graph.bone_name(other)
            );
        }
        _ => {
            tracing::debug!("Landmark {} = '{}'", side, graph.bone_name(bone));
            landmarks.insert(side, bone);
        }
    }
}

/// Classify one limb candidate (hand or foot) by laterality
fn classify_limb<G: BoneGraph>(
    graph: &G,
    bone: BoneId,
    name: &str,
    (left, right): (Landmark, Landmark),
    landmarks: &mut LandmarkMap,
) {
    if name.contains('r') && !landmarks.contains_key(&right) {
        record_lateral(graph, bone, right, left, landmarks);
    } else if name.contains('l') && !landmarks.contains_key(&left) {
        record_lateral(graph, bone, left, right, landmarks);
    }
}

/// Check one bone against the landmark heuristics and record it if it qualifies.
///
/// `landmarks` accumulates across all bones of one skeleton; the first bone to
/// qualify for a landmark keeps it.
pub fn find_extremities<G: BoneGraph>(
    graph: &G,
    bone: BoneId,
    prefix: &str,
    landmarks: &mut LandmarkMap,
) {
    let name = normalized_name(graph.bone_name(bone), prefix);

    if name.contains("head") && !landmarks.contains_key(&Landmark::Head) {
        tracing::debug!("Landmark head = '{}'", graph.bone_name(bone));
        landmarks.insert(Landmark::Head, bone);
    } else if name.contains("hand") {
        classify_limb(graph, bone, &name, (Landmark::HandL, Landmark::HandR), landmarks);
    } else if name.contains("foot") {
        classify_limb(graph, bone, &name, (Landmark::FootL, Landmark::FootR), landmarks);
    }
}

/// Run [`find_extremities`] over every bone of `graph` in bone order
pub fn find_landmarks<G: BoneGraph>(graph: &G, prefix: &str) -> LandmarkMap {
    let mut landmarks = LandmarkMap::new();
    for bone in graph.bone_ids() {
        find_extremities(graph, bone, prefix, &mut landmarks);
    }
    landmarks
}
