//! Bone collection and hierarchy inference.
//!
//! Collection seeds a [`MappingConfig`] with one unresolved entry per source bone.
//! Inference then anchors on landmarks found in both skeletons and walks both chains
//! toward their roots in lock-step, assigning each source bone the target bone at the
//! same depth above the landmark. A walk stops when either chain runs out or when it
//! reaches an entry an earlier walk already resolved.

use crate::error::StructuralError;
use crate::models::{BoneGraph, MappingConfig};
use crate::services::extremity::{Landmark, find_landmarks};

/// Result of one inference pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceStats {
    /// Landmarks present in both skeletons
    pub matched_landmarks: Vec<Landmark>,

    /// Entries whose target was set by this pass
    pub resolved: usize,
}

fn ensure_unique_names<G: BoneGraph>(graph: &G) -> Result<(), StructuralError> {
    let mut seen = std::collections::HashSet::new();
    for bone in graph.bone_ids() {
        let name = graph.bone_name(bone);
        if !seen.insert(name) {
            return Err(StructuralError::DuplicateSource(name.to_string()));
        }
    }
    Ok(())
}

/// Replace the mapping's entries with one unresolved entry per bone of `skeleton`.
///
/// Fails without touching `config` if the skeleton repeats a bone name.
pub fn collect_from_single<G: BoneGraph>(
    config: &mut MappingConfig,
    skeleton: &G,
) -> Result<(), StructuralError> {
    ensure_unique_names(skeleton)?;

    config.clear();
    for bone in skeleton.bone_ids() {
        config.push_source(skeleton.bone_name(bone))?;
    }

    tracing::info!(
        "Collected {} bones from '{}'",
        config.len(),
        skeleton.graph_name()
    );
    Ok(())
}

/// Collect the source skeleton's bones, then infer targets from `target`.
///
/// Uses the mapping's own prefixes for landmark detection.
pub fn collect_from_pair<S: BoneGraph, T: BoneGraph>(
    config: &mut MappingConfig,
    source: &S,
    target: &T,
) -> Result<InferenceStats, StructuralError> {
    collect_from_single(config, source)?;
    let stats = infer_hierarchy(config, source, target)?;

    tracing::info!(
        "Inferred {} of {} targets from '{}' -> '{}' ({} landmarks matched)",
        stats.resolved,
        config.len(),
        source.graph_name(),
        target.graph_name(),
        stats.matched_landmarks.len()
    );
    Ok(stats)
}

/// Co-walk matching landmark chains of `source` and `target`, filling targets in
/// `config`.
///
/// Entries are looked up with [`MappingConfig::add_or_get`], so bones the mapping
/// does not list yet are appended. An entry that already has a target ends the
/// current walk; existing targets are never overwritten.
pub fn infer_hierarchy<S: BoneGraph, T: BoneGraph>(
    config: &mut MappingConfig,
    source: &S,
    target: &T,
) -> Result<InferenceStats, StructuralError> {
    let src_landmarks = find_landmarks(source, &config.prefix_src);
    let tgt_landmarks = find_landmarks(target, &config.prefix_tgt);

    let mut stats = InferenceStats::default();

    for landmark in Landmark::ALL {
        let (Some(&src_start), Some(&tgt_start)) =
            (src_landmarks.get(&landmark), tgt_landmarks.get(&landmark))
        else {
            continue;
        };
        stats.matched_landmarks.push(landmark);

        let mut src_bone = Some(src_start);
        let mut tgt_bone = Some(tgt_start);
        while let (Some(src), Some(tgt)) = (src_bone, tgt_bone) {
            let entry = config.add_or_get(source.bone_name(src))?;
            if entry.is_resolved() {
                tracing::debug!(
                    "Walk from {} stopped at '{}', already mapped to '{}'",
                    landmark,
                    entry.source(),
                    entry.target()
                );
                break;
            }
            entry.set_target(target.bone_name(tgt));
            stats.resolved += 1;

            src_bone = source.parent(src);
            tgt_bone = target.parent(tgt);
        }
    }

    Ok(stats)
}
