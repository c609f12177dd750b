use crate::error::{StructuralError, TransferError};
use crate::models::{Action, ActionSlot, BoneGraph, FCurve, MappingConfig, Side};
use crate::services::validation::{check_action, check_against};

/// Outcome of remapping one action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    /// Curves rewritten to a target bone
    pub kept: usize,

    /// Curves discarded because their bone has no target
    pub dropped: usize,

    /// Bones whose curves were discarded, in first-seen order
    pub dropped_bones: Vec<String>,
}

impl RemapReport {
    pub fn has_drops(&self) -> bool {
        self.dropped > 0
    }

    /// Get a summary string of the remap
    pub fn summary(&self) -> String {
        if self.dropped == 0 {
            format!("{} curves remapped", self.kept)
        } else {
            format!(
                "{} curves remapped, {} dropped ({})",
                self.kept,
                self.dropped,
                self.dropped_bones.join(", ")
            )
        }
    }
}

/// Rewrites the bone references in an action's curves.
///
/// Remapping is all-or-nothing: every curve is decoded and rewritten into a buffer
/// first, and the action is only touched once every curve decoded.
#[derive(Debug, Default)]
pub struct CurveRemapper;

impl CurveRemapper {
    pub fn new() -> Self {
        Self
    }

    /// Rename the bone in each curve of `action` to its mapped target.
    ///
    /// Curves whose bone has no entry, or an entry without target, are removed.
    /// If any data path is malformed the action is left exactly as it was.
    pub fn remap(
        &self,
        config: &MappingConfig,
        action: &mut Action,
    ) -> Result<RemapReport, StructuralError> {
        let mut output: Vec<FCurve> = Vec::with_capacity(action.curves.len());
        let mut report = RemapReport::default();

        // Consecutive curves usually animate the same bone
        let mut cached: Option<(&str, Option<&str>)> = None;

        for curve in &action.curves {
            let path = curve.decode_path()?;

            let target = match cached {
                Some((bone, target)) if bone == path.bone => target,
                _ => {
                    let target = config.target_of(path.bone);
                    cached = Some((path.bone, target));
                    target
                }
            };

            match target {
                Some(target) => {
                    let mut rewritten = curve.clone();
                    rewritten.data_path = path.with_bone(target);
                    output.push(rewritten);
                    report.kept += 1;
                }
                None => {
                    report.dropped += 1;
                    if !report.dropped_bones.iter().any(|b| b == path.bone) {
                        tracing::warn!(
                            "Dropping curves for unmapped bone '{}' in action '{}'",
                            path.bone,
                            action.name
                        );
                        report.dropped_bones.push(path.bone.to_string());
                    }
                }
            }
        }

        action.curves = output;
        Ok(report)
    }
}

/// A remapped working copy of an action plus what happened to its curves
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub action: Action,
    pub report: RemapReport,
}

/// Name given to the working copy of `action` transferred onto `destination`
pub fn transferred_action_name(action: &str, destination: Option<&str>) -> String {
    match destination {
        Some(destination) => format!("{}_{}", action, destination),
        None => format!("{}_transferred", action),
    }
}

/// Validate, copy and remap `action`, then point `destination` at the copy.
///
/// The original action is never modified. On any error nothing is produced and
/// `destination` keeps its current action.
pub fn transfer_action<D>(
    config: &MappingConfig,
    action: &Action,
    destination: Option<&mut D>,
) -> Result<TransferOutcome, TransferError>
where
    D: BoneGraph + ActionSlot,
{
    check_action(config, action)?;
    if let Some(destination) = destination.as_deref() {
        check_against(config, destination, Side::Target)?;
    }

    let name = transferred_action_name(
        &action.name,
        destination.as_deref().map(|d| d.graph_name()),
    );
    let mut working = action.duplicate(name);
    let slot = destination.map(|d| d as &mut dyn ActionSlot);
    let report = remap_into_slot(config, &mut working, slot)?;

    tracing::info!(
        "Transferred action '{}' -> '{}': {}",
        action.name,
        working.name,
        report.summary()
    );
    Ok(TransferOutcome {
        action: working,
        report,
    })
}

/// Remap a working copy and, on success, make it the slot's active action.
///
/// No validation happens here; [`transfer_action`] validates first.
pub fn remap_into_slot(
    config: &MappingConfig,
    working: &mut Action,
    slot: Option<&mut dyn ActionSlot>,
) -> Result<RemapReport, StructuralError> {
    let report = CurveRemapper::new().remap(config, working)?;
    if let Some(slot) = slot {
        slot.set_active_action(&working.name);
    }
    Ok(report)
}
