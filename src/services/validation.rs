//! Checks run before a transfer.
//!
//! The `check_*` functions return the first problem found with a readable reason;
//! the `validate_*` wrappers reduce that to pass/fail.

use crate::error::{TransferError, ValidationError};
use crate::models::{Action, BoneGraph, MappingConfig, Side};

/// Every non-empty name on `side` must be a bone of `skeleton`, and there must be at
/// least one such name
pub fn check_against<G: BoneGraph>(
    config: &MappingConfig,
    skeleton: &G,
    side: Side,
) -> Result<(), ValidationError> {
    let mut count = 0;
    for name in config.names(side) {
        if !skeleton.contains_bone(name) {
            return Err(ValidationError::MissingBone {
                side,
                bone: name.to_string(),
                skeleton: skeleton.graph_name().to_string(),
            });
        }
        count += 1;
    }

    if count == 0 {
        return Err(ValidationError::NoMappedBones(side));
    }
    Ok(())
}

pub fn validate_against<G: BoneGraph>(config: &MappingConfig, skeleton: &G, side: Side) -> bool {
    check_against(config, skeleton, side).is_ok()
}

/// Every curve of `action` must decode to a bone that is a source in `config`
pub fn check_action(config: &MappingConfig, action: &Action) -> Result<(), TransferError> {
    for curve in &action.curves {
        let path = curve.decode_path()?;
        if config.find(path.bone).is_none() {
            return Err(ValidationError::UnmappedActionBone {
                action: action.name.clone(),
                bone: path.bone.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

pub fn validate_action(config: &MappingConfig, action: &Action) -> bool {
    check_action(config, action).is_ok()
}

/// Every entry must have a target
pub fn check_complete(config: &MappingConfig) -> Result<(), ValidationError> {
    let total = config.len();
    let unresolved = total - config.resolved_count();
    if total == 0 || unresolved > 0 {
        return Err(ValidationError::Incomplete { unresolved, total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StructuralError;
    use crate::models::{FCurve, Skeleton};

    fn target_rig() -> Skeleton {
        Skeleton::from_named_bones("Tgt", [("pelvis", None), ("LeftHand", Some("pelvis"))])
            .unwrap()
    }

    #[test]
    fn test_zero_names_fails() {
        let config = MappingConfig::from_pairs("", "", [("Hips", ""), ("Hand_L", "")]).unwrap();
        assert!(!validate_against(&config, &target_rig(), Side::Target));
        assert_eq!(
            check_against(&config, &target_rig(), Side::Target),
            Err(ValidationError::NoMappedBones(Side::Target))
        );
    }

    #[test]
    fn test_all_present_passes() {
        let config =
            MappingConfig::from_pairs("", "", [("Hips", "pelvis"), ("Hand_L", "LeftHand"), ("Tail", "")])
                .unwrap();
        assert!(validate_against(&config, &target_rig(), Side::Target));
    }

    #[test]
    fn test_missing_bone_fails() {
        let config =
            MappingConfig::from_pairs("", "", [("Hips", "pelvis"), ("Hand_L", "LeftHnd")]).unwrap();
        assert_eq!(
            check_against(&config, &target_rig(), Side::Target),
            Err(ValidationError::MissingBone {
                side: Side::Target,
                bone: "LeftHnd".to_string(),
                skeleton: "Tgt".to_string()
            })
        );
    }

    #[test]
    fn test_source_side_checks_sources() {
        let config = MappingConfig::from_pairs("", "", [("pelvis", "")]).unwrap();
        assert!(validate_against(&config, &target_rig(), Side::Source));
        assert!(!validate_against(&config, &target_rig(), Side::Target));
    }

    #[test]
    fn test_action_bones_must_be_sources() {
        let config = MappingConfig::from_pairs("", "", [("Hand_L", "")]).unwrap();
        let ok = Action::new("Wave", vec![FCurve::new("pose.bones[\"Hand_L\"].location", 0)]);
        assert!(validate_action(&config, &ok));

        let unknown = Action::new("Walk", vec![FCurve::new("pose.bones[\"Foot_L\"].location", 0)]);
        let err = check_action(&config, &unknown).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Validation(ValidationError::UnmappedActionBone { ref bone, .. }) if bone == "Foot_L"
        ));
    }

    #[test]
    fn test_action_with_malformed_path_fails() {
        let config = MappingConfig::from_pairs("", "", [("Hand_L", "")]).unwrap();
        let bad = Action::new("Bad", vec![FCurve::new("location", 0)]);
        assert!(!validate_action(&config, &bad));
        assert!(matches!(
            check_action(&config, &bad),
            Err(TransferError::Structural(StructuralError::MalformedDataPath { parts: 1, .. }))
        ));
    }

    #[test]
    fn test_complete_requires_every_target() {
        assert!(check_complete(&MappingConfig::new()).is_err());
        let partial = MappingConfig::from_pairs("", "", [("A", "a"), ("B", "")]).unwrap();
        assert_eq!(
            check_complete(&partial),
            Err(ValidationError::Incomplete {
                unresolved: 1,
                total: 2
            })
        );
        let full = MappingConfig::from_pairs("", "", [("A", "a")]).unwrap();
        assert!(check_complete(&full).is_ok());
    }
}
