//! Integration tests for curve remapping and action transfer
//!
//! These tests verify:
//! - Bone names inside data paths are rewritten to their targets
//! - Curves of unmapped bones are dropped and reported
//! - A malformed data path aborts the remap without touching any curve
//! - Transfer never modifies the source action and retargets the destination

use action_transfer::models::{ActionSlot, FCurve, Keyframe};
use action_transfer::services::{CurveRemapper, transfer_action};
use action_transfer::{
    Action, MappingConfig, Skeleton, StructuralError, TransferError, ValidationError,
};

fn bone_curve(bone: &str, property: &str, array_index: u32) -> FCurve {
    FCurve::new(format!("pose.bones[\"{}\"].{}", bone, property), array_index).with_keyframes(
        vec![
            Keyframe {
                frame: 1.0,
                value: 0.0,
            },
            Keyframe {
                frame: 24.0,
                value: 1.5,
            },
        ],
    )
}

fn hand_mapping() -> MappingConfig {
    MappingConfig::from_pairs(
        "",
        "",
        [("Hand_L", "LeftHand"), ("Hips", "pelvis"), ("Tail", "")],
    )
    .unwrap()
}

fn game_rig() -> Skeleton {
    Skeleton::from_named_bones(
        "Game",
        [
            ("pelvis", None),
            ("spine", Some("pelvis")),
            ("LeftHand", Some("spine")),
        ],
    )
    .unwrap()
}

#[test]
fn test_rewrites_every_channel_and_keeps_keyframes() {
    let mut action = Action::new(
        "Wave",
        vec![
            bone_curve("Hand_L", "location", 0),
            bone_curve("Hand_L", "location", 1),
            bone_curve("Hips", "rotation_quaternion", 3),
        ],
    );
    let original = action.clone();

    let report = CurveRemapper::new().remap(&hand_mapping(), &mut action).unwrap();

    assert_eq!(report.kept, 3);
    let paths: Vec<&str> = action.curves.iter().map(|c| c.data_path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "pose.bones[\"LeftHand\"].location",
            "pose.bones[\"LeftHand\"].location",
            "pose.bones[\"pelvis\"].rotation_quaternion",
        ]
    );
    for (remapped, before) in action.curves.iter().zip(&original.curves) {
        assert_eq!(remapped.array_index, before.array_index);
        assert_eq!(remapped.keyframes, before.keyframes);
    }
}

#[test]
fn test_unmapped_curves_dropped_in_order() {
    let mut action = Action::new(
        "Wave",
        vec![
            bone_curve("Unmapped", "location", 0),
            bone_curve("Hand_L", "location", 0),
            bone_curve("Tail", "scale", 0),
            bone_curve("Unmapped", "location", 1),
        ],
    );

    let report = CurveRemapper::new().remap(&hand_mapping(), &mut action).unwrap();

    assert_eq!(action.curves.len(), 1);
    assert_eq!(action.curves[0].data_path, "pose.bones[\"LeftHand\"].location");
    assert_eq!(report.dropped, 3);
    assert_eq!(report.dropped_bones, vec!["Unmapped", "Tail"]);
    assert_eq!(
        report.summary(),
        "1 curves remapped, 3 dropped (Unmapped, Tail)"
    );
}

#[test]
fn test_malformed_paths_abort_without_changes() {
    for bad in ["location", "pose.bones[\"A\"].x[\"B\"]"] {
        let mut action = Action::new(
            "Wave",
            vec![
                bone_curve("Hand_L", "location", 0),
                FCurve::new(bad, 0),
                bone_curve("Hips", "location", 0),
            ],
        );
        let before = action.clone();

        let err = CurveRemapper::new()
            .remap(&hand_mapping(), &mut action)
            .unwrap_err();

        assert!(matches!(err, StructuralError::MalformedDataPath { .. }));
        assert_eq!(action, before, "action changed for path {}", bad);
    }
}

#[test]
fn test_transfer_onto_destination() {
    let mapping = MappingConfig::from_pairs("", "", [("Hand_L", "LeftHand"), ("Hips", "pelvis")])
        .unwrap();
    let action = Action::new(
        "Wave",
        vec![
            bone_curve("Hand_L", "location", 0),
            bone_curve("Hips", "location", 2),
        ],
    );
    let mut rig = game_rig();
    rig.set_active_action("Idle");

    let outcome = transfer_action(&mapping, &action, Some(&mut rig)).unwrap();

    assert_eq!(outcome.action.name, "Wave_Game");
    assert_eq!(rig.active_action().as_deref(), Some("Wave_Game"));
    assert_eq!(outcome.action.curves[1].data_path, "pose.bones[\"pelvis\"].location");
    assert_eq!(action.curves[0].data_path, "pose.bones[\"Hand_L\"].location");
}

#[test]
fn test_transfer_without_destination() {
    let action = Action::new("Wave", vec![bone_curve("Hand_L", "location", 0)]);

    let outcome = transfer_action::<Skeleton>(&hand_mapping(), &action, None).unwrap();

    assert_eq!(outcome.action.name, "Wave_transferred");
    assert_eq!(outcome.report.kept, 1);
}

#[test]
fn test_transfer_rejects_action_bone_missing_from_mapping() {
    let action = Action::new("Wave", vec![bone_curve("Spine", "location", 0)]);
    let mut rig = game_rig();
    rig.set_active_action("Idle");

    let err = transfer_action(&hand_mapping(), &action, Some(&mut rig)).unwrap_err();

    assert!(matches!(
        err,
        TransferError::Validation(ValidationError::UnmappedActionBone { .. })
    ));
    assert_eq!(rig.active_action().as_deref(), Some("Idle"));
}

#[test]
fn test_transfer_rejects_destination_missing_target_bone() {
    let mapping =
        MappingConfig::from_pairs("", "", [("Hand_L", "LeftHand"), ("Hips", "hip")]).unwrap();
    let action = Action::new("Wave", vec![bone_curve("Hand_L", "location", 0)]);
    let mut rig = game_rig();

    let err = transfer_action(&mapping, &action, Some(&mut rig)).unwrap_err();

    assert!(matches!(
        err,
        TransferError::Validation(ValidationError::MissingBone { .. })
    ));
    assert_eq!(rig.active_action(), None);
}
