use crate::{
    config::ImportConfig,
    model_elements::joint_elements::{
        DriveType, EffectiveTargetType, Joint, JointDescription, JointDrive, JointMimic,
        JointTargetType, JointType,
    },
};

use super::*;

fn create_joint(name: &str, target_type: JointTargetType, mimic: Option<&str>) -> Joint {
    let mut description = JointDescription::new(
        name.to_string(),
        JointType::Revolute,
        "parent".to_string(),
        format!("{}_child", name),
    );
    if let Some(reference) = mimic {
        description = description.with_mimic(JointMimic::new(reference.to_string(), 1.0, 0.0));
    }

    Joint::new(
        description,
        JointDrive::new(target_type, DriveType::Acceleration, 100.0, 10.0),
    )
}

const ALL_FIELDS: [DriveField; 5] = [
    DriveField::TargetType,
    DriveField::Strength,
    DriveField::Damping,
    DriveField::NaturalFrequency,
    DriveField::DampingRatio,
];

// effective_target_type

#[test]
fn when_joint_has_mimic_and_parse_mimic_is_on_should_be_mimic_for_any_stored_type() {
    let config = ImportConfig::default();

    for target_type in [
        JointTargetType::None,
        JointTargetType::Position,
        JointTargetType::Velocity,
    ] {
        let joint = create_joint("finger", target_type, Some("thumb"));
        assert_eq!(
            EffectiveTargetType::Mimic,
            effective_target_type(&joint, &config)
        );
    }
}

#[test]
fn when_parse_mimic_is_off_should_use_stored_target_type() {
    let mut config = ImportConfig::default();
    config.set_parse_mimic(false);

    let joint = create_joint("finger", JointTargetType::Velocity, Some("thumb"));

    assert_eq!(
        EffectiveTargetType::Velocity,
        effective_target_type(&joint, &config)
    );
}

#[test]
fn when_toggling_parse_mimic_should_restore_stored_target_type() {
    let mut config = ImportConfig::default();
    let joint = create_joint("finger", JointTargetType::Velocity, Some("thumb"));

    config.set_parse_mimic(false);
    assert_eq!(
        EffectiveTargetType::Velocity,
        effective_target_type(&joint, &config)
    );

    config.set_parse_mimic(true);
    assert_eq!(
        EffectiveTargetType::Mimic,
        effective_target_type(&joint, &config)
    );

    config.set_parse_mimic(false);
    assert_eq!(
        EffectiveTargetType::Velocity,
        effective_target_type(&joint, &config)
    );
    assert_eq!(JointTargetType::Velocity, joint.drive().target_type());
}

#[test]
fn when_mimic_reference_is_empty_should_use_stored_target_type() {
    let config = ImportConfig::default();
    let joint = create_joint("finger", JointTargetType::Position, Some(""));

    assert_eq!(
        EffectiveTargetType::Position,
        effective_target_type(&joint, &config)
    );
}

// FieldEnablement

#[test]
fn when_target_is_position_should_enable_all_fields() {
    let enablement = FieldEnablement::for_target_type(EffectiveTargetType::Position);

    for field in ALL_FIELDS {
        assert!(enablement.is_enabled(field), "{:?}", field);
    }
}

#[test]
fn when_target_is_velocity_should_disable_damping_column() {
    let enablement = FieldEnablement::for_target_type(EffectiveTargetType::Velocity);

    assert!(enablement.is_enabled(DriveField::TargetType));
    assert!(enablement.is_enabled(DriveField::Strength));
    assert!(!enablement.is_enabled(DriveField::Damping));
    assert!(enablement.is_enabled(DriveField::NaturalFrequency));
    assert!(!enablement.is_enabled(DriveField::DampingRatio));
}

#[test]
fn when_target_is_none_should_only_enable_target_type() {
    let enablement = FieldEnablement::for_target_type(EffectiveTargetType::None);

    assert!(enablement.is_enabled(DriveField::TargetType));
    for field in &ALL_FIELDS[1..] {
        assert!(!enablement.is_enabled(*field), "{:?}", field);
    }
}

#[test]
fn when_target_is_mimic_should_disable_all_fields() {
    let enablement = FieldEnablement::for_target_type(EffectiveTargetType::Mimic);

    for field in ALL_FIELDS {
        assert!(!enablement.is_enabled(field), "{:?}", field);
    }
}

#[test]
fn when_getting_enablement_for_mimic_joint_should_keep_drive_values() {
    let config = ImportConfig::default();
    let joint = create_joint("finger", JointTargetType::Position, Some("thumb"));

    let enablement = FieldEnablement::for_joint(&joint, &config);

    assert!(!enablement.is_enabled(DriveField::Strength));
    assert_eq!(100.0, joint.drive().strength());
    assert_eq!(10.0, joint.drive().damping());
}

// dangling_mimic_references

#[test]
fn when_mimic_refers_to_missing_joint_should_report_it() {
    let joints = vec![
        create_joint("a", JointTargetType::Position, None),
        create_joint("b", JointTargetType::Position, Some("a")),
        create_joint("c", JointTargetType::Position, Some("missing")),
        create_joint("d", JointTargetType::Position, Some("")),
    ];

    let dangling = dangling_mimic_references(&joints);

    assert_eq!(1, dangling.len());
    assert_eq!("c", dangling[0].follower());
    assert_eq!("missing", dangling[0].reference());
}

#[test]
fn when_all_mimic_references_exist_should_report_nothing() {
    let joints = vec![
        create_joint("a", JointTargetType::Position, Some("b")),
        create_joint("b", JointTargetType::Position, Some("a")),
    ];

    assert!(dangling_mimic_references(&joints).is_empty());
}
