use nalgebra::{Isometry3, Vector3};

use crate::model_elements::joint_elements::*;

// JointType

#[test]
fn when_checking_joint_types_only_fixed_should_be_fixed() {
    assert!(JointType::Fixed.is_fixed());

    assert!(!JointType::Revolute.is_fixed());
    assert!(!JointType::Continuous.is_fixed());
    assert!(!JointType::Prismatic.is_fixed());
    assert!(!JointType::Floating.is_fixed());
    assert!(!JointType::Planar.is_fixed());
}

#[test]
fn when_checking_joint_types_only_prismatic_should_be_linear() {
    assert!(JointType::Prismatic.is_linear());

    assert!(!JointType::Revolute.is_linear());
    assert!(!JointType::Continuous.is_linear());
}

// EffectiveTargetType

#[test]
fn when_converting_stored_target_types_should_map_to_matching_effective_type() {
    assert_eq!(
        EffectiveTargetType::None,
        EffectiveTargetType::from(JointTargetType::None)
    );
    assert_eq!(
        EffectiveTargetType::Position,
        EffectiveTargetType::from(JointTargetType::Position)
    );
    assert_eq!(
        EffectiveTargetType::Velocity,
        EffectiveTargetType::from(JointTargetType::Velocity)
    );
}

// JointDrive

#[test]
fn when_creating_drive_should_be_initialized() {
    let drive = JointDrive::new(JointTargetType::Velocity, DriveType::Force, 10.0, 2.0);

    assert_eq!(JointTargetType::Velocity, drive.target_type());
    assert_eq!(DriveType::Force, drive.drive_type());
    assert_eq!(10.0, drive.strength());
    assert_eq!(2.0, drive.damping());
    assert_eq!(0.0, drive.natural_frequency());
    assert_eq!(0.0, drive.damping_ratio());
    assert_eq!(0.0, drive.target());
}

#[test]
fn when_setting_target_value_should_keep_gains() {
    let drive =
        JointDrive::new(JointTargetType::Position, DriveType::Acceleration, 1.0, 3.0).with_target(0.5);

    assert_eq!(0.5, drive.target());
    assert_eq!(1.0, drive.strength());
    assert_eq!(3.0, drive.damping());
}

// JointMimic

#[test]
fn when_mimic_has_empty_joint_name_should_not_be_set() {
    let mimic = JointMimic::new(String::new(), 1.0, 0.0);
    assert!(!mimic.is_set());

    let mimic = JointMimic::new("a".to_string(), -2.0, 0.1);
    assert!(mimic.is_set());
    assert_eq!("a", mimic.joint());
    assert_eq!(-2.0, mimic.multiplier());
    assert_eq!(0.1, mimic.offset());
}

// JointLimit

#[test]
fn when_creating_default_limit_should_be_unbounded() {
    let limit = JointLimit::default();

    assert_eq!(f64::MIN, limit.lower);
    assert_eq!(f64::MAX, limit.upper);
    assert_eq!(f64::MAX, limit.effort);
    assert_eq!(f64::MAX, limit.velocity);
}

// JointDescription

#[test]
fn when_creating_joint_description_should_have_defaults() {
    let description = JointDescription::new(
        "a".to_string(),
        JointType::Revolute,
        "p".to_string(),
        "c".to_string(),
    );

    assert_eq!("a", description.name());
    assert_eq!(JointType::Revolute, description.joint_type());
    assert_eq!("p", description.parent_link());
    assert_eq!("c", description.child_link());
    assert_eq!(&Isometry3::identity(), description.origin());
    assert_eq!(&Vector3::x(), description.axis());
    assert_eq!(&JointDynamics::default(), description.dynamics());
    assert_eq!(&JointLimit::default(), description.limit());
    assert!(description.drive().is_none());
    assert!(description.mimic().is_none());
    assert_eq!(0.0, description.inertia());
}

#[test]
fn when_building_joint_description_should_store_all_values() {
    let origin = Isometry3::translation(1.0, 2.0, 3.0);
    let dynamics = JointDynamics {
        damping: 1.0,
        friction: 2.0,
        stiffness: 3.0,
    };
    let limit = JointLimit {
        lower: -1.0,
        upper: 1.0,
        effort: 10.0,
        velocity: 5.0,
    };
    let drive = JointDrive::new(JointTargetType::Position, DriveType::Force, 4.0, 5.0);

    let mut description = JointDescription::new(
        "a".to_string(),
        JointType::Prismatic,
        "p".to_string(),
        "c".to_string(),
    )
    .with_origin(origin)
    .with_axis(Vector3::z())
    .with_dynamics(dynamics)
    .with_limit(limit)
    .with_drive(drive.clone())
    .with_mimic(JointMimic::new("b".to_string(), 2.0, 0.0))
    .with_inertia(7.0);

    assert_eq!(&origin, description.origin());
    assert_eq!(&Vector3::z(), description.axis());
    assert_eq!(&dynamics, description.dynamics());
    assert_eq!(&limit, description.limit());
    assert_eq!(Some(&drive), description.drive());
    assert_eq!("b", description.mimic().unwrap().joint());
    assert_eq!(7.0, description.inertia());

    description.set_inertia(8.0);
    assert_eq!(8.0, description.inertia());
}

// Joint

#[test]
fn when_creating_joint_from_description_should_copy_values() {
    let description = JointDescription::new(
        "a".to_string(),
        JointType::Continuous,
        "p".to_string(),
        "c".to_string(),
    )
    .with_inertia(2.5)
    .with_mimic(JointMimic::new("b".to_string(), 1.0, 0.0));
    let drive = JointDrive::new(JointTargetType::Position, DriveType::Acceleration, 1.0, 1.0);

    let joint = Joint::new(description, drive.clone());

    assert_eq!("a", joint.name());
    assert_eq!(JointType::Continuous, joint.joint_type());
    assert_eq!(2.5, joint.inertia());
    assert_eq!(&drive, joint.drive());
    assert!(joint.has_mimic());
}

#[test]
fn when_joint_mimic_has_no_joint_name_should_not_have_mimic() {
    let description = JointDescription::new(
        "a".to_string(),
        JointType::Revolute,
        "p".to_string(),
        "c".to_string(),
    )
    .with_mimic(JointMimic::new(String::new(), 1.0, 0.0));
    let drive = JointDrive::new(JointTargetType::Position, DriveType::Acceleration, 1.0, 1.0);

    let joint = Joint::new(description, drive);

    assert!(!joint.has_mimic());
    assert!(joint.mimic().is_some());
}
