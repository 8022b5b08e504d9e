use std::f64::consts::PI;

use float_cmp::approx_eq;

use crate::{
    collection::JointCollection,
    config::ImportConfig,
    model_elements::joint_elements::{
        DriveType, JointDescription, JointDrive, JointDynamics, JointLimit, JointMimic,
        JointTargetType, JointType,
    },
};

use super::*;

fn limit(lower: f64, upper: f64, effort: f64, velocity: f64) -> JointLimit {
    JointLimit {
        lower,
        upper,
        effort,
        velocity,
    }
}

fn driven(name: &str, joint_type: JointType, target_type: JointTargetType) -> JointDescription {
    JointDescription::new(
        name.to_string(),
        joint_type,
        format!("{}_parent", name),
        format!("{}_child", name),
    )
    .with_drive(
        JointDrive::new(target_type, DriveType::Force, 100.0, 20.0).with_target(0.5),
    )
    .with_inertia(1.0)
}

fn collection(descriptions: Vec<JointDescription>, config: &ImportConfig) -> JointCollection {
    JointCollection::load_joints(descriptions, config).unwrap()
}

fn authoring_for(name: &str, joints: &JointCollection, config: &ImportConfig) -> JointAuthoring {
    authoring_plan(joints, config)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, a)| a)
        .unwrap()
}

#[test]
fn when_authoring_position_drive_should_use_strength_and_damping() {
    let config = ImportConfig::default();
    let joints = collection(
        vec![driven("a", JointType::Revolute, JointTargetType::Position)
            .with_limit(limit(-1.0, 1.0, 10.0, 2.0))],
        &config,
    );

    match authoring_for("a", &joints, &config) {
        JointAuthoring::Drive {
            axis,
            drive_type,
            target,
            stiffness,
            damping,
            max_force,
            position_limits,
            max_velocity,
        } => {
            assert_eq!(DriveAxis::Angular, axis);
            assert_eq!(DriveType::Force, drive_type);
            assert_eq!(DriveTarget::Position(0.5), target);
            assert_eq!(100.0, stiffness);
            assert_eq!(20.0, damping);
            assert_eq!(10.0, max_force);

            let (lower, upper) = position_limits.unwrap();
            assert!(approx_eq!(f64, -180.0 / PI, lower, ulps = 2));
            assert!(approx_eq!(f64, 180.0 / PI, upper, ulps = 2));
            assert!(approx_eq!(f64, 360.0 / PI, max_velocity, ulps = 2));
        }
        other => panic!("Expected a drive, got {:?}", other),
    }
}

#[test]
fn when_authoring_velocity_drive_should_use_strength_as_damping() {
    let config = ImportConfig::default();
    let joints = collection(
        vec![driven("a", JointType::Revolute, JointTargetType::Velocity)],
        &config,
    );

    match authoring_for("a", &joints, &config) {
        JointAuthoring::Drive {
            target,
            stiffness,
            damping,
            ..
        } => {
            assert_eq!(DriveTarget::Velocity(0.5), target);
            assert_eq!(0.0, stiffness);
            assert_eq!(100.0, damping);
        }
        other => panic!("Expected a drive, got {:?}", other),
    }
}

#[test]
fn when_authoring_joint_without_drive_should_use_passive_dynamics() {
    let config = ImportConfig::default();
    let joints = collection(
        vec![
            driven("a", JointType::Revolute, JointTargetType::None).with_dynamics(JointDynamics {
                damping: 2.0,
                friction: 0.0,
                stiffness: 3.0,
            }),
        ],
        &config,
    );

    match authoring_for("a", &joints, &config) {
        JointAuthoring::Passive {
            stiffness,
            damping,
            max_force,
            position_limits,
            max_velocity,
            ..
        } => {
            assert_eq!(3.0, stiffness);
            assert_eq!(2.0, damping);
            assert_eq!(f64::MAX, max_force);
            assert_eq!(None, position_limits);
            assert_eq!(f64::MAX, max_velocity);
        }
        other => panic!("Expected a passive joint, got {:?}", other),
    }
}

#[test]
fn when_authoring_prismatic_joint_should_scale_by_distance() {
    let mut config = ImportConfig::default();
    config.set_distance_scale(100.0).unwrap();
    let joints = collection(
        vec![driven("slide", JointType::Prismatic, JointTargetType::Position)
            .with_limit(limit(0.0, 0.5, 10.0, 0.25))],
        &config,
    );

    match authoring_for("slide", &joints, &config) {
        JointAuthoring::Drive {
            axis,
            max_force,
            position_limits,
            max_velocity,
            ..
        } => {
            assert_eq!(DriveAxis::Linear, axis);
            assert_eq!(1000.0, max_force);
            assert_eq!(Some((0.0, 50.0)), position_limits);
            assert_eq!(25.0, max_velocity);
        }
        other => panic!("Expected a drive, got {:?}", other),
    }
}

#[test]
fn when_authoring_angular_joint_should_scale_effort_by_squared_distance() {
    let mut config = ImportConfig::default();
    config.set_distance_scale(10.0).unwrap();
    let joints = collection(
        vec![driven("a", JointType::Continuous, JointTargetType::Position)
            .with_limit(limit(-1.0, 1.0, 3.0, 0.0))],
        &config,
    );

    match authoring_for("a", &joints, &config) {
        JointAuthoring::Drive {
            max_force,
            position_limits,
            max_velocity,
            ..
        } => {
            assert_eq!(300.0, max_force);
            assert_eq!(None, position_limits);
            assert_eq!(f64::MAX, max_velocity);
        }
        other => panic!("Expected a drive, got {:?}", other),
    }
}

#[test]
fn when_authoring_mimic_joint_should_negate_multiplier_and_widen_limits() {
    let config = ImportConfig::default();
    let joints = collection(
        vec![
            driven("left", JointType::Prismatic, JointTargetType::Position)
                .with_limit(limit(0.0, 0.04, 10.0, 1.0)),
            driven("right", JointType::Prismatic, JointTargetType::Position)
                .with_mimic(JointMimic::new("left".to_string(), 2.0, 0.01)),
        ],
        &config,
    );

    match authoring_for("right", &joints, &config) {
        JointAuthoring::Mimic {
            reference_joint,
            gearing,
            offset,
            natural_frequency,
            damping_ratio,
            position_limits,
        } => {
            assert_eq!("left", reference_joint);
            assert_eq!(-2.0, gearing);
            assert_eq!(0.01, offset);
            assert_eq!(10.0, natural_frequency);
            assert_eq!(1.0, damping_ratio);

            let (lower, upper) = position_limits.unwrap();
            assert!(approx_eq!(f64, -0.016, lower, epsilon = 1e-12));
            assert!(approx_eq!(f64, 0.096, upper, epsilon = 1e-12));
        }
        other => panic!("Expected a mimic joint, got {:?}", other),
    }
}

#[test]
fn when_mimic_reference_is_missing_should_author_mimic_without_limits() {
    let config = ImportConfig::default();
    let joints = collection(
        vec![driven("right", JointType::Revolute, JointTargetType::Position)
            .with_limit(limit(-1.0, 1.0, 10.0, 3.0))
            .with_mimic(JointMimic::new("missing".to_string(), 1.0, 0.0))],
        &config,
    );

    match authoring_for("right", &joints, &config) {
        JointAuthoring::Mimic {
            reference_joint,
            position_limits,
            ..
        } => {
            assert_eq!("missing", reference_joint);
            assert_eq!(None, position_limits);
        }
        other => panic!("Expected a mimic joint, got {:?}", other),
    }
}

#[test]
fn when_mimic_is_not_parsed_should_author_drive() {
    let mut config = ImportConfig::default();
    config.set_parse_mimic(false);
    let joints = collection(
        vec![
            driven("left", JointType::Revolute, JointTargetType::Position),
            driven("right", JointType::Revolute, JointTargetType::Velocity)
                .with_mimic(JointMimic::new("left".to_string(), 1.0, 0.0)),
        ],
        &config,
    );

    assert!(matches!(
        authoring_for("right", &joints, &config),
        JointAuthoring::Drive {
            target: DriveTarget::Velocity(_),
            ..
        }
    ));
}

#[test]
fn when_creating_authoring_plan_should_follow_collection_order() {
    let config = ImportConfig::default();
    let joints = collection(
        vec![
            driven("b", JointType::Revolute, JointTargetType::Position),
            driven("a", JointType::Revolute, JointTargetType::Position),
        ],
        &config,
    );

    let names: Vec<String> = authoring_plan(&joints, &config)
        .into_iter()
        .map(|(n, _)| n)
        .collect();

    assert_eq!(vec!["b".to_string(), "a".to_string()], names);
}

#[test]
fn when_computing_mimic_limits_should_order_bounds() {
    assert_eq!((-7.0, 7.0), mimic_limits(-1.0, -5.0, 5.0));
    assert_eq!((0.0, 0.0), mimic_limits(0.0, -5.0, 5.0));

    let (lower, upper) = mimic_limits(-0.5, 0.0, 1.0);
    assert!(approx_eq!(f64, -0.6, lower, epsilon = 1e-12));
    assert!(approx_eq!(f64, 0.1, upper, epsilon = 1e-12));
}

#[test]
fn when_getting_drive_axis_should_match_joint_type() {
    assert_eq!(DriveAxis::Linear, DriveAxis::for_joint_type(JointType::Prismatic));
    assert_eq!(DriveAxis::Angular, DriveAxis::for_joint_type(JointType::Revolute));
    assert_eq!(DriveAxis::Angular, DriveAxis::for_joint_type(JointType::Continuous));
}
