use float_cmp::approx_eq;
use nalgebra::{Isometry3, Matrix3, Vector3};

use crate::{
    model_elements::joint_elements::{JointDescription, JointType},
    Error,
};

use super::*;

fn create_link(name: &str, mass: f64) -> LinkDescription {
    LinkDescription::new(name.to_string(), mass, Matrix3::identity() * mass)
}

fn create_joint(name: &str, parent: &str, child: &str) -> JointDescription {
    JointDescription::new(
        name.to_string(),
        JointType::Revolute,
        parent.to_string(),
        child.to_string(),
    )
}

fn create_robot(
    links: &[(&str, f64)],
    joints: &[(&str, &str, &str, Isometry3<f64>)],
) -> RobotDescription {
    let mut robot = RobotDescription::new("robot".to_string());
    for (name, mass) in links {
        robot.add_link(create_link(name, *mass)).unwrap();
    }

    for (name, parent, child, origin) in joints {
        robot
            .add_joint(create_joint(name, parent, child).with_origin(*origin))
            .unwrap();
    }

    robot
}

#[test]
fn when_adding_links_and_joints_should_store_them_in_order() {
    let robot = create_robot(
        &[("base", 1.0), ("a", 1.0), ("b", 1.0)],
        &[
            ("j2", "base", "b", Isometry3::identity()),
            ("j1", "base", "a", Isometry3::identity()),
        ],
    );

    assert_eq!("robot", robot.name());
    assert_eq!(3, robot.number_of_links());
    assert_eq!(2, robot.number_of_joints());

    let names: Vec<&str> = robot.joints().map(|j| j.name()).collect();
    assert_eq!(vec!["j2", "j1"], names);
    assert_eq!(1.0, robot.link("a").unwrap().mass());
    assert!(robot.link("c").is_none());
}

#[test]
fn when_adding_duplicate_link_should_error() {
    let mut robot = RobotDescription::new("robot".to_string());
    robot.add_link(create_link("base", 1.0)).unwrap();

    let result = robot.add_link(create_link("base", 2.0));

    assert_eq!(
        Err(Error::DuplicateLink {
            name: "base".to_string()
        }),
        result
    );
    assert_eq!(1.0, robot.link("base").unwrap().mass());
}

#[test]
fn when_adding_duplicate_joint_should_error() {
    let mut robot = create_robot(
        &[("base", 1.0), ("a", 1.0), ("b", 1.0)],
        &[("j", "base", "a", Isometry3::identity())],
    );

    let result = robot.add_joint(create_joint("j", "base", "b"));

    assert_eq!(
        Err(Error::DuplicateJoint {
            name: "j".to_string()
        }),
        result
    );
}

#[test]
fn when_adding_joint_with_unknown_link_should_error() {
    let mut robot = create_robot(&[("base", 1.0)], &[]);

    let result = robot.add_joint(create_joint("j", "base", "missing"));

    assert_eq!(
        Err(Error::MissingLink {
            joint: "j".to_string(),
            link: "missing".to_string()
        }),
        result
    );
    assert_eq!(0, robot.number_of_joints());
}

#[test]
fn when_adding_second_joint_to_same_child_should_error() {
    let mut robot = create_robot(
        &[("base", 1.0), ("other", 1.0), ("a", 1.0)],
        &[("j1", "base", "a", Isometry3::identity())],
    );

    let result = robot.add_joint(create_joint("j2", "other", "a"));

    assert_eq!(
        Err(Error::MultipleParentJoints {
            link: "a".to_string(),
            joint: "j1".to_string()
        }),
        result
    );
}

#[test]
fn when_getting_inertia_of_unknown_joint_should_error() {
    let robot = create_robot(&[("base", 1.0)], &[]);

    assert_eq!(
        Err(Error::UnknownJoint {
            name: "j".to_string()
        }),
        robot.joint_inertia("j")
    );
    assert!(robot.accumulated_inertias("j").is_err());
}

#[test]
fn when_parent_link_is_offset_should_shift_its_inertia() {
    let origin = Isometry3::translation(0.0, 0.0, 1.0);
    let robot = create_robot(
        &[("base", 1.0), ("arm", 1.0)],
        &[("j", "base", "arm", origin)],
    );

    let (parent, child) = robot.accumulated_inertias("j").unwrap();

    assert_eq!(Matrix3::identity(), child);
    assert!(approx_eq!(f64, 2.0, parent[(0, 0)], epsilon = 1e-12));
    assert!(approx_eq!(f64, 2.0, parent[(1, 1)], epsilon = 1e-12));
    assert!(approx_eq!(f64, 1.0, parent[(2, 2)], epsilon = 1e-12));
}

#[test]
fn when_computing_joint_inertias_should_combine_both_sides() {
    let origin = Isometry3::translation(0.0, 0.0, 1.0);
    let mut robot = create_robot(
        &[("base", 1.0), ("arm", 1.0)],
        &[("j", "base", "arm", origin)],
    );

    robot.compute_joint_inertias();

    let m0 = 3.0;
    let m1 = 3.0_f64.sqrt();
    assert!(approx_eq!(
        f64,
        m0 * m1 / (m0 + m1),
        robot.joint_inertia("j").unwrap(),
        epsilon = 1e-12
    ));
}

#[test]
fn when_robot_has_sibling_branches_should_add_them_to_parent_side() {
    let origin = Isometry3::translation(1.0, 0.0, 0.0);
    let single = create_robot(
        &[("base", 1.0), ("a", 1.0)],
        &[("j1", "base", "a", origin)],
    );
    let with_sibling = create_robot(
        &[("base", 1.0), ("a", 1.0), ("b", 2.0)],
        &[
            ("j1", "base", "a", origin),
            ("j2", "base", "b", Isometry3::translation(-1.0, 0.0, 0.0)),
        ],
    );

    let (single_parent, single_child) = single.accumulated_inertias("j1").unwrap();
    let (parent, child) = with_sibling.accumulated_inertias("j1").unwrap();

    assert_eq!(single_child, child);
    assert!(parent.norm() > single_parent.norm());
}

#[test]
fn when_robot_is_a_chain_should_accumulate_subtree_on_child_side() {
    let up = Isometry3::translation(0.0, 0.0, 1.0);
    let robot = create_robot(
        &[("base", 1.0), ("upper", 1.0), ("lower", 1.0), ("hand", 1.0)],
        &[
            ("shoulder", "base", "upper", up),
            ("elbow", "upper", "lower", up),
            ("wrist", "lower", "hand", up),
        ],
    );

    let (shoulder_parent, shoulder_child) = robot.accumulated_inertias("shoulder").unwrap();
    let (wrist_parent, wrist_child) = robot.accumulated_inertias("wrist").unwrap();

    // Three links below the shoulder, only the hand below the wrist.
    assert!(approx_eq!(
        f64,
        3.0 * 3.0 + 2.0 * (1.0 + 4.0),
        shoulder_child.trace(),
        epsilon = 1e-12
    ));
    assert_eq!(Matrix3::identity(), wrist_child);

    // Only the base above the shoulder.
    assert!(approx_eq!(f64, 5.0, shoulder_parent.trace(), epsilon = 1e-12));
    assert!(wrist_parent.norm() > shoulder_parent.norm());
}

#[test]
fn when_center_of_mass_is_offset_should_use_inertial_origin() {
    let mut robot = RobotDescription::new("robot".to_string());
    robot.add_link(create_link("base", 0.0)).unwrap();
    robot
        .add_link(
            LinkDescription::new("arm".to_string(), 2.0, Matrix3::zeros())
                .with_inertial_origin(Isometry3::translation(0.0, 3.0, 0.0)),
        )
        .unwrap();
    robot.add_joint(create_joint("j", "base", "arm")).unwrap();

    let (_, child) = robot.accumulated_inertias("j").unwrap();

    // m * (|d|^2 E - d d^T) with d = (0, 3, 0)
    assert_eq!(18.0, child[(0, 0)]);
    assert_eq!(0.0, child[(1, 1)]);
    assert_eq!(18.0, child[(2, 2)]);
    assert_eq!(
        Vector3::new(0.0, 3.0, 0.0),
        robot.link("arm").unwrap().inertial_origin().translation.vector
    );
}

#[test]
fn when_all_links_are_massless_should_have_zero_inertia() {
    let mut robot = create_robot(
        &[("base", 0.0), ("arm", 0.0)],
        &[("j", "base", "arm", Isometry3::identity())],
    );

    robot.compute_joint_inertias();

    assert_eq!(0.0, robot.joint_inertia("j").unwrap());
}

#[test]
fn when_consuming_robot_should_return_joints_with_inertia() {
    let mut robot = create_robot(
        &[("base", 1.0), ("arm", 1.0)],
        &[("j", "base", "arm", Isometry3::identity())],
    );
    robot.compute_joint_inertias();

    let joints = robot.into_joints();

    assert_eq!(1, joints.len());
    assert!(joints[0].inertia() > 0.0);
}
