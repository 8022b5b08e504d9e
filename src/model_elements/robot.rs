//! Defines the parsed description of a robot, i.e. its links and the joints that connect them.
//!
//! The [RobotDescription] is the input that a URDF parser hands to the joint drive logic. Next
//! to storing the links and joints it computes the equivalent inertia at every joint, which is
//! used to convert between the stiffness and natural frequency views of force drives.

extern crate nalgebra as na;

use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;
use na::{Isometry3, Matrix3};

use crate::{model_elements::joint_elements::JointDescription, Error};

#[cfg(test)]
#[path = "robot_tests.rs"]
mod robot_tests;

/// Describes a rigid link of a robot and its mass properties.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkDescription {
    name: String,
    mass: f64,

    /// The inertia tensor of the link, expressed in the inertial frame.
    inertia: Matrix3<f64>,

    /// The pose of the inertial frame, i.e. the center of mass, relative to the link frame.
    inertial_origin: Isometry3<f64>,
}

impl LinkDescription {
    /// Returns the inertia tensor of the link, expressed in the inertial frame.
    pub fn inertia(&self) -> &Matrix3<f64> {
        &self.inertia
    }

    /// Returns the pose of the center of mass relative to the link frame.
    pub fn inertial_origin(&self) -> &Isometry3<f64> {
        &self.inertial_origin
    }

    /// Returns the mass of the link.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Returns the name of the link.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Creates a new [LinkDescription] with its center of mass at the origin of the link frame.
    ///
    /// ## Parameters
    ///
    /// * 'name' - The unique name of the link
    /// * 'mass' - The mass of the link
    /// * 'inertia' - The inertia tensor of the link around its center of mass
    pub fn new(name: String, mass: f64, inertia: Matrix3<f64>) -> Self {
        Self {
            name,
            mass,
            inertia,
            inertial_origin: Isometry3::identity(),
        }
    }

    /// Returns the link with the given pose of the center of mass.
    #[must_use]
    pub fn with_inertial_origin(mut self, inertial_origin: Isometry3<f64>) -> Self {
        self.inertial_origin = inertial_origin;
        self
    }

    /// Returns the inertia tensor of the link around the origin of a frame in which the
    /// link frame has the given pose. The tensor is rotated into that frame and shifted with
    /// the parallel axis theorem.
    fn inertia_in_frame(&self, link_pose: &Isometry3<f64>) -> Matrix3<f64> {
        let center_of_mass = link_pose * self.inertial_origin;
        let rotation = center_of_mass.rotation.to_rotation_matrix();
        let rotated = rotation.matrix() * self.inertia * rotation.matrix().transpose();

        let d = center_of_mass.translation.vector;
        rotated + (Matrix3::identity() * d.dot(&d) - d * d.transpose()) * self.mass
    }
}

/// Defines the side of a joint on which links are accumulated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum JointSide {
    Parent,
    Child,
}

/// Describes a robot as a tree of links connected by joints.
///
/// Joints are stored in the order in which they were added. Links are the nodes of the tree
/// and every link is the child of at most one joint.
#[derive(Clone, Debug, Default)]
pub struct RobotDescription {
    name: String,

    links: HashMap<String, LinkDescription>,

    /// The joints in insertion order.
    joints: Vec<JointDescription>,

    /// The mapping from the joint name to the index in the joint list.
    joint_index: HashMap<String, usize>,

    /// The mapping from a link to the joints of which it is the parent link.
    children_of: HashMap<String, BTreeSet<String>>,

    /// The mapping from a link to the joint of which it is the child link.
    parent_joint_of: HashMap<String, String>,
}

impl RobotDescription {
    /// Returns the inertia tensors accumulated on the parent side and the child side of the
    /// given joint, both expressed around the origin of the joint frame.
    ///
    /// The child side holds every link in the subtree below the joint. The parent side holds
    /// every other link of the robot, reached by walking up through the parent joints and down
    /// into the sibling branches.
    ///
    /// ## Parameters
    ///
    /// * 'joint' - The name of the joint
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    pub fn accumulated_inertias(&self, joint: &str) -> Result<(Matrix3<f64>, Matrix3<f64>), Error> {
        let joint = self.joint(joint).ok_or_else(|| Error::UnknownJoint {
            name: joint.to_string(),
        })?;

        Ok((
            self.accumulate(joint, JointSide::Parent),
            self.accumulate(joint, JointSide::Child),
        ))
    }

    fn accumulate(&self, joint: &JointDescription, side: JointSide) -> Matrix3<f64> {
        let start = match side {
            JointSide::Parent => (joint.parent_link(), joint.origin().inverse()),
            JointSide::Child => (joint.child_link(), Isometry3::identity()),
        };

        let mut visited = HashSet::new();
        let mut to_visit = vec![start];
        let mut accumulated = Matrix3::zeros();
        while let Some((link_name, pose)) = to_visit.pop() {
            if !visited.insert(link_name) {
                continue;
            }

            if let Some(link) = self.links.get(link_name) {
                accumulated += link.inertia_in_frame(&pose);
            }

            if let Some(children) = self.children_of.get(link_name) {
                for child in children.iter().filter(|c| c.as_str() != joint.name()) {
                    if let Some(child_joint) = self.joint(child) {
                        to_visit.push((child_joint.child_link(), pose * child_joint.origin()));
                    }
                }
            }

            // The child side never walks up, the subtree ends at the joint.
            if side == JointSide::Parent {
                if let Some(parent_joint) = self
                    .parent_joint_of
                    .get(link_name)
                    .and_then(|name| self.joint(name))
                {
                    to_visit.push((
                        parent_joint.parent_link(),
                        pose * parent_joint.origin().inverse(),
                    ));
                }
            }
        }

        accumulated
    }

    /// Adds a joint to the robot.
    ///
    /// ## Parameters
    ///
    /// * 'joint' - The description of the joint. Both of its links should already be part of
    ///   the robot.
    ///
    /// ## Errors
    ///
    /// * [Error::DuplicateJoint] - Returned when a joint with the same name already exists
    /// * [Error::MissingLink] - Returned when the parent or child link is not part of the robot
    /// * [Error::MultipleParentJoints] - Returned when the child link is already the child of
    ///   another joint
    pub fn add_joint(&mut self, joint: JointDescription) -> Result<(), Error> {
        if self.joint_index.contains_key(joint.name()) {
            return Err(Error::DuplicateJoint {
                name: joint.name().to_string(),
            });
        }

        for link in [joint.parent_link(), joint.child_link()] {
            if !self.links.contains_key(link) {
                return Err(Error::MissingLink {
                    joint: joint.name().to_string(),
                    link: link.to_string(),
                });
            }
        }

        if let Some(existing) = self.parent_joint_of.get(joint.child_link()) {
            return Err(Error::MultipleParentJoints {
                link: joint.child_link().to_string(),
                joint: existing.clone(),
            });
        }

        self.children_of
            .entry(joint.parent_link().to_string())
            .or_default()
            .insert(joint.name().to_string());
        self.parent_joint_of
            .insert(joint.child_link().to_string(), joint.name().to_string());
        self.joint_index
            .insert(joint.name().to_string(), self.joints.len());
        self.joints.push(joint);

        Ok(())
    }

    /// Adds a link to the robot.
    ///
    /// ## Errors
    ///
    /// * [Error::DuplicateLink] - Returned when a link with the same name already exists
    pub fn add_link(&mut self, link: LinkDescription) -> Result<(), Error> {
        if self.links.contains_key(link.name()) {
            return Err(Error::DuplicateLink {
                name: link.name().to_string(),
            });
        }

        self.links.insert(link.name().to_string(), link);
        Ok(())
    }

    /// Computes the equivalent inertia of every joint and stores it in the joint description.
    ///
    /// The inertia on each side of a joint is reduced to a scalar with the Frobenius norm of
    /// the accumulated tensor. The equivalent inertia of the two sides is
    /// `m0 * m1 / (m0 + m1)`, or zero when both sides are massless.
    ///
    /// ## Example
    ///
    /// ```
    /// use nalgebra::{Isometry3, Matrix3};
    /// use urdf_joint_drives::model_elements::joint_elements::{JointDescription, JointType};
    /// use urdf_joint_drives::model_elements::robot::{LinkDescription, RobotDescription};
    ///
    /// let mut robot = RobotDescription::new("arm".to_string());
    /// robot.add_link(LinkDescription::new("base".to_string(), 1.0, Matrix3::identity())).unwrap();
    /// robot.add_link(LinkDescription::new("tip".to_string(), 1.0, Matrix3::identity())).unwrap();
    /// robot
    ///     .add_joint(JointDescription::new(
    ///         "hinge".to_string(),
    ///         JointType::Revolute,
    ///         "base".to_string(),
    ///         "tip".to_string(),
    ///     ))
    ///     .unwrap();
    ///
    /// robot.compute_joint_inertias();
    ///
    /// // Two identical links on top of each other.
    /// let m = Matrix3::<f64>::identity().norm();
    /// assert!((robot.joint_inertia("hinge").unwrap() - m / 2.0).abs() < 1e-12);
    /// ```
    pub fn compute_joint_inertias(&mut self) {
        let inertias: Vec<f64> = self
            .joints
            .iter()
            .map(|joint| {
                let m0 = self.accumulate(joint, JointSide::Parent).norm();
                let m1 = self.accumulate(joint, JointSide::Child).norm();
                equivalent_joint_inertia(m0, m1)
            })
            .collect();

        for (joint, inertia) in self.joints.iter_mut().zip(inertias) {
            debug!(
                "Computed equivalent inertia of {} for joint {}",
                inertia,
                joint.name()
            );
            joint.set_inertia(inertia);
        }
    }

    /// Consumes the robot and returns its joint descriptions in insertion order.
    pub fn into_joints(self) -> Vec<JointDescription> {
        self.joints
    }

    /// Returns the description of the joint with the given name.
    pub fn joint(&self, name: &str) -> Option<&JointDescription> {
        self.joint_index.get(name).map(|i| &self.joints[*i])
    }

    /// Returns the equivalent inertia of the given joint.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    pub fn joint_inertia(&self, name: &str) -> Result<f64, Error> {
        self.joint(name)
            .map(|j| j.inertia())
            .ok_or_else(|| Error::UnknownJoint {
                name: name.to_string(),
            })
    }

    /// Returns the joint descriptions in insertion order.
    pub fn joints(&self) -> impl Iterator<Item = &JointDescription> {
        self.joints.iter()
    }

    /// Returns the description of the link with the given name.
    pub fn link(&self, name: &str) -> Option<&LinkDescription> {
        self.links.get(name)
    }

    /// Returns the name of the robot.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Creates a new [RobotDescription] without links and joints.
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Returns the number of joints.
    pub fn number_of_joints(&self) -> usize {
        self.joints.len()
    }

    /// Returns the number of links.
    pub fn number_of_links(&self) -> usize {
        self.links.len()
    }
}

fn equivalent_joint_inertia(m0: f64, m1: f64) -> f64 {
    if m0 + m1 > 0.0 {
        m0 * m1 / (m0 + m1)
    } else {
        0.0
    }
}
