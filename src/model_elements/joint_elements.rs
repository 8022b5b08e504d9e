//! Defines the joint related elements of a robot description.
//!
//! A [JointDescription] is the record that a URDF parser produces for every `<joint>` element.
//! A [Joint] is the tunable counterpart that is owned by a
//! [JointCollection](crate::collection::JointCollection) for as long as the robot is loaded.
//! Only joints that can move are turned into a [Joint], fixed joints are structural only.

extern crate nalgebra as na;

use na::{Isometry3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "joint_elements_tests.rs"]
mod joint_elements_tests;

/// Defines the kind of motion a joint allows between its parent and child link.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointType {
    /// A hinge joint that rotates around the axis between a lower and an upper limit.
    Revolute,
    /// A hinge joint that rotates around the axis without any limits.
    Continuous,
    /// A sliding joint that translates along the axis between a lower and an upper limit.
    Prismatic,
    /// Not really a joint because it cannot move. All degrees of freedom are locked.
    Fixed,
    /// A joint that allows motion in all 6 degrees of freedom.
    Floating,
    /// A joint that allows motion in the plane perpendicular to the axis.
    Planar,
}

impl JointType {
    /// Returns a value indicating whether the joint locks all degrees of freedom.
    pub fn is_fixed(&self) -> bool {
        *self == JointType::Fixed
    }

    /// Returns a value indicating whether the joint moves along, rather than around, its axis.
    pub fn is_linear(&self) -> bool {
        *self == JointType::Prismatic
    }
}

/// Defines the quantity a joint drive steers towards. This is the value that is stored
/// for a joint.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointTargetType {
    /// The joint has no drive.
    None,
    /// The drive steers towards a target position.
    #[default]
    Position,
    /// The drive steers towards a target velocity.
    Velocity,
}

/// Defines the target type that is in effect for a joint.
///
/// In addition to the stored [JointTargetType] values a joint can be a mimic follower, in
/// which case its motion is slaved to another joint and its own drive is disabled. The
/// [Mimic](EffectiveTargetType::Mimic) value is never stored, it is derived by
/// [effective_target_type](crate::mimic::effective_target_type).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EffectiveTargetType {
    /// The joint has no drive.
    None,
    /// The drive steers towards a target position.
    Position,
    /// The drive steers towards a target velocity.
    Velocity,
    /// The joint follows another joint.
    Mimic,
}

impl From<JointTargetType> for EffectiveTargetType {
    fn from(value: JointTargetType) -> Self {
        match value {
            JointTargetType::None => EffectiveTargetType::None,
            JointTargetType::Position => EffectiveTargetType::Position,
            JointTargetType::Velocity => EffectiveTargetType::Velocity,
        }
    }
}

/// Defines how the gains of a drive are interpreted by the physics engine.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriveType {
    /// The gains are normalized by the inertia of the joint, i.e. the drive produces an
    /// acceleration.
    #[default]
    Acceleration,
    /// The gains produce a force or torque, so they scale with the inertia of the joint.
    Force,
}

/// Stores the drive configuration of a joint.
///
/// The gains of the drive are available in two equivalent views, stiffness and damping on
/// the one hand and natural frequency and damping ratio on the other hand. The
/// [JointCollection](crate::collection::JointCollection) keeps both views consistent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointDrive {
    /// The quantity the drive steers towards.
    target_type: JointTargetType,

    /// Defines whether the gains produce an acceleration or a force.
    drive_type: DriveType,

    /// The stiffness of the drive.
    strength: f64,

    /// The damping of the drive.
    damping: f64,

    /// The natural frequency of the drive in radians per second.
    natural_frequency: f64,

    /// The damping ratio of the drive.
    damping_ratio: f64,

    /// The position or velocity the drive steers towards.
    target: f64,
}

impl JointDrive {
    /// Returns the damping ratio of the drive.
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Returns the damping of the drive.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Returns the drive type.
    pub fn drive_type(&self) -> DriveType {
        self.drive_type
    }

    /// Returns the natural frequency of the drive in radians per second.
    pub fn natural_frequency(&self) -> f64 {
        self.natural_frequency
    }

    /// Creates a new [JointDrive] from the stiffness and damping of the drive.
    ///
    /// The natural frequency and damping ratio start at zero and are derived once the
    /// drive is attached to a joint with a known equivalent inertia.
    ///
    /// ## Parameters
    ///
    /// * 'target_type' - The quantity the drive steers towards
    /// * 'drive_type' - Defines whether the gains produce an acceleration or a force
    /// * 'strength' - The stiffness of the drive
    /// * 'damping' - The damping of the drive
    pub fn new(
        target_type: JointTargetType,
        drive_type: DriveType,
        strength: f64,
        damping: f64,
    ) -> Self {
        Self {
            target_type,
            drive_type,
            strength,
            damping,
            natural_frequency: 0.0,
            damping_ratio: 0.0,
            target: 0.0,
        }
    }

    /// Returns the stiffness of the drive.
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Returns the position or velocity the drive steers towards.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns the stored target type of the drive.
    pub fn target_type(&self) -> JointTargetType {
        self.target_type
    }

    /// Returns a copy of the drive with the given target value.
    #[must_use]
    pub fn with_target(mut self, target: f64) -> Self {
        self.target = target;
        self
    }

    pub(crate) fn set_damping(&mut self, damping: f64) {
        self.damping = damping;
    }

    pub(crate) fn set_damping_ratio(&mut self, damping_ratio: f64) {
        self.damping_ratio = damping_ratio;
    }

    pub(crate) fn set_drive_type(&mut self, drive_type: DriveType) {
        self.drive_type = drive_type;
    }

    pub(crate) fn set_natural_frequency(&mut self, natural_frequency: f64) {
        self.natural_frequency = natural_frequency;
    }

    pub(crate) fn set_strength(&mut self, strength: f64) {
        self.strength = strength;
    }

    pub(crate) fn set_target_type(&mut self, target_type: JointTargetType) {
        self.target_type = target_type;
    }
}

/// Describes the linear relationship between a mimic joint and the joint it follows.
///
/// The position of the follower is `multiplier * position_of_joint + offset`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointMimic {
    /// The name of the joint that is followed. An empty name means the joint follows nothing.
    joint: String,

    /// The factor applied to the position of the followed joint.
    multiplier: f64,

    /// The offset added to the scaled position of the followed joint.
    offset: f64,
}

impl JointMimic {
    /// Returns a value indicating whether the relationship refers to a joint.
    pub fn is_set(&self) -> bool {
        !self.joint.is_empty()
    }

    /// Returns the name of the joint that is followed.
    pub fn joint(&self) -> &str {
        self.joint.as_ref()
    }

    /// Returns the factor applied to the position of the followed joint.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Creates a new [JointMimic].
    ///
    /// ## Parameters
    ///
    /// * 'joint' - The name of the joint that is followed
    /// * 'multiplier' - The factor applied to the position of the followed joint
    /// * 'offset' - The offset added to the scaled position of the followed joint
    pub fn new(joint: String, multiplier: f64, offset: f64) -> Self {
        Self {
            joint,
            multiplier,
            offset,
        }
    }

    /// Returns the offset added to the scaled position of the followed joint.
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// The passive dynamics of a joint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointDynamics {
    /// The physical damping of the joint.
    pub damping: f64,
    /// The physical static friction of the joint.
    pub friction: f64,
    /// The physical stiffness of the joint.
    pub stiffness: f64,
}

/// The limits of a joint.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimit {
    /// The lower position limit, in radians for revolute joints and meters for prismatic joints.
    pub lower: f64,
    /// The upper position limit, in radians for revolute joints and meters for prismatic joints.
    pub upper: f64,
    /// The maximum effort of the joint.
    pub effort: f64,
    /// The maximum velocity of the joint.
    pub velocity: f64,
}

impl Default for JointLimit {
    fn default() -> Self {
        Self {
            lower: f64::MIN,
            upper: f64::MAX,
            effort: f64::MAX,
            velocity: f64::MAX,
        }
    }
}

/// Describes a joint as it was parsed from the robot description.
#[derive(Clone, Debug, PartialEq)]
pub struct JointDescription {
    name: String,
    joint_type: JointType,
    parent_link: String,
    child_link: String,

    /// The transform from the child link frame to the parent link frame. The joint is located
    /// at the origin of the child link.
    origin: Isometry3<f64>,
    axis: Vector3<f64>,
    dynamics: JointDynamics,
    limit: JointLimit,

    /// The authored drive, if the description contained drive information.
    drive: Option<JointDrive>,
    mimic: Option<JointMimic>,

    /// The equivalent inertia at the joint.
    inertia: f64,
}

impl JointDescription {
    /// Returns the axis of the joint, expressed in the joint frame.
    pub fn axis(&self) -> &Vector3<f64> {
        &self.axis
    }

    /// Returns the name of the child link.
    pub fn child_link(&self) -> &str {
        self.child_link.as_ref()
    }

    /// Returns the authored drive, if any.
    pub fn drive(&self) -> Option<&JointDrive> {
        self.drive.as_ref()
    }

    /// Returns the passive dynamics of the joint.
    pub fn dynamics(&self) -> &JointDynamics {
        &self.dynamics
    }

    /// Returns the equivalent inertia at the joint.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Returns the type of the joint.
    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    /// Returns the limits of the joint.
    pub fn limit(&self) -> &JointLimit {
        &self.limit
    }

    /// Returns the mimic relationship of the joint, if any.
    pub fn mimic(&self) -> Option<&JointMimic> {
        self.mimic.as_ref()
    }

    /// Returns the name of the joint.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Creates a new [JointDescription] with an identity origin, an x-axis, default dynamics
    /// and limits, no drive, no mimic relationship and no inertia.
    ///
    /// ## Parameters
    ///
    /// * 'name' - The unique name of the joint
    /// * 'joint_type' - The type of the joint
    /// * 'parent_link' - The name of the parent link
    /// * 'child_link' - The name of the child link
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::model_elements::joint_elements::{JointDescription, JointMimic, JointType};
    ///
    /// let joint = JointDescription::new(
    ///     "finger_right".to_string(),
    ///     JointType::Prismatic,
    ///     "hand".to_string(),
    ///     "right_finger".to_string(),
    /// )
    /// .with_mimic(JointMimic::new("finger_left".to_string(), 1.0, 0.0))
    /// .with_inertia(0.2);
    ///
    /// assert_eq!("finger_left", joint.mimic().unwrap().joint());
    /// assert_eq!(0.2, joint.inertia());
    /// ```
    pub fn new(name: String, joint_type: JointType, parent_link: String, child_link: String) -> Self {
        Self {
            name,
            joint_type,
            parent_link,
            child_link,
            origin: Isometry3::identity(),
            axis: Vector3::x(),
            dynamics: JointDynamics::default(),
            limit: JointLimit::default(),
            drive: None,
            mimic: None,
            inertia: 0.0,
        }
    }

    /// Returns the transform from the child link frame to the parent link frame.
    pub fn origin(&self) -> &Isometry3<f64> {
        &self.origin
    }

    /// Returns the name of the parent link.
    pub fn parent_link(&self) -> &str {
        self.parent_link.as_ref()
    }

    /// Sets the equivalent inertia at the joint.
    pub fn set_inertia(&mut self, inertia: f64) {
        self.inertia = inertia;
    }

    /// Returns the description with the given axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Vector3<f64>) -> Self {
        self.axis = axis;
        self
    }

    /// Returns the description with the given authored drive.
    #[must_use]
    pub fn with_drive(mut self, drive: JointDrive) -> Self {
        self.drive = Some(drive);
        self
    }

    /// Returns the description with the given passive dynamics.
    #[must_use]
    pub fn with_dynamics(mut self, dynamics: JointDynamics) -> Self {
        self.dynamics = dynamics;
        self
    }

    /// Returns the description with the given equivalent inertia.
    #[must_use]
    pub fn with_inertia(mut self, inertia: f64) -> Self {
        self.inertia = inertia;
        self
    }

    /// Returns the description with the given limits.
    #[must_use]
    pub fn with_limit(mut self, limit: JointLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the description with the given mimic relationship.
    #[must_use]
    pub fn with_mimic(mut self, mimic: JointMimic) -> Self {
        self.mimic = Some(mimic);
        self
    }

    /// Returns the description with the given origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Isometry3<f64>) -> Self {
        self.origin = origin;
        self
    }
}

/// A movable joint whose drive can be tuned.
///
/// Joints are created by the [JointCollection](crate::collection::JointCollection) from a
/// [JointDescription] and are owned by that collection for the life time of the loaded robot.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    /// The unique name of the joint.
    name: String,

    /// The type of the joint. Never [JointType::Fixed].
    joint_type: JointType,

    /// The equivalent inertia at the joint. Only used when the drive type is [DriveType::Force].
    inertia: f64,

    dynamics: JointDynamics,
    limit: JointLimit,
    drive: JointDrive,
    mimic: Option<JointMimic>,
}

impl Joint {
    /// Returns the drive of the joint.
    pub fn drive(&self) -> &JointDrive {
        &self.drive
    }

    /// Returns the passive dynamics of the joint.
    pub fn dynamics(&self) -> &JointDynamics {
        &self.dynamics
    }

    /// Returns a value indicating whether the joint follows another joint.
    pub fn has_mimic(&self) -> bool {
        self.mimic.as_ref().map_or(false, |m| m.is_set())
    }

    /// Returns the equivalent inertia at the joint.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Returns the type of the joint.
    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    /// Returns the limits of the joint.
    pub fn limit(&self) -> &JointLimit {
        &self.limit
    }

    /// Returns the mimic relationship of the joint, if any.
    pub fn mimic(&self) -> Option<&JointMimic> {
        self.mimic.as_ref()
    }

    /// Returns the name of the joint.
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Creates a new [Joint] from a description and a fully initialized drive.
    pub(crate) fn new(description: JointDescription, drive: JointDrive) -> Self {
        Self {
            name: description.name,
            joint_type: description.joint_type,
            inertia: description.inertia,
            dynamics: description.dynamics,
            limit: description.limit,
            drive,
            mimic: description.mimic,
        }
    }

    pub(crate) fn drive_mut(&mut self) -> &mut JointDrive {
        &mut self.drive
    }
}
