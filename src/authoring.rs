//! Translates the resolved joints of a [JointCollection] into the physics attributes that a
//! stage authoring step writes for each joint.
//!
//! The authoring step itself is external. It is reached through the [StageAuthoring] trait
//! and receives one [JointAuthoring] per joint.

use std::f64::consts::PI;

use log::warn;

use crate::{
    collection::JointCollection,
    config::ImportConfig,
    mimic::effective_target_type,
    model_elements::joint_elements::{DriveType, EffectiveTargetType, Joint, JointType},
    Error,
};

#[cfg(test)]
#[path = "authoring_tests.rs"]
mod authoring_tests;

/// The fraction of the range of the followed joint by which the limits of a mimic joint are
/// widened on each side.
const MIMIC_LIMIT_MARGIN: f64 = 0.2;

/// Defines the kind of motion a drive acts on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DriveAxis {
    /// The drive rotates the joint.
    Angular,
    /// The drive translates the joint.
    Linear,
}

impl DriveAxis {
    /// Returns the axis that drives the given type of joint.
    pub fn for_joint_type(joint_type: JointType) -> Self {
        if joint_type.is_linear() {
            DriveAxis::Linear
        } else {
            DriveAxis::Angular
        }
    }
}

/// Defines the quantity a drive steers towards, together with the target value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriveTarget {
    /// The drive steers towards a position.
    Position(f64),
    /// The drive steers towards a velocity.
    Velocity(f64),
}

/// Describes the attributes that are authored for a single joint.
///
/// Positions and velocities are expressed in the units of the stage, i.e. degrees for angular
/// joints and scaled distances for linear joints.
#[derive(Clone, Debug, PartialEq)]
pub enum JointAuthoring {
    /// A joint without an active drive. The passive dynamics of the joint are authored as the
    /// gains of the drive.
    Passive {
        /// The axis the drive acts on.
        axis: DriveAxis,
        /// The passive stiffness of the joint.
        stiffness: f64,
        /// The passive damping of the joint.
        damping: f64,
        /// The maximum force or torque of the drive.
        max_force: f64,
        /// The lower and upper position limit, if the joint has any.
        position_limits: Option<(f64, f64)>,
        /// The maximum velocity of the joint.
        max_velocity: f64,
    },

    /// A joint with a position or velocity drive.
    Drive {
        /// The axis the drive acts on.
        axis: DriveAxis,
        /// Defines whether the gains produce an acceleration or a force.
        drive_type: DriveType,
        /// The quantity the drive steers towards.
        target: DriveTarget,
        /// The authored stiffness. Zero for velocity drives.
        stiffness: f64,
        /// The authored damping. For velocity drives this is the strength of the drive.
        damping: f64,
        /// The maximum force or torque of the drive.
        max_force: f64,
        /// The lower and upper position limit, if the joint has any.
        position_limits: Option<(f64, f64)>,
        /// The maximum velocity of the joint.
        max_velocity: f64,
    },

    /// A joint that follows another joint.
    Mimic {
        /// The name of the joint that is followed.
        reference_joint: String,
        /// The gearing between the joints. This is the negated mimic multiplier.
        gearing: f64,
        /// The offset between the joints.
        offset: f64,
        /// The natural frequency of the mimic constraint.
        natural_frequency: f64,
        /// The damping ratio of the mimic constraint.
        damping_ratio: f64,
        /// The lower and upper position limit derived from the followed joint, if that joint
        /// exists and has limits.
        position_limits: Option<(f64, f64)>,
    },
}

impl JointAuthoring {
    /// Returns the attributes to author for the given joint.
    ///
    /// ## Parameters
    ///
    /// * 'joint' - The joint
    /// * 'reference' - The joint that is followed when the joint is a mimic joint, if it exists
    /// * 'config' - The import configuration
    pub fn for_joint(joint: &Joint, reference: Option<&Joint>, config: &ImportConfig) -> Self {
        let distance_scale = config.distance_scale();
        let axis = DriveAxis::for_joint_type(joint.joint_type());
        let limit = joint.limit();
        let drive = joint.drive();

        match effective_target_type(joint, config) {
            EffectiveTargetType::Mimic => {
                let (reference_joint, multiplier, offset) = match joint.mimic() {
                    Some(m) => (m.joint().to_string(), m.multiplier(), m.offset()),
                    None => (String::new(), 1.0, 0.0),
                };

                if limit.velocity > 0.0 && limit.velocity < f64::MAX {
                    warn!(
                        "Joint {} has a velocity limit but mimics joint {}, the velocity limit is ignored",
                        joint.name(),
                        reference_joint
                    );
                }

                let position_limits = reference
                    .and_then(|r| position_limits(r, distance_scale))
                    .map(|(lower, upper)| mimic_limits(multiplier, lower, upper));

                JointAuthoring::Mimic {
                    reference_joint,
                    gearing: -multiplier,
                    offset,
                    natural_frequency: drive.natural_frequency(),
                    damping_ratio: drive.damping_ratio(),
                    position_limits,
                }
            }
            EffectiveTargetType::None => JointAuthoring::Passive {
                axis,
                stiffness: joint.dynamics().stiffness,
                damping: joint.dynamics().damping,
                max_force: max_force(joint, distance_scale),
                position_limits: position_limits(joint, distance_scale),
                max_velocity: max_velocity(joint, distance_scale),
            },
            EffectiveTargetType::Position => JointAuthoring::Drive {
                axis,
                drive_type: drive.drive_type(),
                target: DriveTarget::Position(drive.target()),
                stiffness: drive.strength(),
                damping: drive.damping(),
                max_force: max_force(joint, distance_scale),
                position_limits: position_limits(joint, distance_scale),
                max_velocity: max_velocity(joint, distance_scale),
            },
            EffectiveTargetType::Velocity => JointAuthoring::Drive {
                axis,
                drive_type: drive.drive_type(),
                target: DriveTarget::Velocity(drive.target()),
                stiffness: 0.0,
                damping: drive.strength(),
                max_force: max_force(joint, distance_scale),
                position_limits: position_limits(joint, distance_scale),
                max_velocity: max_velocity(joint, distance_scale),
            },
        }
    }
}

/// Authors the joints of a robot into a stage.
pub trait StageAuthoring {
    /// Authors the attributes of a single joint.
    ///
    /// ## Errors
    ///
    /// * [Error::AuthoringFailed] - Returned when the joint could not be authored
    fn author_joint(&mut self, joint: &str, authoring: &JointAuthoring) -> Result<(), Error>;

    /// Returns a value indicating whether the stage can receive authored joints.
    fn is_ready(&self) -> bool;
}

/// Returns the attributes to author for every joint of the collection, in collection order.
pub fn authoring_plan(
    joints: &JointCollection,
    config: &ImportConfig,
) -> Vec<(String, JointAuthoring)> {
    joints
        .iter()
        .map(|joint| {
            let reference = joint.mimic().and_then(|m| joints.joint(m.joint()));
            (
                joint.name().to_string(),
                JointAuthoring::for_joint(joint, reference, config),
            )
        })
        .collect()
}

/// Returns the position or velocity scale between the joint units and the stage units, or
/// `None` for joints without position limits.
fn limit_scale(joint_type: JointType, distance_scale: f64) -> Option<f64> {
    match joint_type {
        JointType::Continuous => None,
        JointType::Prismatic => Some(distance_scale),
        _ => Some(180.0 / PI),
    }
}

fn max_force(joint: &Joint, distance_scale: f64) -> f64 {
    let effort = joint.limit().effort;
    if effort <= 0.0 || effort == f64::MAX {
        return f64::MAX;
    }

    if joint.joint_type().is_linear() {
        effort * distance_scale
    } else {
        effort * distance_scale * distance_scale
    }
}

fn max_velocity(joint: &Joint, distance_scale: f64) -> f64 {
    let velocity = joint.limit().velocity;
    if velocity <= 0.0 || velocity == f64::MAX {
        return f64::MAX;
    }

    velocity * limit_scale(joint.joint_type(), distance_scale).unwrap_or(180.0 / PI)
}

/// Returns the limits of a mimic joint from the limits of the followed joint.
///
/// The range of the followed joint is widened by 20% on each side and scaled by the mimic
/// multiplier. The result is ordered, so a negative multiplier still gives `lower <= upper`.
///
/// ## Parameters
///
/// * 'multiplier' - The mimic multiplier
/// * 'source_lower' - The lower limit of the followed joint
/// * 'source_upper' - The upper limit of the followed joint
///
/// ## Example
///
/// ```
/// use urdf_joint_drives::authoring::mimic_limits;
///
/// assert_eq!((-7.0, 7.0), mimic_limits(-1.0, -5.0, 5.0));
/// assert_eq!((-2.0, 12.0), mimic_limits(1.0, 0.0, 10.0));
/// ```
pub fn mimic_limits(multiplier: f64, source_lower: f64, source_upper: f64) -> (f64, f64) {
    let margin = MIMIC_LIMIT_MARGIN * (source_upper - source_lower);
    let lower = multiplier * (source_lower - margin);
    let upper = multiplier * (source_upper + margin);

    (lower.min(upper), lower.max(upper))
}

fn position_limits(joint: &Joint, distance_scale: f64) -> Option<(f64, f64)> {
    let scale = limit_scale(joint.joint_type(), distance_scale)?;
    let limit = joint.limit();
    if limit.lower == f64::MIN && limit.upper == f64::MAX {
        return None;
    }

    Some((limit.lower * scale, limit.upper * scale))
}
