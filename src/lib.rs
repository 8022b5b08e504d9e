#![warn(missing_docs)]

//! Joint drive parameterization for robots imported from URDF descriptions.
//!
//! Provides the data model and the logic that keeps the drive configuration of every
//! movable joint of a robot consistent, i.e. the target type, the drive type and the
//! gains of the drive expressed either as stiffness and damping or as natural frequency
//! and damping ratio. The resolved joints are handed to a stage authoring collaborator
//! which writes the physics drive and mimic attributes.

use thiserror::Error;

use crate::mimic::DriveField;

/// Defines the options that control how a robot description is imported.
pub mod config;

/// Defines the conversions between the different representations of drive gains.
pub mod drive_gains;

/// Determines the effective target type of joints and the editability of their drive fields.
pub mod mimic;

/// Defines the elements that make up a robot description.
pub mod model_elements;

/// Defines the collection of tunable joints for a single robot.
pub mod collection;

/// Provides the hand-off of resolved joints to the stage authoring step.
pub mod authoring;

/// Defines the import session that owns the configuration and the joints of a robot.
pub mod session;

/// Defines the different errors for the joint drive crate.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Returned when a stage authoring collaborator fails to author a joint.
    #[error("Failed to author joint {joint}: {reason}")]
    AuthoringFailed {
        /// The name of the joint that could not be authored.
        joint: String,
        /// The reason given by the authoring collaborator.
        reason: String,
    },

    /// Returned when a joint with the same name is added more than once.
    #[error("A joint with the name {name} already exists")]
    DuplicateJoint {
        /// The name of the duplicated joint.
        name: String,
    },

    /// Returned when a link with the same name is added more than once.
    #[error("A link with the name {name} already exists")]
    DuplicateLink {
        /// The name of the duplicated link.
        name: String,
    },

    /// Returned when a configuration option is set to a value outside of its valid range.
    #[error("The value {value} is not valid for the option {option}")]
    InvalidConfigurationValue {
        /// The name of the configuration option.
        option: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when a drive field of a joint is set to a value outside of its valid range.
    #[error("The value {value} is not valid for the {field:?} of joint {joint}")]
    InvalidDriveValue {
        /// The name of the joint.
        joint: String,
        /// The drive field that was being edited.
        field: DriveField,
        /// The rejected value.
        value: f64,
    },

    /// Returned when a joint refers to a link that is not part of the robot.
    #[error("The joint {joint} refers to the unknown link {link}")]
    MissingLink {
        /// The name of the joint.
        joint: String,
        /// The name of the missing link.
        link: String,
    },

    /// Returned when a link is the child of more than one joint, which would turn the
    /// kinematic tree into a graph.
    #[error("The link {link} is already the child of the joint {joint}")]
    MultipleParentJoints {
        /// The name of the link.
        link: String,
        /// The name of the joint that already has the link as its child.
        joint: String,
    },

    /// Returned when a force driven joint has no positive equivalent inertia, which makes the
    /// conversion between stiffness and natural frequency meaningless.
    #[error("The force driven joint {joint} has a non-positive equivalent inertia of {inertia}")]
    NonPositiveInertia {
        /// The name of the joint.
        joint: String,
        /// The equivalent inertia of the joint.
        inertia: f64,
    },

    /// Returned when the results are handed to a stage that is not ready yet.
    #[error("The target stage is not ready to receive authored joints")]
    StageNotReady,

    /// Returned when there is no joint with the given name.
    #[error("There is no joint with the name {name}")]
    UnknownJoint {
        /// The name that was requested.
        name: String,
    },
}
