//! Determines the target type that is in effect for a joint and which of its drive fields
//! can be edited.
//!
//! A joint that follows another joint has its own drive disabled. Whether the mimic
//! relationship of a joint is honoured depends on the `parse_mimic` option of the
//! [ImportConfig]. The stored [JointTargetType](crate::model_elements::joint_elements::JointTargetType)
//! of the joint is never changed by this, so switching the option off restores the
//! drive that was configured before.

use std::collections::HashSet;

use crate::{
    config::ImportConfig,
    model_elements::joint_elements::{EffectiveTargetType, Joint},
};

#[cfg(test)]
#[path = "mimic_tests.rs"]
mod mimic_tests;

/// Identifies one of the editable fields of a joint drive.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DriveField {
    /// The quantity the drive steers towards.
    TargetType,
    /// The stiffness of the drive.
    Strength,
    /// The damping of the drive.
    Damping,
    /// The natural frequency of the drive.
    NaturalFrequency,
    /// The damping ratio of the drive.
    DampingRatio,
}

/// Describes which drive fields of a joint can be edited.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldEnablement {
    target_type: bool,
    strength: bool,
    damping: bool,
    natural_frequency: bool,
    damping_ratio: bool,
}

impl FieldEnablement {
    /// Returns the field enablement for a joint with the given effective target type.
    ///
    /// | effective type | target type | strength | damping | natural frequency | damping ratio |
    /// |---|---|---|---|---|---|
    /// | None | enabled | disabled | disabled | disabled | disabled |
    /// | Position | enabled | enabled | enabled | enabled | enabled |
    /// | Velocity | enabled | enabled | disabled | enabled | disabled |
    /// | Mimic | disabled | disabled | disabled | disabled | disabled |
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::mimic::{DriveField, FieldEnablement};
    /// use urdf_joint_drives::model_elements::joint_elements::EffectiveTargetType;
    ///
    /// let enablement = FieldEnablement::for_target_type(EffectiveTargetType::Velocity);
    /// assert!(enablement.is_enabled(DriveField::Strength));
    /// assert!(!enablement.is_enabled(DriveField::Damping));
    /// ```
    pub fn for_target_type(target_type: EffectiveTargetType) -> Self {
        match target_type {
            EffectiveTargetType::None => Self {
                target_type: true,
                strength: false,
                damping: false,
                natural_frequency: false,
                damping_ratio: false,
            },
            EffectiveTargetType::Position => Self {
                target_type: true,
                strength: true,
                damping: true,
                natural_frequency: true,
                damping_ratio: true,
            },
            EffectiveTargetType::Velocity => Self {
                target_type: true,
                strength: true,
                damping: false,
                natural_frequency: true,
                damping_ratio: false,
            },
            EffectiveTargetType::Mimic => Self {
                target_type: false,
                strength: false,
                damping: false,
                natural_frequency: false,
                damping_ratio: false,
            },
        }
    }

    /// Returns the field enablement of the given joint.
    pub fn for_joint(joint: &Joint, config: &ImportConfig) -> Self {
        Self::for_target_type(effective_target_type(joint, config))
    }

    /// Returns a value indicating whether the given field can be edited.
    pub fn is_enabled(&self, field: DriveField) -> bool {
        match field {
            DriveField::TargetType => self.target_type,
            DriveField::Strength => self.strength,
            DriveField::Damping => self.damping,
            DriveField::NaturalFrequency => self.natural_frequency,
            DriveField::DampingRatio => self.damping_ratio,
        }
    }
}

/// A mimic relationship that refers to a joint which is not part of the collection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DanglingMimicReference {
    follower: String,
    reference: String,
}

impl DanglingMimicReference {
    /// Returns the name of the joint that has the mimic relationship.
    pub fn follower(&self) -> &str {
        self.follower.as_ref()
    }

    /// Returns the name of the joint that is referred to but does not exist.
    pub fn reference(&self) -> &str {
        self.reference.as_ref()
    }
}

/// Returns the mimic relationships of the given joints that refer to a joint outside the
/// given set, in the order of the joints.
///
/// Joints without a mimic relationship, or with an empty reference, are skipped.
///
/// ## Parameters
///
/// * 'joints' - The joints of a single robot
pub fn dangling_mimic_references<'a, I>(joints: I) -> Vec<DanglingMimicReference>
where
    I: IntoIterator<Item = &'a Joint> + Clone,
{
    let names: HashSet<&str> = joints.clone().into_iter().map(|j| j.name()).collect();

    joints
        .into_iter()
        .filter_map(|joint| {
            joint
                .mimic()
                .filter(|m| m.is_set() && !names.contains(m.joint()))
                .map(|m| DanglingMimicReference {
                    follower: joint.name().to_string(),
                    reference: m.joint().to_string(),
                })
        })
        .collect()
}

/// Returns the target type that is in effect for the given joint.
///
/// A joint with a non-empty mimic reference is a [EffectiveTargetType::Mimic] follower when
/// the configuration honours mimic relationships. Otherwise the stored target type of the
/// drive is in effect.
///
/// ## Parameters
///
/// * 'joint' - The joint
/// * 'config' - The import configuration, only `parse_mimic` is consulted
pub fn effective_target_type(joint: &Joint, config: &ImportConfig) -> EffectiveTargetType {
    if config.parse_mimic() && joint.has_mimic() {
        EffectiveTargetType::Mimic
    } else {
        joint.drive().target_type().into()
    }
}
