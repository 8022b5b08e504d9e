//! Defines the conversions between the two equivalent representations of the gains of a
//! position or velocity drive.
//!
//! A drive can be described by its stiffness `K` and damping `D`, which is what the physics
//! engine consumes, or by the natural frequency `f` and damping ratio `r` of the damped
//! harmonic oscillator that the drive forms with the inertia `m` at the joint:
//!
//! ```text
//! K = m * f^2
//! D = 2 * m * f * r
//! ```
//!
//! The damping ratio describes the response of the joint. A ratio of 1.0 is critically damped,
//! a smaller ratio is under-damped and a larger ratio is over-damped. The natural frequency is
//! expressed in radians per second.
//!
//! The inertia `m` is the equivalent inertia of the drive. For [DriveType::Acceleration]
//! drives the gains are normalized by the inertia so the equivalent inertia is 1.0. For
//! [DriveType::Force] drives it is the equivalent inertia of the joint.

use crate::{
    mimic::DriveField,
    model_elements::joint_elements::{DriveType, Joint},
    Error,
};

#[cfg(test)]
#[path = "drive_gains_tests.rs"]
mod drive_gains_tests;

/// The natural frequency, in radians per second, of drives that have no authored gains.
pub const DEFAULT_NATURAL_FREQUENCY: f64 = 25.0;

/// The damping ratio of drives that have no authored gains.
pub const DEFAULT_DAMPING_RATIO: f64 = 0.005;

/// Defines which pair of gains is edited through the two gain columns of a joint.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum GainEditMode {
    /// The gains are edited as stiffness and damping.
    #[default]
    Stiffness,
    /// The gains are edited as natural frequency and damping ratio.
    NaturalFrequency,
}

/// Identifies one of the two gain columns of a joint.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GainColumn {
    /// The stiffness or the natural frequency, depending on the [GainEditMode].
    Primary,
    /// The damping or the damping ratio, depending on the [GainEditMode].
    Secondary,
}

impl GainEditMode {
    /// Returns the drive field that the given column addresses in the current mode.
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::drive_gains::{GainColumn, GainEditMode};
    /// use urdf_joint_drives::mimic::DriveField;
    ///
    /// assert_eq!(DriveField::Damping, GainEditMode::Stiffness.field(GainColumn::Secondary));
    /// assert_eq!(
    ///     DriveField::NaturalFrequency,
    ///     GainEditMode::NaturalFrequency.field(GainColumn::Primary)
    /// );
    /// ```
    pub fn field(&self, column: GainColumn) -> DriveField {
        match (self, column) {
            (GainEditMode::Stiffness, GainColumn::Primary) => DriveField::Strength,
            (GainEditMode::Stiffness, GainColumn::Secondary) => DriveField::Damping,
            (GainEditMode::NaturalFrequency, GainColumn::Primary) => DriveField::NaturalFrequency,
            (GainEditMode::NaturalFrequency, GainColumn::Secondary) => DriveField::DampingRatio,
        }
    }
}

/// The gains of a drive expressed as stiffness and damping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriveGains {
    /// The stiffness of the drive.
    pub stiffness: f64,
    /// The damping of the drive.
    pub damping: f64,
}

impl DriveGains {
    /// Returns the natural frequency and damping ratio that correspond to these gains.
    ///
    /// ## Parameters
    ///
    /// * 'equivalent_inertia' - The equivalent inertia of the drive. Should be positive.
    pub fn to_natural_gains(&self, equivalent_inertia: f64) -> NaturalGains {
        let natural_frequency = natural_frequency_from_stiffness(self.stiffness, equivalent_inertia);
        NaturalGains {
            natural_frequency,
            damping_ratio: damping_ratio_from_damping(
                self.damping,
                natural_frequency,
                equivalent_inertia,
            ),
        }
    }
}

/// The gains of a drive expressed as natural frequency and damping ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NaturalGains {
    /// The natural frequency of the drive in radians per second.
    pub natural_frequency: f64,
    /// The damping ratio of the drive.
    pub damping_ratio: f64,
}

impl Default for NaturalGains {
    fn default() -> Self {
        Self {
            natural_frequency: DEFAULT_NATURAL_FREQUENCY,
            damping_ratio: DEFAULT_DAMPING_RATIO,
        }
    }
}

impl NaturalGains {
    /// Returns the stiffness and damping that correspond to these gains.
    ///
    /// ## Parameters
    ///
    /// * 'equivalent_inertia' - The equivalent inertia of the drive.
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::drive_gains::NaturalGains;
    ///
    /// let gains = NaturalGains { natural_frequency: 10.0, damping_ratio: 1.0 };
    /// let drive = gains.to_drive_gains(1.0);
    ///
    /// assert_eq!(100.0, drive.stiffness);
    /// assert_eq!(20.0, drive.damping);
    /// ```
    pub fn to_drive_gains(&self, equivalent_inertia: f64) -> DriveGains {
        DriveGains {
            stiffness: stiffness_from_natural_frequency(self.natural_frequency, equivalent_inertia),
            damping: damping_from_damping_ratio(
                self.natural_frequency,
                self.damping_ratio,
                equivalent_inertia,
            ),
        }
    }
}

/// Returns the damping for the given natural frequency and damping ratio, `2 * m * f * r`.
///
/// ## Parameters
///
/// * 'natural_frequency' - The natural frequency in radians per second
/// * 'damping_ratio' - The damping ratio
/// * 'equivalent_inertia' - The equivalent inertia of the drive
pub fn damping_from_damping_ratio(
    natural_frequency: f64,
    damping_ratio: f64,
    equivalent_inertia: f64,
) -> f64 {
    2.0 * equivalent_inertia * natural_frequency * damping_ratio
}

/// Returns the damping ratio for the given damping, `D / (2 * m * f)`.
///
/// Returns zero when the natural frequency or the equivalent inertia is zero, i.e. when the
/// drive has no stiffness there is no oscillation to damp.
///
/// ## Parameters
///
/// * 'damping' - The damping of the drive
/// * 'natural_frequency' - The natural frequency in radians per second
/// * 'equivalent_inertia' - The equivalent inertia of the drive
pub fn damping_ratio_from_damping(
    damping: f64,
    natural_frequency: f64,
    equivalent_inertia: f64,
) -> f64 {
    let critical = 2.0 * equivalent_inertia * natural_frequency;
    if critical == 0.0 {
        0.0
    } else {
        damping / critical
    }
}

/// Returns the equivalent inertia of a drive.
///
/// ## Parameters
///
/// * 'drive_type' - The type of the drive
/// * 'joint_inertia' - The equivalent inertia of the joint, only used for force drives
pub fn equivalent_inertia(drive_type: DriveType, joint_inertia: f64) -> f64 {
    match drive_type {
        DriveType::Acceleration => 1.0,
        DriveType::Force => joint_inertia,
    }
}

/// Returns the equivalent inertia of the drive of the given joint when the drive was switched
/// to the given drive type.
///
/// ## Errors
///
/// * [Error::NonPositiveInertia] - Returned when the drive type is [DriveType::Force] and the
///   joint has no positive equivalent inertia.
pub fn equivalent_inertia_for_joint(joint: &Joint, drive_type: DriveType) -> Result<f64, Error> {
    let inertia = equivalent_inertia(drive_type, joint.inertia());
    if inertia > 0.0 {
        Ok(inertia)
    } else {
        Err(Error::NonPositiveInertia {
            joint: joint.name().to_string(),
            inertia: joint.inertia(),
        })
    }
}

/// Returns the natural frequency for the given stiffness, `sqrt(K / m)`.
///
/// Returns zero when the equivalent inertia is zero or when the ratio is negative.
///
/// ## Parameters
///
/// * 'stiffness' - The stiffness of the drive
/// * 'equivalent_inertia' - The equivalent inertia of the drive
pub fn natural_frequency_from_stiffness(stiffness: f64, equivalent_inertia: f64) -> f64 {
    if equivalent_inertia == 0.0 {
        return 0.0;
    }

    let squared = stiffness / equivalent_inertia;
    if squared > 0.0 {
        squared.sqrt()
    } else {
        0.0
    }
}

/// Returns the stiffness for the given natural frequency, `m * f^2`.
///
/// ## Parameters
///
/// * 'natural_frequency' - The natural frequency in radians per second
/// * 'equivalent_inertia' - The equivalent inertia of the drive
///
/// ## Example
///
/// ```
/// use urdf_joint_drives::drive_gains::{equivalent_inertia, stiffness_from_natural_frequency};
/// use urdf_joint_drives::model_elements::joint_elements::DriveType;
///
/// let inertia = equivalent_inertia(DriveType::Force, 2.0);
/// assert_eq!(200.0, stiffness_from_natural_frequency(10.0, inertia));
/// ```
pub fn stiffness_from_natural_frequency(natural_frequency: f64, equivalent_inertia: f64) -> f64 {
    equivalent_inertia * natural_frequency * natural_frequency
}
