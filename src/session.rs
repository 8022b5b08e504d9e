//! Defines the [ImportSession], the handle that ties the configuration of an import to the
//! joints of the robot that is being imported.

use log::{debug, error};

use crate::{
    authoring::{authoring_plan, StageAuthoring},
    collection::{JointCollection, JointEdit},
    config::{ImportConfig, SharedImportConfig},
    model_elements::{
        joint_elements::{DriveType, JointDescription},
        robot::RobotDescription,
    },
    Error,
};

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;

/// A single import session.
///
/// The session owns the configuration and the joints of the robot that is currently loaded.
/// Loading a new robot replaces the joints of the previous robot. The configuration handle
/// can be cloned and shared with other parts of the application, changes made through any
/// clone are seen by the session.
#[derive(Debug)]
pub struct ImportSession {
    config: SharedImportConfig,
    joints: JointCollection,
}

impl ImportSession {
    /// Applies an edit to the named joint, using the current configuration.
    ///
    /// See [JointCollection::apply_edit] for the rules that apply to the edit.
    ///
    /// ## Parameters
    ///
    /// * 'name' - The name of the edited joint
    /// * 'edit' - The change to the drive
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    /// * [Error::InvalidDriveValue] - Returned when the value is negative or not finite
    /// * [Error::NonPositiveInertia] - Returned when the natural gains of a force driven joint
    ///   without inertia are edited
    pub fn apply_edit(&mut self, name: &str, edit: JointEdit) -> Result<usize, Error> {
        let config = self.config.snapshot();
        self.joints.apply_edit(name, edit, &config)
    }

    /// Returns the shared configuration of the session.
    pub fn config(&self) -> &SharedImportConfig {
        &self.config
    }

    /// Hands the joints of the session to a stage.
    ///
    /// The stage has to be ready when this is called. The session does not wait for the
    /// stage to become ready.
    ///
    /// ## Parameters
    ///
    /// * 'stage' - The stage that receives the authored joints
    ///
    /// ## Returns
    ///
    /// The number of joints that were authored.
    ///
    /// ## Errors
    ///
    /// * [Error::StageNotReady] - Returned when the stage is not ready, in which case nothing
    ///   is authored
    /// * [Error::AuthoringFailed] - Returned when the stage fails to author a joint. Joints
    ///   that come before the failing joint remain authored.
    pub fn hand_off<S>(&self, stage: &mut S) -> Result<usize, Error>
    where
        S: StageAuthoring,
    {
        if !stage.is_ready() {
            return Err(Error::StageNotReady);
        }

        let config = self.config.snapshot();
        let plan = authoring_plan(&self.joints, &config);
        for (name, authoring) in &plan {
            if let Err(err) = stage.author_joint(name, authoring) {
                error!("Failed to author joint {}: {}", name, err);
                return Err(err);
            }
        }

        debug!("Authored {} joints", plan.len());
        Ok(plan.len())
    }

    /// Returns the joints of the robot that is currently loaded.
    pub fn joints(&self) -> &JointCollection {
        &self.joints
    }

    /// Returns the joints of the robot that is currently loaded, for editing.
    pub fn joints_mut(&mut self) -> &mut JointCollection {
        &mut self.joints
    }

    /// Replaces the joints of the session with the given joint descriptions.
    ///
    /// The equivalent inertia of the descriptions is used as is.
    ///
    /// ## Errors
    ///
    /// * [Error::DuplicateJoint] - Returned when two movable joints have the same name. The
    ///   joints of the session are not changed.
    pub fn load_joints<I>(&mut self, descriptions: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = JointDescription>,
    {
        let config = self.config.snapshot();
        self.joints = JointCollection::load_joints(descriptions, &config)?;
        Ok(self.joints.len())
    }

    /// Replaces the joints of the session with the joints of the given robot.
    ///
    /// The equivalent inertia of every joint is computed from the links of the robot before
    /// the joints are loaded.
    ///
    /// ## Returns
    ///
    /// The number of movable joints that were loaded.
    ///
    /// ## Example
    ///
    /// ```
    /// use nalgebra::Matrix3;
    /// use urdf_joint_drives::config::{ImportConfig, SharedImportConfig};
    /// use urdf_joint_drives::model_elements::joint_elements::{JointDescription, JointType};
    /// use urdf_joint_drives::model_elements::robot::{LinkDescription, RobotDescription};
    /// use urdf_joint_drives::session::ImportSession;
    ///
    /// let mut robot = RobotDescription::new("arm".to_string());
    /// robot.add_link(LinkDescription::new("base".to_string(), 1.0, Matrix3::identity())).unwrap();
    /// robot.add_link(LinkDescription::new("upper".to_string(), 1.0, Matrix3::identity())).unwrap();
    /// robot.add_joint(JointDescription::new(
    ///     "shoulder".to_string(),
    ///     JointType::Revolute,
    ///     "base".to_string(),
    ///     "upper".to_string(),
    /// )).unwrap();
    ///
    /// let mut session = ImportSession::new(SharedImportConfig::new(ImportConfig::default()));
    /// assert_eq!(1, session.load_robot(robot).unwrap());
    /// assert!(session.joints().joint("shoulder").unwrap().inertia() > 0.0);
    /// ```
    pub fn load_robot(&mut self, mut robot: RobotDescription) -> Result<usize, Error> {
        robot.compute_joint_inertias();
        debug!("Loading robot {}", robot.name());
        self.load_joints(robot.into_joints())
    }

    /// Creates a new session without joints.
    ///
    /// ## Parameters
    ///
    /// * 'config' - The configuration of the session
    pub fn new(config: SharedImportConfig) -> Self {
        Self {
            config,
            joints: JointCollection::default(),
        }
    }

    /// Switches every joint to the given drive type, keeping the natural frequency and damping
    /// ratio of the joints.
    ///
    /// ## Errors
    ///
    /// * [Error::NonPositiveInertia] - Returned when a joint would be force driven without
    ///   inertia. No joint is changed.
    pub fn set_drive_type(&mut self, drive_type: DriveType) -> Result<(), Error> {
        self.joints.set_drive_type(drive_type)
    }

    /// Sets whether mimic relationships are materialized.
    ///
    /// The stored target types of the joints are not changed. Only the effective target types
    /// that are derived from the configuration change.
    pub fn set_parse_mimic(&self, value: bool) {
        self.config.set_parse_mimic(value);
    }

    /// Returns a copy of the current configuration.
    pub fn snapshot(&self) -> ImportConfig {
        self.config.snapshot()
    }
}
