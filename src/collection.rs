//! Defines the [JointCollection], the set of tunable joints of a single robot.
//!
//! The collection owns one [Joint] per movable joint of the robot, in the order in which the
//! joints were described. It applies edits to the drive of a single joint, propagates edits to
//! the selected joints when bulk editing is enabled and switches the drive type of all joints
//! at once. After every edit the stiffness and natural frequency of the edited drives are
//! consistent with each other. The damping follows the damping ratio for position drives
//! only, the damping of velocity drives is never written by a gain recompute.
//!
//! Interested parties can [subscribe](JointCollection::subscribe) to the changes that are made
//! to the joints of the collection.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};

use crate::{
    config::ImportConfig,
    drive_gains::{
        damping_from_damping_ratio, equivalent_inertia, equivalent_inertia_for_joint, DriveGains,
        GainColumn, GainEditMode, NaturalGains, DEFAULT_DAMPING_RATIO, DEFAULT_NATURAL_FREQUENCY,
    },
    mimic::{self, DanglingMimicReference, DriveField, FieldEnablement},
    model_elements::joint_elements::{
        DriveType, EffectiveTargetType, Joint, JointDescription, JointDrive, JointTargetType,
    },
    Error,
};

#[cfg(test)]
#[path = "collection_tests.rs"]
mod collection_tests;

/// Defines a single change to the drive of a joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointEdit {
    /// Changes the stored target type.
    TargetType(JointTargetType),
    /// Changes the stiffness. The natural frequency and damping ratio are derived again.
    Strength(f64),
    /// Changes the damping. The natural frequency and damping ratio are derived again.
    Damping(f64),
    /// Changes the natural frequency. The stiffness and damping are computed again.
    NaturalFrequency(f64),
    /// Changes the damping ratio. The stiffness and damping are computed again.
    DampingRatio(f64),
}

impl JointEdit {
    /// Returns the drive field that the edit changes.
    pub fn field(&self) -> DriveField {
        match self {
            JointEdit::TargetType(_) => DriveField::TargetType,
            JointEdit::Strength(_) => DriveField::Strength,
            JointEdit::Damping(_) => DriveField::Damping,
            JointEdit::NaturalFrequency(_) => DriveField::NaturalFrequency,
            JointEdit::DampingRatio(_) => DriveField::DampingRatio,
        }
    }

    /// Creates the edit that sets the given gain column in the given edit mode.
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::collection::JointEdit;
    /// use urdf_joint_drives::drive_gains::{GainColumn, GainEditMode};
    ///
    /// assert_eq!(
    ///     JointEdit::DampingRatio(0.7),
    ///     JointEdit::for_column(GainEditMode::NaturalFrequency, GainColumn::Secondary, 0.7)
    /// );
    /// ```
    pub fn for_column(mode: GainEditMode, column: GainColumn, value: f64) -> Self {
        match (mode, column) {
            (GainEditMode::Stiffness, GainColumn::Primary) => JointEdit::Strength(value),
            (GainEditMode::Stiffness, GainColumn::Secondary) => JointEdit::Damping(value),
            (GainEditMode::NaturalFrequency, GainColumn::Primary) => {
                JointEdit::NaturalFrequency(value)
            }
            (GainEditMode::NaturalFrequency, GainColumn::Secondary) => {
                JointEdit::DampingRatio(value)
            }
        }
    }

    fn value(&self) -> Option<f64> {
        match self {
            JointEdit::TargetType(_) => None,
            JointEdit::Strength(v)
            | JointEdit::Damping(v)
            | JointEdit::NaturalFrequency(v)
            | JointEdit::DampingRatio(v) => Some(*v),
        }
    }
}

/// Describes a change that was made to the drive of a joint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JointChange {
    joint: String,
    field: DriveField,
}

impl JointChange {
    /// Returns the field that was changed.
    pub fn field(&self) -> DriveField {
        self.field
    }

    /// Returns the name of the joint that was changed.
    pub fn joint(&self) -> &str {
        self.joint.as_ref()
    }
}

/// Defines the order in which the joints are listed by [JointCollection::sorted].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortPolicy {
    /// The order in which the joints were described.
    #[default]
    Default,
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

/// Defines the value by which the joints are sorted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortColumn {
    /// The name of the joint, ignoring case.
    Name,
    /// The effective target type of the joint.
    Target,
    /// The value of a gain column in the current [GainEditMode].
    Gain(GainColumn),
}

/// Stores the tunable joints of a single robot.
#[derive(Debug, Default)]
pub struct JointCollection {
    /// The joints in the order in which they were described.
    joints: Vec<Joint>,

    /// The mapping from the joint name to the index in the joint list.
    index_of: HashMap<String, usize>,

    /// The indices of the selected joints.
    selection: BTreeSet<usize>,

    /// The pair of gains addressed by the gain columns.
    mode: GainEditMode,

    /// The drive type that was last applied to all joints.
    drive_type: DriveType,

    /// Propagate edits to the other selected joints.
    bulk_edit: bool,

    subscribers: Vec<Sender<JointChange>>,
}

impl JointCollection {
    /// Applies an edit to the named joint. When bulk editing is enabled and the joint is
    /// selected the edit is also propagated to the other selected joints.
    ///
    /// All joints that would be changed are validated before any of them is changed.
    ///
    /// ## Parameters
    ///
    /// * 'name' - The name of the edited joint
    /// * 'edit' - The change to the drive
    /// * 'config' - The import configuration, used to determine the effective target types
    ///
    /// ## Returns
    ///
    /// The number of joints that were changed. Joints for which the edited field is disabled
    /// are not changed.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    /// * [Error::InvalidDriveValue] - Returned when the value is negative or not finite
    /// * [Error::NonPositiveInertia] - Returned when the natural gains of a force driven joint
    ///   without inertia are edited
    pub fn apply_edit(
        &mut self,
        name: &str,
        edit: JointEdit,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        let source = self.index(name)?;

        let mut targets = self.plan_edit(&[source], edit, config)?;
        if targets.is_empty() {
            return Ok(0);
        }

        if self.bulk_edit && self.selection.contains(&source) {
            let others: Vec<usize> = self
                .selection
                .iter()
                .copied()
                .filter(|i| *i != source)
                .collect();
            targets.extend(self.plan_edit(&others, edit, config)?);
        }

        for index in &targets {
            self.apply_planned(*index, edit);
        }

        if targets.len() > 1 {
            debug!(
                "Propagated {:?} from joint {} to {} other joints",
                edit.field(),
                name,
                targets.len() - 1
            );
        }

        Ok(targets.len())
    }

    fn apply_planned(&mut self, index: usize, edit: JointEdit) {
        let joint = &mut self.joints[index];
        let inertia = equivalent_inertia(joint.drive().drive_type(), joint.inertia());
        let drive = joint.drive_mut();
        match edit {
            JointEdit::TargetType(target_type) => drive.set_target_type(target_type),
            JointEdit::Strength(value) => {
                drive.set_strength(value);
                update_natural_gains(drive, inertia);
            }
            JointEdit::Damping(value) => {
                drive.set_damping(value);
                update_natural_gains(drive, inertia);
            }
            JointEdit::NaturalFrequency(value) => {
                drive.set_natural_frequency(value);
                update_drive_gains(drive, inertia);
            }
            JointEdit::DampingRatio(value) => {
                drive.set_damping_ratio(value);
                drive.set_damping(damping_from_damping_ratio(
                    drive.natural_frequency(),
                    value,
                    inertia,
                ));
            }
        }

        let change = JointChange {
            joint: joint.name().to_string(),
            field: edit.field(),
        };
        self.notify(change);
    }

    /// Removes all joints from the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Returns the mimic relationships that refer to joints which are not part of the
    /// collection.
    pub fn dangling_mimic_references(&self) -> Vec<DanglingMimicReference> {
        mimic::dangling_mimic_references(self.joints.iter())
    }

    /// Removes the named joint from the selection.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    pub fn deselect(&mut self, name: &str) -> Result<(), Error> {
        let index = self.index(name)?;
        self.selection.remove(&index);
        Ok(())
    }

    /// Returns the drive type that was last applied to all joints.
    pub fn drive_type(&self) -> DriveType {
        self.drive_type
    }

    /// Returns the effective target type of the named joint.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    pub fn effective_target_type(
        &self,
        name: &str,
        config: &ImportConfig,
    ) -> Result<EffectiveTargetType, Error> {
        let index = self.index(name)?;
        Ok(mimic::effective_target_type(&self.joints[index], config))
    }

    /// Returns which drive fields of the named joint can be edited.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    pub fn field_enablement(
        &self,
        name: &str,
        config: &ImportConfig,
    ) -> Result<FieldEnablement, Error> {
        let index = self.index(name)?;
        Ok(FieldEnablement::for_joint(&self.joints[index], config))
    }

    fn index(&self, name: &str) -> Result<usize, Error> {
        self.index_of
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownJoint {
                name: name.to_string(),
            })
    }

    /// Returns a value indicating whether edits are propagated to the selected joints.
    pub fn is_bulk_edit_enabled(&self) -> bool {
        self.bulk_edit
    }

    /// Returns a value indicating whether the collection has no joints.
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Returns a value indicating whether the named joint is selected. Unknown joints are
    /// never selected.
    pub fn is_selected(&self, name: &str) -> bool {
        self.index_of
            .get(name)
            .map_or(false, |i| self.selection.contains(i))
    }

    /// Returns an iterator over the joints in the order in which they were described.
    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    /// Returns the joint with the given name.
    pub fn joint(&self, name: &str) -> Option<&Joint> {
        self.index_of.get(name).map(|i| &self.joints[*i])
    }

    /// Returns the number of joints.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Creates a collection from the joints of a robot.
    ///
    /// Fixed joints are skipped. Joints that have an authored drive keep its stiffness and
    /// damping, the natural frequency and damping ratio are derived from them. Joints without
    /// an authored drive get the default drive of the configuration.
    ///
    /// ## Parameters
    ///
    /// * 'descriptions' - The descriptions of the joints, in the order of the robot description
    /// * 'config' - The import configuration that provides the default drives
    ///
    /// ## Errors
    ///
    /// * [Error::DuplicateJoint] - Returned when two movable joints have the same name
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::collection::JointCollection;
    /// use urdf_joint_drives::config::ImportConfig;
    /// use urdf_joint_drives::model_elements::joint_elements::{JointDescription, JointType};
    ///
    /// let joints = vec![
    ///     JointDescription::new("weld".to_string(), JointType::Fixed, "a".to_string(), "b".to_string()),
    ///     JointDescription::new("elbow".to_string(), JointType::Revolute, "b".to_string(), "c".to_string()),
    /// ];
    ///
    /// let collection = JointCollection::load_joints(joints, &ImportConfig::default()).unwrap();
    ///
    /// assert_eq!(1, collection.len());
    /// assert!(collection.joint("weld").is_none());
    /// ```
    pub fn load_joints<I>(descriptions: I, config: &ImportConfig) -> Result<Self, Error>
    where
        I: IntoIterator<Item = JointDescription>,
    {
        let mut collection = Self::default();
        let mut fixed = 0;
        for description in descriptions {
            if description.joint_type().is_fixed() {
                fixed += 1;
                continue;
            }

            if collection.index_of.contains_key(description.name()) {
                return Err(Error::DuplicateJoint {
                    name: description.name().to_string(),
                });
            }

            let drive = initial_drive(&description, config);
            collection
                .index_of
                .insert(description.name().to_string(), collection.joints.len());
            collection.joints.push(Joint::new(description, drive));
        }

        if let Some(first) = collection.joints.first() {
            collection.drive_type = first.drive().drive_type();
        }

        for dangling in collection.dangling_mimic_references() {
            warn!(
                "Joint {} mimics the unknown joint {}",
                dangling.follower(),
                dangling.reference()
            );
        }

        debug!(
            "Loaded {} joints, skipped {} fixed joints",
            collection.joints.len(),
            fixed
        );

        Ok(collection)
    }

    /// Returns the pair of gains that is addressed by the gain columns.
    pub fn mode(&self) -> GainEditMode {
        self.mode
    }

    #[cfg_attr(test, mutants::skip)]
    fn notify(&mut self, change: JointChange) {
        // Subscribers that dropped their receiver are removed.
        self.subscribers
            .retain(|sender| sender.send(change.clone()).is_ok());
    }

    /// Returns the indices of the candidates that accept the edit, or an error when one of
    /// them would reject it.
    fn plan_edit(
        &self,
        candidates: &[usize],
        edit: JointEdit,
        config: &ImportConfig,
    ) -> Result<Vec<usize>, Error> {
        let mut targets = Vec::with_capacity(candidates.len());
        for index in candidates {
            let joint = &self.joints[*index];
            if !FieldEnablement::for_joint(joint, config).is_enabled(edit.field()) {
                continue;
            }

            if let Some(value) = edit.value() {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::InvalidDriveValue {
                        joint: joint.name().to_string(),
                        field: edit.field(),
                        value,
                    });
                }
            }

            if matches!(
                edit,
                JointEdit::NaturalFrequency(_) | JointEdit::DampingRatio(_)
            ) {
                equivalent_inertia_for_joint(joint, joint.drive().drive_type())?;
            }

            targets.push(*index);
        }

        Ok(targets)
    }

    /// Propagates an edit from the source joint to the other selected joints.
    ///
    /// Only the joints for which the edited field is enabled receive the value. In
    /// particular velocity driven joints never receive a damping or damping ratio. The source
    /// joint itself is not changed. Propagating with an empty selection changes nothing.
    ///
    /// ## Parameters
    ///
    /// * 'source' - The name of the joint from which the edit originates
    /// * 'edit' - The change to the drive
    /// * 'config' - The import configuration, used to determine the effective target types
    ///
    /// ## Returns
    ///
    /// The number of joints that were changed.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the source name
    /// * [Error::InvalidDriveValue] - Returned when the value is negative or not finite
    /// * [Error::NonPositiveInertia] - Returned when the natural gains of a force driven joint
    ///   without inertia are edited
    pub fn propagate_edit(
        &mut self,
        source: &str,
        edit: JointEdit,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        let source_index = self.index(source)?;
        let candidates: Vec<usize> = self
            .selection
            .iter()
            .copied()
            .filter(|i| *i != source_index)
            .collect();

        let targets = self.plan_edit(&candidates, edit, config)?;
        for index in &targets {
            self.apply_planned(*index, edit);
        }

        debug!(
            "Propagated {:?} from joint {} to {} joints",
            edit.field(),
            source,
            targets.len()
        );

        Ok(targets.len())
    }

    /// Adds the named joint to the selection.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when there is no joint with the given name
    pub fn select(&mut self, name: &str) -> Result<(), Error> {
        let index = self.index(name)?;
        self.selection.insert(index);
        Ok(())
    }

    /// Returns the names of the selected joints in collection order.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selection.iter().map(|i| self.joints[*i].name())
    }

    /// Enables or disables the propagation of edits to the selected joints.
    pub fn set_bulk_edit(&mut self, enabled: bool) {
        self.bulk_edit = enabled;
    }

    /// Sets the damping of the named joint. See [JointCollection::apply_edit].
    pub fn set_damping(
        &mut self,
        name: &str,
        value: f64,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        self.apply_edit(name, JointEdit::Damping(value), config)
    }

    /// Sets the damping ratio of the named joint. See [JointCollection::apply_edit].
    pub fn set_damping_ratio(
        &mut self,
        name: &str,
        value: f64,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        self.apply_edit(name, JointEdit::DampingRatio(value), config)
    }

    /// Switches all joints to the given drive type.
    ///
    /// Joints that already have the drive type are left alone. For the other joints the
    /// natural frequency and damping ratio are kept and the stiffness is computed again for
    /// the new equivalent inertia. The damping of a position drive is only computed again
    /// when its stiffness changes. Either all joints are switched or, when an error is
    /// returned, none are.
    ///
    /// Subscribers are notified of every stiffness and damping that changed.
    ///
    /// ## Errors
    ///
    /// * [Error::NonPositiveInertia] - Returned when switching to [DriveType::Force] and a
    ///   joint with a drive has no positive inertia
    pub fn set_drive_type(&mut self, drive_type: DriveType) -> Result<(), Error> {
        for joint in self.joints.iter().filter(|j| {
            j.drive().drive_type() != drive_type
                && j.drive().target_type() != JointTargetType::None
        }) {
            equivalent_inertia_for_joint(joint, drive_type)?;
        }

        let mut switched = 0;
        let mut changes = Vec::new();
        for joint in self
            .joints
            .iter_mut()
            .filter(|j| j.drive().drive_type() != drive_type)
        {
            let inertia = equivalent_inertia(drive_type, joint.inertia());
            joint.drive_mut().set_drive_type(drive_type);
            let fields = update_drive_gains(joint.drive_mut(), inertia);

            switched += 1;
            changes.extend(fields.into_iter().map(|field| JointChange {
                joint: joint.name().to_string(),
                field,
            }));
        }

        self.drive_type = drive_type;
        for change in changes {
            self.notify(change);
        }

        debug!("Switched {} joints to {:?} drives", switched, drive_type);

        Ok(())
    }

    /// Sets a gain column of the named joint in the current [GainEditMode]. See
    /// [JointCollection::apply_edit].
    pub fn set_gain(
        &mut self,
        name: &str,
        column: GainColumn,
        value: f64,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        self.apply_edit(name, JointEdit::for_column(self.mode, column, value), config)
    }

    /// Sets the pair of gains that is addressed by the gain columns.
    pub fn set_mode(&mut self, mode: GainEditMode) {
        self.mode = mode;
    }

    /// Sets the natural frequency of the named joint. See [JointCollection::apply_edit].
    pub fn set_natural_frequency(
        &mut self,
        name: &str,
        value: f64,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        self.apply_edit(name, JointEdit::NaturalFrequency(value), config)
    }

    /// Replaces the selection with the named joints.
    ///
    /// ## Errors
    ///
    /// * [Error::UnknownJoint] - Returned when one of the names is unknown. The selection is
    ///   not changed in that case.
    pub fn set_selection<'a, I>(&mut self, names: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let selection = names
            .into_iter()
            .map(|name| self.index(name))
            .collect::<Result<BTreeSet<usize>, Error>>()?;

        self.selection = selection;
        Ok(())
    }

    /// Sets the stiffness of the named joint. See [JointCollection::apply_edit].
    pub fn set_strength(
        &mut self,
        name: &str,
        value: f64,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        self.apply_edit(name, JointEdit::Strength(value), config)
    }

    /// Sets the stored target type of the named joint. The target type of a mimic follower
    /// cannot be changed. See [JointCollection::apply_edit].
    pub fn set_target_type(
        &mut self,
        name: &str,
        target_type: JointTargetType,
        config: &ImportConfig,
    ) -> Result<usize, Error> {
        self.apply_edit(name, JointEdit::TargetType(target_type), config)
    }

    /// Returns the names of the joints ordered by the given column.
    ///
    /// The sort is stable, joints with equal values keep the order in which they were
    /// described. [SortPolicy::Default] ignores the column.
    pub fn sorted(
        &self,
        column: SortColumn,
        policy: SortPolicy,
        config: &ImportConfig,
    ) -> Vec<&str> {
        let mut joints: Vec<&Joint> = self.joints.iter().collect();

        let compare = |a: &&Joint, b: &&Joint| -> Ordering {
            match column {
                SortColumn::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
                SortColumn::Target => target_rank(mimic::effective_target_type(a, config))
                    .cmp(&target_rank(mimic::effective_target_type(b, config))),
                SortColumn::Gain(gain) => {
                    let field = self.mode.field(gain);
                    field_value(a.drive(), field).total_cmp(&field_value(b.drive(), field))
                }
            }
        };

        match policy {
            SortPolicy::Default => {}
            SortPolicy::Ascending => joints.sort_by(compare),
            SortPolicy::Descending => joints.sort_by(|a, b| compare(b, a)),
        }

        joints.into_iter().map(|j| j.name()).collect()
    }

    /// Returns a receiver that gets a [JointChange] for every change to the drive of a joint.
    pub fn subscribe(&mut self) -> Receiver<JointChange> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }
}

/// Returns the value of a gain field of the drive. The target type has no numeric value.
fn field_value(drive: &JointDrive, field: DriveField) -> f64 {
    match field {
        DriveField::TargetType => 0.0,
        DriveField::Strength => drive.strength(),
        DriveField::Damping => drive.damping(),
        DriveField::NaturalFrequency => drive.natural_frequency(),
        DriveField::DampingRatio => drive.damping_ratio(),
    }
}

/// Creates the drive of a joint when it is loaded.
fn initial_drive(description: &JointDescription, config: &ImportConfig) -> JointDrive {
    let mut drive = match description.drive() {
        Some(authored) => authored.clone(),
        None => default_drive(description, config),
    };

    let inertia = equivalent_inertia(drive.drive_type(), description.inertia());
    if inertia <= 0.0 && drive.strength() > 0.0 {
        warn!(
            "Joint {} has a force drive but no inertia, its natural frequency is set to zero",
            description.name()
        );
    }

    update_natural_gains(&mut drive, inertia);
    drive
}

/// Creates the drive of a joint without authored drive information from the defaults of
/// the configuration.
fn default_drive(description: &JointDescription, config: &ImportConfig) -> JointDrive {
    let drive_type = DriveType::Acceleration;
    let inertia = equivalent_inertia(drive_type, description.inertia());
    let natural = NaturalGains {
        natural_frequency: DEFAULT_NATURAL_FREQUENCY,
        damping_ratio: DEFAULT_DAMPING_RATIO,
    }
    .to_drive_gains(inertia);

    let target_type = config.default_drive_type();
    let dynamics_damping = description.dynamics().damping;
    let (strength, damping) = match target_type {
        JointTargetType::Position => {
            let damping = if config.override_joint_dynamics()
                && config.default_position_drive_damping() > 0.0
            {
                natural.damping
            } else {
                dynamics_damping
            };
            (natural.stiffness, damping)
        }
        JointTargetType::Velocity => {
            let strength = config
                .default_drive_strength_override()
                .unwrap_or(natural.stiffness);
            let damping = if config.override_joint_dynamics() {
                0.0
            } else {
                dynamics_damping
            };
            (strength, damping)
        }
        JointTargetType::None => (0.0, 0.0),
    };

    JointDrive::new(target_type, drive_type, strength, damping)
}

fn target_rank(target_type: EffectiveTargetType) -> u8 {
    match target_type {
        EffectiveTargetType::None => 0,
        EffectiveTargetType::Position => 1,
        EffectiveTargetType::Velocity => 2,
        EffectiveTargetType::Mimic => 3,
    }
}

/// Computes the stiffness from the natural frequency. When the stiffness changes the damping
/// of a position drive is computed from the damping ratio, the damping of other drives is
/// kept. Returns the fields that changed.
fn update_drive_gains(drive: &mut JointDrive, equivalent_inertia: f64) -> Vec<DriveField> {
    let gains = NaturalGains {
        natural_frequency: drive.natural_frequency(),
        damping_ratio: drive.damping_ratio(),
    }
    .to_drive_gains(equivalent_inertia);

    if gains.stiffness == drive.strength() {
        return Vec::new();
    }

    drive.set_strength(gains.stiffness);
    let mut changed = vec![DriveField::Strength];
    if drive.target_type() == JointTargetType::Position && gains.damping != drive.damping() {
        drive.set_damping(gains.damping);
        changed.push(DriveField::Damping);
    }

    changed
}

/// Derives the natural frequency and damping ratio from the stiffness and damping.
fn update_natural_gains(drive: &mut JointDrive, equivalent_inertia: f64) {
    let gains = DriveGains {
        stiffness: drive.strength(),
        damping: drive.damping(),
    }
    .to_natural_gains(equivalent_inertia);

    drive.set_natural_frequency(gains.natural_frequency);
    drive.set_damping_ratio(gains.damping_ratio);
}
