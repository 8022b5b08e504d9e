//! Defines the options that control how a robot description is imported.
//!
//! The [ImportConfig] is a flat record of options. Most options are only consumed by the
//! stage authoring step, the drive related options are also used when the joints of a robot
//! are loaded into a [JointCollection](crate::collection::JointCollection).
//!
//! The [SharedImportConfig] provides a handle to a single configuration that can be read
//! and written from multiple places, each access locks the configuration for the duration
//! of a single field read or write.

use std::sync::{Arc, Mutex, MutexGuard};

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{model_elements::joint_elements::JointTargetType, Error};

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

/// The value of a default drive gain that indicates that the gain should not be overridden.
pub const DO_NOT_OVERRIDE: f64 = -1.0;

/// Defines the subdivision scheme used for the normals of imported meshes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NormalSubdivisionScheme {
    /// Catmull-Clark subdivision.
    CatmullClark,
    /// Loop subdivision.
    Loop,
    /// Bilinear subdivision.
    #[default]
    Bilinear,
    /// No subdivision.
    None,
}

/// Defines the options that control the import of a robot description.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImportConfig {
    /// Consolidate links that are connected by fixed joints into one rigid body.
    merge_fixed_joints: bool,

    /// Substitute capsule collision primitives for cylinders.
    replace_cylinders_with_capsules: bool,

    /// Use convex decomposition instead of a convex hull for non-convex collision meshes.
    convex_decomp: bool,

    /// Import the inertia tensors of the links.
    import_inertia_tensor: bool,

    /// Weld the root link to the world frame.
    fix_base: bool,

    /// Enable collisions between the links of the robot.
    self_collision: bool,

    /// The mass density used for links without an explicit mass. Zero means the mass is
    /// computed.
    density: f64,

    /// The target type applied to joints without authored drive information.
    default_drive_type: JointTargetType,

    /// The default drive stiffness. [DO_NOT_OVERRIDE] means the stiffness is not overridden.
    default_drive_strength: f64,

    /// The default position drive damping. [DO_NOT_OVERRIDE] means the damping is not
    /// overridden.
    default_position_drive_damping: f64,

    /// The unit scale factor applied to all authored lengths.
    distance_scale: f64,

    /// The up vector of the stage.
    up_vector: Vector3<f64>,

    /// Create a physics scene in the stage.
    create_physics_scene: bool,

    /// Make the robot the default prim of the stage.
    make_default_prim: bool,

    /// The subdivision scheme for the normals of imported meshes.
    subdivision_scheme: NormalSubdivisionScheme,

    /// Derive collision geometry from the visual geometry when collision geometry is missing.
    collision_from_visuals: bool,

    /// Materialize mimic relationships as a mimic schema with a disabled drive.
    parse_mimic: bool,

    /// Replace the authored joint dynamics with the computed drive gains.
    override_joint_dynamics: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            merge_fixed_joints: true,
            replace_cylinders_with_capsules: false,
            convex_decomp: false,
            import_inertia_tensor: true,
            fix_base: true,
            self_collision: false,
            density: 0.0,
            default_drive_type: JointTargetType::Position,
            default_drive_strength: 1e3,
            default_position_drive_damping: 1e2,
            distance_scale: 1.0,
            up_vector: Vector3::z(),
            create_physics_scene: false,
            make_default_prim: false,
            subdivision_scheme: NormalSubdivisionScheme::Bilinear,
            collision_from_visuals: false,
            parse_mimic: true,
            override_joint_dynamics: false,
        }
    }
}

impl ImportConfig {
    /// Returns a value indicating whether collision geometry is derived from visual geometry.
    pub fn collision_from_visuals(&self) -> bool {
        self.collision_from_visuals
    }

    /// Returns a value indicating whether convex decomposition is used for collision meshes.
    pub fn convex_decomp(&self) -> bool {
        self.convex_decomp
    }

    /// Returns a value indicating whether a physics scene is created.
    pub fn create_physics_scene(&self) -> bool {
        self.create_physics_scene
    }

    /// Returns the default drive stiffness.
    pub fn default_drive_strength(&self) -> f64 {
        self.default_drive_strength
    }

    /// Returns the default drive stiffness, or `None` when the stiffness should not be overridden.
    pub fn default_drive_strength_override(&self) -> Option<f64> {
        to_override(self.default_drive_strength)
    }

    /// Returns the target type applied to joints without authored drive information.
    pub fn default_drive_type(&self) -> JointTargetType {
        self.default_drive_type
    }

    /// Returns the default position drive damping.
    pub fn default_position_drive_damping(&self) -> f64 {
        self.default_position_drive_damping
    }

    /// Returns the default position drive damping, or `None` when the damping should not be
    /// overridden.
    pub fn default_position_drive_damping_override(&self) -> Option<f64> {
        to_override(self.default_position_drive_damping)
    }

    /// Returns the mass density used for links without an explicit mass.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Returns the unit scale factor applied to all authored lengths.
    pub fn distance_scale(&self) -> f64 {
        self.distance_scale
    }

    /// Returns a value indicating whether the root link is welded to the world.
    pub fn fix_base(&self) -> bool {
        self.fix_base
    }

    /// Returns a value indicating whether link inertia tensors are imported.
    pub fn import_inertia_tensor(&self) -> bool {
        self.import_inertia_tensor
    }

    /// Creates the configuration used by the older importer deployment, which keeps fixed
    /// joints, ignores inertia tensors and uses much stiffer default drives.
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::config::ImportConfig;
    ///
    /// let config = ImportConfig::legacy();
    /// assert!(!config.merge_fixed_joints());
    /// assert_eq!(1e7, config.default_drive_strength());
    /// ```
    pub fn legacy() -> Self {
        Self {
            merge_fixed_joints: false,
            import_inertia_tensor: false,
            default_drive_strength: 1e7,
            default_position_drive_damping: 1e5,
            ..Default::default()
        }
    }

    /// Returns a value indicating whether the robot becomes the default prim.
    pub fn make_default_prim(&self) -> bool {
        self.make_default_prim
    }

    /// Returns a value indicating whether links connected by fixed joints are merged.
    pub fn merge_fixed_joints(&self) -> bool {
        self.merge_fixed_joints
    }

    /// Returns a value indicating whether the authored joint dynamics are replaced by the
    /// computed drive gains.
    pub fn override_joint_dynamics(&self) -> bool {
        self.override_joint_dynamics
    }

    /// Returns a value indicating whether mimic relationships are materialized.
    pub fn parse_mimic(&self) -> bool {
        self.parse_mimic
    }

    /// Returns a value indicating whether cylinders are replaced by capsules.
    pub fn replace_cylinders_with_capsules(&self) -> bool {
        self.replace_cylinders_with_capsules
    }

    /// Returns a value indicating whether the links of the robot collide with each other.
    pub fn self_collision(&self) -> bool {
        self.self_collision
    }

    /// Sets whether collision geometry is derived from visual geometry.
    pub fn set_collision_from_visuals(&mut self, value: bool) {
        self.collision_from_visuals = value;
    }

    /// Sets whether convex decomposition is used for collision meshes.
    pub fn set_convex_decomp(&mut self, value: bool) {
        self.convex_decomp = value;
    }

    /// Sets whether a physics scene is created.
    pub fn set_create_physics_scene(&mut self, value: bool) {
        self.create_physics_scene = value;
    }

    /// Sets the default drive stiffness.
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidConfigurationValue] - Returned when the value is negative and not
    ///   equal to [DO_NOT_OVERRIDE].
    pub fn set_default_drive_strength(&mut self, value: f64) -> Result<(), Error> {
        self.default_drive_strength = check_gain("default_drive_strength", value)?;
        Ok(())
    }

    /// Sets the target type applied to joints without authored drive information.
    pub fn set_default_drive_type(&mut self, value: JointTargetType) {
        self.default_drive_type = value;
    }

    /// Sets the default position drive damping.
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidConfigurationValue] - Returned when the value is negative and not
    ///   equal to [DO_NOT_OVERRIDE].
    pub fn set_default_position_drive_damping(&mut self, value: f64) -> Result<(), Error> {
        self.default_position_drive_damping = check_gain("default_position_drive_damping", value)?;
        Ok(())
    }

    /// Sets the mass density used for links without an explicit mass.
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidConfigurationValue] - Returned when the value is negative or not finite.
    pub fn set_density(&mut self, value: f64) -> Result<(), Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidConfigurationValue {
                option: "density",
                value,
            });
        }

        self.density = value;
        Ok(())
    }

    /// Sets the unit scale factor applied to all authored lengths.
    ///
    /// ## Errors
    ///
    /// * [Error::InvalidConfigurationValue] - Returned when the value is not positive or not finite.
    pub fn set_distance_scale(&mut self, value: f64) -> Result<(), Error> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidConfigurationValue {
                option: "distance_scale",
                value,
            });
        }

        self.distance_scale = value;
        Ok(())
    }

    /// Sets whether the root link is welded to the world.
    pub fn set_fix_base(&mut self, value: bool) {
        self.fix_base = value;
    }

    /// Sets whether link inertia tensors are imported.
    pub fn set_import_inertia_tensor(&mut self, value: bool) {
        self.import_inertia_tensor = value;
    }

    /// Sets whether the robot becomes the default prim.
    pub fn set_make_default_prim(&mut self, value: bool) {
        self.make_default_prim = value;
    }

    /// Sets whether links connected by fixed joints are merged.
    pub fn set_merge_fixed_joints(&mut self, value: bool) {
        self.merge_fixed_joints = value;
    }

    /// Sets whether the authored joint dynamics are replaced by the computed drive gains.
    pub fn set_override_joint_dynamics(&mut self, value: bool) {
        self.override_joint_dynamics = value;
    }

    /// Sets whether mimic relationships are materialized.
    pub fn set_parse_mimic(&mut self, value: bool) {
        self.parse_mimic = value;
    }

    /// Sets whether cylinders are replaced by capsules.
    pub fn set_replace_cylinders_with_capsules(&mut self, value: bool) {
        self.replace_cylinders_with_capsules = value;
    }

    /// Sets whether the links of the robot collide with each other.
    pub fn set_self_collision(&mut self, value: bool) {
        self.self_collision = value;
    }

    /// Sets the subdivision scheme for the normals of imported meshes.
    pub fn set_subdivision_scheme(&mut self, value: NormalSubdivisionScheme) {
        self.subdivision_scheme = value;
    }

    /// Sets the up vector of the stage.
    pub fn set_up_vector(&mut self, x: f64, y: f64, z: f64) {
        self.up_vector = Vector3::new(x, y, z);
    }

    /// Returns the subdivision scheme for the normals of imported meshes.
    pub fn subdivision_scheme(&self) -> NormalSubdivisionScheme {
        self.subdivision_scheme
    }

    /// Returns the up vector of the stage.
    pub fn up_vector(&self) -> &Vector3<f64> {
        &self.up_vector
    }
}

/// Accepts non-negative gains and the [DO_NOT_OVERRIDE] sentinel.
fn check_gain(option: &'static str, value: f64) -> Result<f64, Error> {
    if value == DO_NOT_OVERRIDE || (value.is_finite() && value >= 0.0) {
        Ok(value)
    } else {
        Err(Error::InvalidConfigurationValue { option, value })
    }
}

fn to_override(value: f64) -> Option<f64> {
    if value == DO_NOT_OVERRIDE {
        None
    } else {
        Some(value)
    }
}

/// A handle to an [ImportConfig] that is shared between the different parts of an import
/// session.
///
/// Cloning the handle shares the underlying configuration. Every getter and setter locks the
/// configuration for a single field access so that concurrent writes never tear a value.
#[derive(Clone, Debug, Default)]
pub struct SharedImportConfig {
    inner: Arc<Mutex<ImportConfig>>,
}

impl SharedImportConfig {
    /// Returns the unit scale factor applied to all authored lengths.
    pub fn distance_scale(&self) -> f64 {
        self.lock().distance_scale()
    }

    fn lock(&self) -> MutexGuard<'_, ImportConfig> {
        // A panic in another thread cannot leave a single field half written.
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Creates a new [SharedImportConfig] that owns the given configuration.
    pub fn new(config: ImportConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(config)),
        }
    }

    /// Returns a value indicating whether the authored joint dynamics are replaced.
    pub fn override_joint_dynamics(&self) -> bool {
        self.lock().override_joint_dynamics()
    }

    /// Returns a value indicating whether mimic relationships are materialized.
    pub fn parse_mimic(&self) -> bool {
        self.lock().parse_mimic()
    }

    /// Sets whether mimic relationships are materialized.
    pub fn set_parse_mimic(&self, value: bool) {
        self.lock().set_parse_mimic(value);
    }

    /// Returns a copy of the current configuration.
    pub fn snapshot(&self) -> ImportConfig {
        self.lock().clone()
    }

    /// Applies a change to the configuration while holding the lock.
    ///
    /// ## Parameters
    ///
    /// * 'change' - The function that changes the configuration. Its result is returned.
    ///
    /// ## Example
    ///
    /// ```
    /// use urdf_joint_drives::config::{ImportConfig, SharedImportConfig};
    ///
    /// let shared = SharedImportConfig::new(ImportConfig::default());
    /// let other = shared.clone();
    ///
    /// shared.update(|c| c.set_density(1000.0)).unwrap();
    /// assert_eq!(1000.0, other.snapshot().density());
    /// ```
    pub fn update<T>(&self, change: impl FnOnce(&mut ImportConfig) -> T) -> T {
        let mut guard = self.lock();
        change(&mut guard)
    }
}
