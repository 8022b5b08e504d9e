/// Defines the joint related elements of a robot description.
pub mod joint_elements;

/// Defines the robot description that is produced by parsing a URDF document.
pub mod robot;
