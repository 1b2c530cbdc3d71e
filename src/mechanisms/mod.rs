//! Game-piece mechanisms other than the drivetrain.

/// Portcullis lifter boundary and its move task.
pub mod portcullis;
