//! Error types for the frame analysis engine.

use thiserror::Error;

/// Main error type for force-method analysis.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Joint {0} not found in model")]
    JointNotFound(u32),

    #[error("Bar {0} not found in model")]
    BarNotFound(u32),

    #[error("Material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("Section '{0}' not found in model")]
    SectionNotFound(String),

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    #[error("Invalid load: {0}")]
    InvalidLoad(String),

    #[error("Invalid analysis options: {0}")]
    InvalidOptions(String),

    #[error("Hypostatic structure: {deficit} restraint(s) missing (gh = {gh})")]
    Hypostatic { gh: i32, deficit: i32 },

    #[error("Geometrically unstable structure: {0}")]
    Unstable(String),

    #[error("Redundant selection failed: {0}")]
    RedundantSelection(String),

    #[error("Flexibility matrix is ill-conditioned (cond = {cond:.3e})")]
    IllConditioned { cond: f64 },

    #[error("Virtual-work integration did not converge on bar {bar}")]
    IntegrationFailure { bar: u32 },

    #[error("Flexibility matrix violates Maxwell-Betti symmetry (relative deviation {deviation:.3e})")]
    AsymmetricFlexibility { deviation: f64 },

    #[error(
        "Equilibrium verification failed (residuals Fx = {fx:.3e}, Fy = {fy:.3e}, Mz = {mz:.3e})"
    )]
    EquilibriumViolation { fx: f64, fy: f64, mz: f64 },

    #[error("Singular system while solving {context}")]
    Singular { context: String },

    #[error("Internal consistency fault: {0}")]
    InternalFault(String),

    #[error("Analysis canceled")]
    Canceled,
}

/// Result type for analysis operations.
pub type FrameResult<T> = Result<T, FrameError>;
