use thiserror::Error;

/// Errors produced by capability invocations.
///
/// Note that registry *lookups* never fail with an error; a miss is an
/// `Option::None`. These errors come from calling a capability.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The arguments did not match what the capability expects.
    #[error("Invalid capability arguments: {0}")]
    InvalidArguments(String),

    /// The capability ran but could not complete its work.
    #[error("Capability execution failed: {0}")]
    ExecutionFailed(String),
}

/// A specialized Result type for capability invocations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
