//! The callable unit behind a registry entry.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CapabilityResult;

/// A named, callable unit of functionality exposed through the registry.
///
/// Arguments and results are JSON values so that the registry can stay
/// opaque about what each capability does; callers and providers agree on
/// the payload shape out of band.
pub trait Capability: Send + Sync {
    /// Invoke the capability.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CapabilityError`] if the arguments are invalid or
    /// the underlying operation fails.
    fn call(&self, args: Value) -> CapabilityResult<Value>;
}

/// Shared handle to a registered capability.
pub type CapabilityHandle = Arc<dyn Capability>;

/// Adapter exposing a closure as a [`Capability`].
pub struct FnCapability<F>
where
    F: Fn(Value) -> CapabilityResult<Value> + Send + Sync,
{
    func: F,
}

impl<F> FnCapability<F>
where
    F: Fn(Value) -> CapabilityResult<Value> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Capability for FnCapability<F>
where
    F: Fn(Value) -> CapabilityResult<Value> + Send + Sync,
{
    fn call(&self, args: Value) -> CapabilityResult<Value> {
        (self.func)(args)
    }
}

impl<F> fmt::Debug for FnCapability<F>
where
    F: Fn(Value) -> CapabilityResult<Value> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCapability").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fn_capability_forwards_arguments() {
        let echo = FnCapability::new(Ok);
        assert_eq!(echo.call(json!({"a": 1})).unwrap(), json!({"a": 1}));
    }
}
