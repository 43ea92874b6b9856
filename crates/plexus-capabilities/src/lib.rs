//! Plexus Capabilities - the keyed table of callable handles that mediates
//! all communication between extensions and between the host and extensions.
//!
//! Extensions never receive references to each other; they receive a
//! [`CapabilityRegistry`] handle and invoke other extensions' functionality
//! exclusively through it. Decoupling is enforced by construction, not by
//! access control.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use plexus_capabilities::{CapabilityRegistry, FnCapability};
//! use serde_json::json;
//!
//! let registry = CapabilityRegistry::new();
//! registry.register(
//!     "Clock",
//!     "now",
//!     Arc::new(FnCapability::new(|_args| Ok(json!("12:00")))),
//!     false,
//! );
//!
//! let now = registry.lookup("Clock", "now").expect("registered above");
//! assert_eq!(now.call(json!({})).unwrap(), json!("12:00"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod capability;
mod error;
mod registry;

pub use capability::{Capability, CapabilityHandle, FnCapability};
pub use error::{CapabilityError, CapabilityResult};
pub use registry::{CapabilityKey, CapabilityRegistry};
