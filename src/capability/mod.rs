//! Capability detection for the GIS runtime.
//!
//! This module provides tools for detecting whether the shared libraries
//! the GIS runtime depends on are acquirable in the current environment.
//!
//! # Modules
//!
//! - [`checker`] - Environment checker that acquires each capability
//! - [`probe`] - Loader search path probe for discovering shared libraries
//! - [`registry`] - Capability definitions
//! - [`status`] - Acquisition status types and the environment report

pub mod checker;
pub mod probe;
pub mod registry;
pub mod status;

pub use checker::EnvironmentChecker;
pub use probe::{platform_library_name, resolve_library_path, LoaderProbe};
pub use registry::{Capability, CapabilityRegistry};
pub use status::{CapabilityOutcome, CapabilityStatus, EnvironmentReport};
