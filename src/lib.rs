//! Cairn - GIS runtime environment diagnostics.
//!
//! Cairn checks whether the shared libraries a GIS runtime depends on
//! (GDAL and PROJ) are acquirable in the current execution environment,
//! and reports a plain success or failure verdict.
//!
//! # Modules
//!
//! - [`capability`] - Capability definitions, loader probe, and the checker
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Terminal output and theming
//!
//! # Example
//!
//! ```
//! use cairn::capability::{CapabilityRegistry, EnvironmentChecker, LoaderProbe};
//!
//! let registry = CapabilityRegistry::new();
//! let probe = LoaderProbe::run();
//! let mut checker = EnvironmentChecker::new(&registry, &probe);
//! let report = checker.check_environment();
//! println!("environment ok: {}", report.all_acquired());
//! ```

pub mod capability;
pub mod cli;
pub mod error;
pub mod ui;

pub use error::{CairnError, Result};
