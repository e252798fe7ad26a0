//! Capability registry and definitions.
//!
//! Defines which shared libraries the checker probes for and where an
//! explicit install can be pointed at via a home-override variable.
//! Definition order is acquisition order.

use serde::Serialize;

/// A probed capability definition.
#[derive(Debug, Clone, Serialize)]
pub struct Capability {
    /// Capability name (e.g., "gdal").
    pub name: &'static str,
    /// Library stem used to build the platform file name (e.g., "gdal"
    /// becomes `libgdal.so`, `libgdal.dylib`, or `gdal.dll`).
    pub stem: &'static str,
    /// Environment variable pointing at an install root (handles
    /// relocatable installs, checked before the loader search path).
    pub home_var: Option<&'static str>,
    /// Human-readable install instructions shown in verbose output.
    pub hint: &'static str,
}

/// Capabilities the GIS runtime needs, in acquisition order.
const CAPABILITY_DEFS: &[Capability] = &[
    Capability {
        name: "gdal",
        stem: "gdal",
        home_var: Some("GDAL_HOME"),
        hint: "Install GDAL (e.g. `apt install libgdal-dev` or `brew install gdal`)",
    },
    Capability {
        name: "proj",
        stem: "proj",
        home_var: Some("PROJ_HOME"),
        hint: "Install PROJ (e.g. `apt install libproj-dev` or `brew install proj`)",
    },
];

/// Registry of all known capabilities.
///
/// Iteration preserves definition order so the checker always attempts
/// GDAL before PROJ.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    defs: &'static [Capability],
}

impl CapabilityRegistry {
    /// Create a registry with the built-in capabilities.
    pub fn new() -> Self {
        Self {
            defs: CAPABILITY_DEFS,
        }
    }

    /// Look up a capability by name.
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.defs.iter().find(|c| c.name == name)
    }

    /// Names of all known capabilities, in definition order.
    pub fn known_names(&self) -> Vec<&'static str> {
        self.defs.iter().map(|c| c.name).collect()
    }

    /// Iterate over the capability definitions in order.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.defs.iter()
    }

    /// Number of known capabilities.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
