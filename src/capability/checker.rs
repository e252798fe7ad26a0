//! Environment checker for capability acquisition.
//!
//! The `EnvironmentChecker` attempts to acquire each capability in
//! registry order, caching results within a run so a capability checked
//! multiple times probes the filesystem once. Every failure cause
//! (library absent, unreadable override, any other fault) collapses into
//! the report; `check_environment` never returns an error and never
//! panics.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::capability::probe::{resolve_library_path, scan_dir, LoaderProbe};
use crate::capability::registry::{Capability, CapabilityRegistry};
use crate::capability::status::{CapabilityOutcome, CapabilityStatus, EnvironmentReport};
use crate::error::{CairnError, Result};

type EnvFn = Box<dyn Fn(&str) -> std::result::Result<String, std::env::VarError>>;

/// Checks whether the GIS runtime capabilities are acquirable.
pub struct EnvironmentChecker<'a> {
    registry: &'a CapabilityRegistry,
    probe: &'a LoaderProbe,
    cache: HashMap<String, CapabilityStatus>,
    env_fn: EnvFn,
}

impl<'a> EnvironmentChecker<'a> {
    /// Create a checker that reads the actual process environment.
    pub fn new(registry: &'a CapabilityRegistry, probe: &'a LoaderProbe) -> Self {
        Self::with_env(registry, probe, |key: &str| std::env::var(key))
    }

    /// Create a checker with a custom env var lookup function.
    ///
    /// This allows testing home-override handling without modifying
    /// actual environment variables.
    pub fn with_env<F>(registry: &'a CapabilityRegistry, probe: &'a LoaderProbe, env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError> + 'static,
    {
        Self {
            registry,
            probe,
            cache: HashMap::new(),
            env_fn: Box::new(env_fn),
        }
    }

    /// Acquire every known capability, in registry order.
    ///
    /// This is the whole job: attempt each acquisition, record how it
    /// went, and hand back the report. All faults are collapsed into
    /// the outcomes.
    pub fn check_environment(&mut self) -> EnvironmentReport {
        let mut outcomes = Vec::with_capacity(self.registry.len());
        for name in self.registry.known_names() {
            let status = self.check_one(name);
            outcomes.push(CapabilityOutcome {
                capability: name.to_string(),
                status,
            });
        }
        EnvironmentReport { outcomes }
    }

    /// Check a single capability, using cache when available.
    pub fn check_one(&mut self, capability: &str) -> CapabilityStatus {
        if let Some(cached) = self.cache.get(capability) {
            return cached.clone();
        }

        let status = self.evaluate(capability);
        self.cache.insert(capability.to_string(), status.clone());
        status
    }

    /// Invalidate a cached result for a specific capability.
    pub fn invalidate(&mut self, capability: &str) {
        self.cache.remove(capability);
    }

    /// Invalidate all cached results.
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }

    fn evaluate(&self, capability: &str) -> CapabilityStatus {
        let Some(def) = self.registry.get(capability) else {
            return CapabilityStatus::Missing { hint: None };
        };

        match self.acquire(def) {
            Ok(Some(path)) => {
                tracing::debug!("capability '{}' acquired at {}", def.name, path.display());
                CapabilityStatus::Acquired { path }
            }
            Ok(None) => {
                tracing::debug!("capability '{}' not found on search path", def.name);
                CapabilityStatus::Missing {
                    hint: Some(def.hint.to_string()),
                }
            }
            Err(e) => {
                tracing::debug!("capability '{}' acquisition faulted: {}", def.name, e);
                CapabilityStatus::Faulted {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Attempt to locate the capability's library.
    ///
    /// Order: home-override directory (env var, checked in `lib/` then the
    /// root itself), then the probe search path. A home override that
    /// cannot be read is a fault; a search path entry that cannot be read
    /// is routine and skipped.
    fn acquire(&self, def: &Capability) -> Result<Option<PathBuf>> {
        if let Some(var) = def.home_var {
            if let Ok(val) = (self.env_fn)(var) {
                let root = PathBuf::from(val);
                for dir in [root.join("lib"), root] {
                    match scan_dir(&dir, def.stem) {
                        Ok(Some(path)) => return Ok(Some(path)),
                        Ok(None) => {}
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                        Err(e) => {
                            return Err(CairnError::ProbeFailed {
                                capability: def.name.to_string(),
                                message: format!("cannot read {}: {}", dir.display(), e),
                            })
                        }
                    }
                }
            }
        }

        Ok(resolve_library_path(def.stem, self.probe.search_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::probe::platform_library_name;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_library(dir: &Path, stem: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(platform_library_name(stem)), b"\x7fELF").unwrap();
    }

    fn probe_for(dir: &Path) -> LoaderProbe {
        let dir_str = dir.to_string_lossy().to_string();
        LoaderProbe::run_with_env(move |var| {
            if var == crate::capability::probe::SEARCH_PATH_OVERRIDE {
                Ok(dir_str.clone())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        })
    }

    fn no_env(_: &str) -> std::result::Result<String, std::env::VarError> {
        Err(std::env::VarError::NotPresent)
    }

    #[test]
    fn both_present_yields_all_acquired() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        create_library(temp.path(), "gdal");
        create_library(temp.path(), "proj");
        let probe = probe_for(temp.path());
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, no_env);

        let report = checker.check_environment();
        assert!(report.all_acquired());
        assert_eq!(report.outcomes.len(), 2);
    }

    #[test]
    fn neither_present_yields_two_gaps() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        let probe = probe_for(temp.path());
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, no_env);

        let report = checker.check_environment();
        assert!(!report.all_acquired());
        assert_eq!(report.gaps().len(), 2);
    }

    #[test]
    fn one_missing_is_treated_like_all_missing() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        create_library(temp.path(), "gdal");
        let probe = probe_for(temp.path());
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, no_env);

        let report = checker.check_environment();
        assert!(!report.all_acquired());
        assert_eq!(report.gaps().len(), 1);
        assert_eq!(report.gaps()[0].capability, "proj");
    }

    #[test]
    fn outcomes_preserve_registry_order() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        let probe = probe_for(temp.path());
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, no_env);

        let report = checker.check_environment();
        let names: Vec<_> = report.outcomes.iter().map(|o| o.capability.as_str()).collect();
        assert_eq!(names, vec!["gdal", "proj"]);
    }

    #[test]
    fn home_override_wins_over_search_path() {
        let registry = CapabilityRegistry::new();
        let search = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        create_library(search.path(), "gdal");
        create_library(&home.path().join("lib"), "gdal");
        let probe = probe_for(search.path());

        let home_str = home.path().to_string_lossy().to_string();
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, move |var| {
            if var == "GDAL_HOME" {
                Ok(home_str.clone())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        });

        match checker.check_one("gdal") {
            CapabilityStatus::Acquired { path } => {
                assert!(path.starts_with(home.path()));
            }
            other => panic!("expected Acquired, got {:?}", other),
        }
    }

    #[test]
    fn home_override_pointing_at_file_faults() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("gdal-home");
        fs::write(&file, "not a directory").unwrap();
        let probe = probe_for(temp.path());

        let file_str = file.to_string_lossy().to_string();
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, move |var| {
            if var == "GDAL_HOME" {
                Ok(file_str.clone())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        });

        let status = checker.check_one("gdal");
        assert!(status.is_faulted());

        // A fault in one acquisition never escapes check_environment.
        checker.invalidate_all();
        let report = checker.check_environment();
        assert!(!report.all_acquired());
    }

    #[test]
    fn home_override_to_missing_dir_falls_back_to_search_path() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        create_library(temp.path(), "gdal");
        let probe = probe_for(temp.path());

        let mut checker = EnvironmentChecker::with_env(&registry, &probe, |var| {
            if var == "GDAL_HOME" {
                Ok("/nonexistent/gdal/root".to_string())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        });

        assert!(checker.check_one("gdal").is_acquired());
    }

    #[test]
    fn unknown_capability_is_missing_without_hint() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        let probe = probe_for(temp.path());
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, no_env);

        match checker.check_one("arcpy") {
            CapabilityStatus::Missing { hint } => assert!(hint.is_none()),
            other => panic!("expected Missing, got {:?}", other),
        }
    }

    #[test]
    fn checker_caches_results() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        let probe = probe_for(temp.path());
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, no_env);

        let first = checker.check_one("gdal");
        assert!(!first.is_acquired());
        assert!(checker.cache.contains_key("gdal"));

        // The library appearing mid-run is not seen until invalidation.
        create_library(temp.path(), "gdal");
        assert!(!checker.check_one("gdal").is_acquired());

        checker.invalidate("gdal");
        assert!(checker.check_one("gdal").is_acquired());
    }

    #[test]
    fn invalidate_all_clears_every_entry() {
        let registry = CapabilityRegistry::new();
        let temp = TempDir::new().unwrap();
        let probe = probe_for(temp.path());
        let mut checker = EnvironmentChecker::with_env(&registry, &probe, no_env);

        checker.check_one("gdal");
        checker.check_one("proj");
        assert_eq!(checker.cache.len(), 2);

        checker.invalidate_all();
        assert!(checker.cache.is_empty());
    }
}
