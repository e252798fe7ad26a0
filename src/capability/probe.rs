//! Loader search path probe for discovering shared libraries.
//!
//! The biggest source of false verdicts in library checking is the dynamic
//! loader finding libraries in directories the current process never looks
//! at (or vice versa). The `LoaderProbe` builds the list of directories a
//! library may be acquired from: the platform loader path variables first,
//! then well-known system library directories.
//!
//! Setting `CAIRN_LIBRARY_PATH` replaces the entire search path. The
//! integration tests rely on this to probe a controlled directory instead
//! of the host system.
//!
//! # Example
//!
//! ```no_run
//! use cairn::capability::probe::LoaderProbe;
//!
//! let probe = LoaderProbe::run();
//! for dir in probe.search_path() {
//!     println!("search dir: {}", dir.display());
//! }
//! ```

use std::path::{Path, PathBuf};

/// Environment variable that, when set, replaces the entire search path.
pub const SEARCH_PATH_OVERRIDE: &str = "CAIRN_LIBRARY_PATH";

/// Platform loader path variables, in precedence order.
fn loader_path_vars() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["DYLD_LIBRARY_PATH", "LD_LIBRARY_PATH"]
    } else if cfg!(target_os = "windows") {
        &["PATH"]
    } else {
        &["LD_LIBRARY_PATH"]
    }
}

/// Well-known system library directories for the current platform.
pub fn well_known_lib_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/opt/homebrew/lib"));
        dirs.push(PathBuf::from("/usr/local/lib"));
        dirs.push(PathBuf::from("/opt/local/lib"));
        dirs.push(PathBuf::from("/usr/lib"));
    } else if cfg!(target_os = "linux") {
        dirs.push(PathBuf::from("/usr/local/lib"));
        if cfg!(target_arch = "x86_64") {
            dirs.push(PathBuf::from("/usr/lib/x86_64-linux-gnu"));
        }
        if cfg!(target_arch = "aarch64") {
            dirs.push(PathBuf::from("/usr/lib/aarch64-linux-gnu"));
        }
        dirs.push(PathBuf::from("/usr/lib"));
        dirs.push(PathBuf::from("/lib"));
    }
    // On Windows the loader resolves DLLs through PATH, already covered.
    dirs
}

/// Build the platform file name for a library stem.
///
/// `gdal` becomes `libgdal.so` on Linux, `libgdal.dylib` on macOS,
/// and `gdal.dll` on Windows.
pub fn platform_library_name(stem: &str) -> String {
    if cfg!(target_os = "macos") {
        format!("lib{}.dylib", stem)
    } else if cfg!(target_os = "windows") {
        format!("{}.dll", stem)
    } else {
        format!("lib{}.so", stem)
    }
}

/// Whether a file name is a loadable instance of the given library stem.
///
/// Accepts the exact platform name plus version-suffixed variants:
/// `libgdal.so.34`, `libgdal.34.dylib`, `gdal304.dll`. Rejects libraries
/// that merely share a prefix (`libgdal-utils.so`).
pub fn matches_library(file_name: &str, stem: &str) -> bool {
    let (prefix, extension) = if cfg!(target_os = "macos") {
        (format!("lib{}", stem), ".dylib")
    } else if cfg!(target_os = "windows") {
        (stem.to_string(), ".dll")
    } else {
        (format!("lib{}", stem), ".so")
    };

    let Some(rest) = file_name.strip_prefix(prefix.as_str()) else {
        return false;
    };
    let starts_ok = rest
        .chars()
        .next()
        .is_some_and(|c| c == '.' || c.is_ascii_digit());
    starts_ok && rest.contains(extension)
}

/// Resolve a library's path by iterating over search directories.
///
/// Returns the first matching file. Directories that are missing or
/// unreadable are skipped; search paths routinely contain stale entries.
pub fn resolve_library_path(stem: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in search_dirs {
        // Exact platform name wins over version-suffixed variants.
        let exact = dir.join(platform_library_name(stem));
        if exact.is_file() {
            return Some(exact);
        }
        match scan_dir(dir, stem) {
            Ok(Some(path)) => return Some(path),
            Ok(None) | Err(_) => {}
        }
    }
    None
}

/// Scan a single directory for a file matching the library stem.
///
/// Unlike [`resolve_library_path`], IO errors are surfaced: the checker
/// treats an unreadable explicit override as a fault, not as absence.
pub fn scan_dir(dir: &Path, stem: &str) -> std::io::Result<Option<PathBuf>> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if matches_library(name, stem) && entry.path().is_file() {
            candidates.push(entry.path());
        }
    }
    // read_dir order is platform-dependent; sort for a stable pick.
    candidates.sort();
    Ok(candidates.into_iter().next())
}

/// The directories a capability library may be acquired from.
#[derive(Debug, Clone)]
pub struct LoaderProbe {
    search_path: Vec<PathBuf>,
}

impl LoaderProbe {
    /// Probe using the actual process environment.
    pub fn run() -> Self {
        Self::run_with_env(|key: &str| std::env::var(key))
    }

    /// Probe with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn run_with_env<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        if let Ok(val) = env_fn(SEARCH_PATH_OVERRIDE) {
            let search_path = std::env::split_paths(&val).collect();
            tracing::debug!(
                "search path overridden via {}: {:?}",
                SEARCH_PATH_OVERRIDE,
                search_path
            );
            return Self { search_path };
        }

        let mut search_path: Vec<PathBuf> = Vec::new();
        for var in loader_path_vars() {
            if let Ok(val) = env_fn(var) {
                for path in std::env::split_paths(&val) {
                    if !search_path.contains(&path) {
                        search_path.push(path);
                    }
                }
            }
        }
        for dir in well_known_lib_dirs() {
            if !search_path.contains(&dir) {
                search_path.push(dir);
            }
        }

        Self { search_path }
    }

    /// The directories to search, in precedence order.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }
}
