//! Loader and environment configuration.

use std::env;
use std::path::PathBuf;

use numera_numbers::Precision;

/// Environment variable listing directories searched for extension modules.
pub const PLUGIN_PATH_VAR: &str = "NUMERA_PLUGIN_PATH";

/// Environment variable holding the default precision for built-ins.
pub const PRECISION_VAR: &str = "NUMERA_PRECISION";

/// Where [`ExtensionRegistry::open_named`](crate::ExtensionRegistry::open_named)
/// looks for modules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directories searched in order.
    pub search_paths: Vec<PathBuf>,
}

impl LoaderConfig {
    /// Creates a configuration with no search paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads search paths from `NUMERA_PLUGIN_PATH`, in the platform's
    /// path-list syntax.
    #[must_use]
    pub fn from_env() -> Self {
        let search_paths = env::var_os(PLUGIN_PATH_VAR)
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self { search_paths }
    }

    /// Appends a search directory.
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Returns the platform file name of module `name`, e.g. `libfoo.so`.
    #[must_use]
    pub fn file_name(name: &str) -> String {
        format!("{}{name}{}", env::consts::DLL_PREFIX, env::consts::DLL_SUFFIX)
    }

    /// Returns the first existing module file named `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let file = Self::file_name(name);
        self.search_paths
            .iter()
            .map(|dir| dir.join(&file))
            .find(|path| path.exists())
    }
}

/// Settings of an [`Environment`](crate::Environment).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Precision passed to numeric built-ins.
    pub precision: Precision,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            precision: Precision::DEFAULT,
        }
    }
}

impl EnvironmentConfig {
    /// Reads the precision from `NUMERA_PRECISION`, falling back to the
    /// default when it is unset or malformed.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_precision_text(env::var(PRECISION_VAR).ok().as_deref())
    }

    fn from_precision_text(text: Option<&str>) -> Self {
        match text.map(str::trim).map(str::parse::<u32>) {
            Some(Ok(digits)) if digits > 0 => Self {
                precision: Precision::new(digits),
            },
            Some(_) => {
                log::warn!("ignoring malformed {PRECISION_VAR}={:?}", text.unwrap_or_default());
                Self::default()
            }
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_text() {
        assert_eq!(EnvironmentConfig::from_precision_text(None).precision, Precision::DEFAULT);
        assert_eq!(EnvironmentConfig::from_precision_text(Some(" 50 ")).precision.digits(), 50);
        assert_eq!(EnvironmentConfig::from_precision_text(Some("0")).precision, Precision::DEFAULT);
        assert_eq!(EnvironmentConfig::from_precision_text(Some("many")).precision, Precision::DEFAULT);
    }

    #[test]
    fn test_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(LoaderConfig::file_name("present"));
        std::fs::write(&file, b"").unwrap();

        let config = LoaderConfig::new()
            .with_search_path(dir.path().join("missing"))
            .with_search_path(dir.path());
        assert_eq!(config.resolve("present"), Some(file));
        assert_eq!(config.resolve("absent"), None);
    }

    #[test]
    fn test_file_name() {
        let name = LoaderConfig::file_name("sample");
        assert!(name.contains("sample"));
        assert!(name.ends_with(env::consts::DLL_SUFFIX));
    }
}
