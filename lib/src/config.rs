use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::deploy::DeploymentSpec;
use crate::layout::{Layout, LayoutRules};
use crate::options::{Environment, Extension};
use crate::proxy::ProxyPages;
use crate::script::Script;
use crate::settings::Settings;
use crate::value::Dict;
use crate::ConfigLoader;

/// The name of the configuration file [`Config::discover()`] looks for.
pub const CONFIG_FILE: &str = "config.toml";

/// An activated extension and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activation {
    pub extension: Extension,
    pub options: Dict,
}

/// A fully loaded site configuration. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub environment: Environment,
    pub settings: Settings,
    pub layouts: LayoutRules,
    pub proxies: ProxyPages,
    pub extensions: Vec<Activation>,
    pub deploy: Option<DeploymentSpec>,
}

impl Config {
    /// Loads `script` for `environment`.
    pub fn load(script: &Script, environment: Environment) -> Result<Config> {
        ConfigLoader::new(environment).load(script)
    }

    /// Parses and loads the TOML document `toml` for `environment`.
    pub fn from_toml(toml: &str, environment: Environment) -> Result<Config> {
        Config::load(&Script::parse(toml)?, environment)
    }

    /// Loads `root/config.toml`, or the defaults if there is no such file.
    pub fn discover<P: AsRef<Path>>(root: P, environment: Environment) -> Result<Config> {
        let path = root.as_ref().join(CONFIG_FILE);
        let script = match path.is_file() {
            true => Script::read(&path)?,
            false => {
                tracing::debug!(path = %path.display(), "no configuration file; using defaults");
                Script::new()
            }
        };

        Config::load(&script, environment)
    }

    /// The layout pages at `path` are wrapped in.
    pub fn layout_for(&self, path: &str) -> &Layout {
        self.layouts.resolve(path, &self.settings.layout)
    }

    pub fn activation(&self, extension: Extension) -> Option<&Activation> {
        self.extensions.iter().find(|a| a.extension == extension)
    }

    pub fn is_active(&self, extension: Extension) -> bool {
        self.activation(extension).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Config: Send, Sync, Clone);

    #[test]
    fn discover_without_file_uses_defaults() {
        let root = tempfile::TempDir::new().unwrap();

        let config = Config::discover(root.path(), Environment::Build).unwrap();
        assert_eq!(config.settings, Settings::default());
        assert!(config.layouts.is_empty() && config.extensions.is_empty());
        assert!(config.deploy.is_none());
    }

    #[test]
    fn discover_reads_config_file() {
        let root = tempfile::TempDir::new().unwrap();
        let toml = "css_dir = 'css'\n[activate]\nsyntax = true\n";
        std::fs::write(root.path().join(CONFIG_FILE), toml).unwrap();

        let config = Config::discover(root.path(), Environment::Development).unwrap();
        assert_eq!(&*config.settings.css_dir, "css");
        assert!(config.is_active(Extension::Syntax));
        assert!(!config.is_active(Extension::Deploy));
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let root = tempfile::TempDir::new().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE), "css_dir = [").unwrap();

        let err = Config::discover(root.path(), Environment::Development).unwrap_err();
        assert!(err.to_string().contains("failed to parse configuration"));
    }
}
