use std::path::Path;

use siteconf::{Config, Script};
use siteconf::config::CONFIG_FILE;
use siteconf::error::Result;
use siteconf::options::Environment;

/// The documentation site's own configuration.
pub const SITE_CONFIG: &str = include_str!("../config.toml");

/// Loads the bundled site configuration.
pub fn bundled(environment: Environment) -> Result<Config> {
    Config::load(&Script::parse(SITE_CONFIG)?, environment)
}

/// Loads `config` if given. Otherwise loads `root/config.toml`, falling back
/// to the bundled configuration when `root` has none.
pub fn load(root: &Path, config: Option<&Path>, environment: Environment) -> Result<Config> {
    match config {
        Some(path) => Config::load(&Script::read(path)?, environment),
        None if root.join(CONFIG_FILE).is_file() => Config::discover(root, environment),
        None => bundled(environment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteconf::{ConfigError, Settings};
    use siteconf::deploy::{DeployMethod, DeploymentSpec};
    use siteconf::layout::Layout;
    use siteconf::options::{Extension, MarkdownEngine, MarkdownOptions};
    use siteconf::value::Value;

    fn site() -> Config {
        bundled(Environment::Build).unwrap()
    }

    #[test]
    fn documentation_layouts() {
        let config = site();
        assert_eq!(config.layouts.len(), 1);
        assert_eq!(config.layouts[0].layout, Layout::named("1.x"));
        assert_eq!(config.layout_for("/documentation/1.x/index.html"), &Layout::named("1.x"));
        assert_eq!(config.layout_for("/documentation/1.x/orm/setup.html"), &Layout::named("1.x"));
        assert_eq!(config.layout_for("/documentation/index.html"), &Layout::named("layout"));
    }

    #[test]
    fn directories() {
        let settings = site().settings;
        assert_eq!(&*settings.css_dir, "stylesheets");
        assert_eq!(&*settings.js_dir, "javascripts");
        assert_eq!(&*settings.images_dir, "images");
        assert_eq!(settings.fonts_dir, Settings::default().fonts_dir);
    }

    #[test]
    fn markdown() {
        let expected = MarkdownOptions {
            fenced_code_blocks: true,
            smartypants: true,
            autolink: true,
            with_toc_data: true,
            ..MarkdownOptions::default()
        };

        let (first, second) = (site(), site());
        assert_eq!(first.settings.markdown_engine, MarkdownEngine::Redcarpet);
        assert_eq!(first.settings.markdown, expected);
        assert_eq!(second.settings.markdown, first.settings.markdown);
        assert_eq!(first, second);
    }

    #[test]
    fn deployment() {
        let config = site();
        assert!(config.is_active(Extension::Syntax));
        assert!(config.is_active(Extension::Deploy));
        assert_eq!(config.deploy, Some(DeploymentSpec {
            build_before: true,
            method: DeployMethod::Git,
            branch: "master".into(),
            ..DeploymentSpec::default()
        }));
    }

    #[test]
    fn versions() {
        let settings = site().settings;
        let version = |name: &str| settings.get(name).and_then(|v| v.as_str().map(String::from));

        assert_eq!(version("latest_scala_version").as_deref(), Some("2.12.6"));
        assert_eq!(version("skinny1_version").as_deref(), Some("1.3.20"));
        assert_eq!(version("skinny1_blank_app_version").as_deref(), Some("1.3.20"));
        assert_eq!(version("skinny_micro_version").as_deref(), Some("2.0.0"));
        assert_eq!(version("skinny_version").as_deref(), Some("3.0.0"));
        assert_eq!(version("skinny_blank_app_version").as_deref(), Some("3.0.0"));
        assert_eq!(version("scalikejdbc_version").as_deref(), Some("3.3.0"));
        assert_eq!(settings.get("enforce_available_locales"), Some(Value::from(false)));
    }

    #[test]
    fn environments_agree() {
        let (dev, build) = (bundled(Environment::Development).unwrap(), site());
        assert_eq!(dev.settings, build.settings);
        assert_eq!(dev.layouts, build.layouts);
    }

    #[test]
    fn explicit_config_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "relative_links = 1").unwrap();
        file.flush().unwrap();

        let root = tempfile::TempDir::new().unwrap();
        let err = load(root.path(), Some(file.path()), Environment::Build).unwrap_err();
        assert!(matches!(err.config_error(), Some(ConfigError::TypeMismatch { .. })));

        assert_eq!(load(root.path(), None, Environment::Build).unwrap(), site());
    }

    #[test]
    fn root_config_file_wins_over_bundled() {
        let root = tempfile::TempDir::new().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE), "css_dir = 'css'\n").unwrap();

        let config = load(root.path(), None, Environment::Build).unwrap();
        assert_eq!(&*config.settings.css_dir, "css");
        assert!(config.deploy.is_none());
    }
}
