use std::sync::Arc;

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::options::parse_enum;
use crate::util::string_enum;
use crate::value::{Dict, Value};

string_enum! {
    /// How a built site is published.
    pub enum DeployMethod {
        Git => "git",
        Ftp => "ftp",
        Sftp => "sftp",
        Rsync => "rsync",
    }
}

string_enum! {
    /// How the `git` method updates the deploy branch.
    pub enum GitStrategy {
        /// Commit the build on top of a fresh branch and force-push it.
        ForcePush => "force_push",
        /// Commit the build into the branch's existing history.
        Submodule => "submodule",
    }
}

/// Parameters for the external deployer, built from the options of the
/// `deploy` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentSpec {
    pub build_before: bool,
    pub method: DeployMethod,
    pub remote: Arc<str>,
    pub branch: Arc<str>,
    pub strategy: GitStrategy,
    pub commit_message: Option<Arc<str>>,
    pub host: Option<Arc<str>>,
    pub port: Option<u16>,
    pub user: Option<Arc<str>>,
    #[serde(skip_serializing)]
    pub password: Option<Arc<str>>,
    pub path: Option<Arc<str>>,
    pub clean: bool,
    pub flags: Option<Arc<str>>,
}

impl Default for DeploymentSpec {
    fn default() -> Self {
        DeploymentSpec {
            build_before: false,
            method: DeployMethod::Git,
            remote: "origin".into(),
            branch: "gh-pages".into(),
            strategy: GitStrategy::ForcePush,
            commit_message: None,
            host: None,
            port: None,
            user: None,
            password: None,
            path: None,
            clean: false,
            flags: None,
        }
    }
}

impl DeploymentSpec {
    /// Builds a spec from `deploy` extension options, checking every option's
    /// type. Methods other than `git` need a `host` and a `path`.
    ///
    /// ```rust
    /// use siteconf::dict;
    /// use siteconf::deploy::{DeploymentSpec, DeployMethod};
    ///
    /// let options = dict! { "build_before" => true, "method" => "git", "branch" => "master" };
    /// let spec = DeploymentSpec::from_options(&options).unwrap();
    /// assert!(spec.build_before);
    /// assert_eq!(spec.method, DeployMethod::Git);
    /// assert_eq!(&*spec.branch, "master");
    /// assert_eq!(&*spec.remote, "origin");
    ///
    /// let options = dict! { "method" => "rsync", "host" => "example.com" };
    /// assert!(DeploymentSpec::from_options(&options).is_err());
    /// ```
    pub fn from_options(options: &Dict) -> Result<Self> {
        let mut spec = DeploymentSpec::default();
        for (key, value) in options {
            let option = format!("deploy.{key}");
            let option = option.as_str();
            let string = || -> Result<Arc<str>> {
                match value {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(ConfigError::mismatch(option, "string", value).into()),
                }
            };

            let flag = || -> Result<bool> {
                value.to_bool().ok_or_else(|| ConfigError::mismatch(option, "boolean", value).into())
            };

            match &**key {
                "build_before" => spec.build_before = flag()?,
                "clean" => spec.clean = flag()?,
                "method" => spec.method = parse_enum(option, value, "unknown deploy method")?,
                "strategy" => spec.strategy = parse_enum(option, value, "unknown git strategy")?,
                "remote" => spec.remote = string()?,
                "branch" => spec.branch = string()?,
                "commit_message" => spec.commit_message = Some(string()?),
                "host" => spec.host = Some(string()?),
                "user" => spec.user = Some(string()?),
                "password" => spec.password = Some(string()?),
                "path" => spec.path = Some(string()?),
                "flags" => spec.flags = Some(string()?),
                "port" => spec.port = Some(match value {
                    Value::Num(_) => u16::try_from(value.clone())
                        .map_err(|v| ConfigError::invalid(option, v, "port must be between 0 and 65535"))?,
                    _ => return Err(ConfigError::mismatch(option, "number", value).into()),
                }),
                _ => return Err(ConfigError::UnknownOption { option: option.into(), within: "deploy" }.into()),
            }
        }

        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<()> {
        if self.method == DeployMethod::Git {
            if self.branch.trim().is_empty() {
                return Err(ConfigError::invalid("deploy.branch", &self.branch, "branch name is empty").into());
            }

            return Ok(());
        }

        if self.host.is_none() {
            return Err(ConfigError::invalid("deploy.host", "(unset)", "required by this deploy method").into());
        }

        if self.path.is_none() {
            return Err(ConfigError::invalid("deploy.path", "(unset)", "required by this deploy method").into());
        }

        Ok(())
    }
}
