use crate::config::{Activation, Config};
use crate::deploy::DeploymentSpec;
use crate::error::{Chainable, ConfigError, Result};
use crate::layout::{Layout, LayoutRules, PagePattern};
use crate::options::{Environment, Extension};
use crate::proxy::{ProxyPage, ProxyPages};
use crate::script::{Script, Statement};
use crate::settings::Settings;
use crate::value::{interpolate, Dict, Value};

/// Executes a [`Script`] for one [`Environment`], producing a [`Config`].
///
/// Statements run exactly once, in declaration order, so a later
/// assignment to an option replaces an earlier one. `configure` blocks for
/// the loader's environment run after every top-level statement, in
/// declaration order. Blocks for other environments are executed and
/// assembled against a scratch copy of the configuration, then discarded:
/// their errors are still errors.
///
/// String values may reference options set earlier as `{{ name }}`. Write
/// `\{{` for a literal `{{`.
///
/// ```rust
/// use siteconf::{dict, ConfigLoader, Script};
/// use siteconf::options::Environment;
/// use siteconf::layout::Layout;
///
/// let script = Script::new()
///     .set("skinny_version", "3.0.0")
///     .set("skinny_blank_app_version", "{{ skinny_version }}")
///     .page("/documentation/1.x/*", "1.x.erb")
///     .activate_with("deploy", dict! { "build_before" => true, "branch" => "master" })
///     .configure("build", Script::new().set("relative_links", true));
///
/// let config = ConfigLoader::new(Environment::Build).load(&script).unwrap();
/// assert_eq!(config.layout_for("/documentation/1.x/index.html"), &Layout::named("1.x"));
/// assert_eq!(config.settings.get("skinny_blank_app_version").unwrap().as_str(), Some("3.0.0"));
/// assert!(config.settings.relative_links);
/// assert_eq!(&*config.deploy.unwrap().branch, "master");
///
/// let config = ConfigLoader::new(Environment::Development).load(&script).unwrap();
/// assert!(!config.settings.relative_links);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader {
    environment: Environment,
}

#[derive(Debug, Clone, Default)]
struct State {
    settings: Settings,
    layouts: LayoutRules,
    proxies: ProxyPages,
    activations: Vec<Activation>,
}

impl ConfigLoader {
    pub fn new(environment: Environment) -> Self {
        ConfigLoader { environment }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn load(&self, script: &Script) -> Result<Config> {
        let span = tracing::info_span!("load", environment = %self.environment);
        let _entered = span.enter();

        let mut state = State::default();
        let mut blocks = vec![];
        for statement in script {
            match statement {
                Statement::Configure { environment, body } => {
                    blocks.push((Environment::parse(environment)?, body));
                }
                statement => state.execute(statement)?,
            }
        }

        for (environment, body) in blocks {
            let result = match environment == self.environment {
                true => {
                    tracing::debug!(%environment, "applying configure block");
                    state.run(body)
                }
                false => {
                    tracing::debug!(%environment, "checking configure block");
                    state.clone().check(body, environment)
                }
            };

            result.chain_with(|| error! {
                "invalid `configure` block",
                "environment" => environment,
            })?;
        }

        let config = state.finish(self.environment)?;
        tracing::info!(
            layouts = config.layouts.len(),
            proxies = config.proxies.len(),
            extensions = config.extensions.len(),
            deploy = config.deploy.is_some(),
            "configuration loaded"
        );

        Ok(config)
    }
}

impl State {
    fn run(&mut self, script: &Script) -> Result<()> {
        for statement in script {
            self.execute(statement)?;
        }

        Ok(())
    }

    /// Runs `script` and assembles the result, discarding both.
    fn check(mut self, script: &Script, environment: Environment) -> Result<()> {
        self.run(script)?;
        self.finish(environment)?;
        Ok(())
    }

    fn interpolate(&self, option: &str, value: Value) -> Result<Value> {
        let settings = &self.settings;
        interpolate(option, value, |name| settings.get(name))
    }

    fn execute(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Set { option, value } => {
                tracing::debug!(%option, %value, "set");
                let value = self.interpolate(option, value.clone())?;
                self.settings.set(option, value)?;
            }
            Statement::Page { pattern, layout } => {
                tracing::debug!(%pattern, %layout, "page");
                let pattern = PagePattern::new(pattern)?;
                let layout = Layout::from_value("page.layout", layout)?;
                self.layouts.push(pattern, layout);
            }
            Statement::Proxy { path, template, locals, ignore } => {
                tracing::debug!(%path, %template, "proxy");
                let locals = match self.interpolate("proxy.locals", Value::from(locals.clone()))? {
                    Value::Dict(locals) => (*locals).clone(),
                    _ => Dict::new(),
                };

                let page = ProxyPage::new(path, template)?
                    .with_locals(locals)
                    .ignoring_template(*ignore);

                self.proxies.insert(page);
            }
            Statement::Activate { name, options } => {
                tracing::debug!(%name, "activate");
                let extension = Extension::parse(name)?;
                let options = match self.interpolate(name, Value::from(options.clone()))? {
                    Value::Dict(options) => (*options).clone(),
                    _ => Dict::new(),
                };

                match self.activations.iter_mut().find(|a| a.extension == extension) {
                    Some(existing) => existing.options.extend(options),
                    None => self.activations.push(Activation { extension, options }),
                }
            }
            Statement::Configure { .. } => {
                let reason = "`configure` blocks cannot be nested";
                return Err(ConfigError::invalid("configure", "(nested)", reason).into());
            }
        }

        Ok(())
    }

    fn finish(self, environment: Environment) -> Result<Config> {
        let deploy = self.activations.iter()
            .find(|a| a.extension == Extension::Deploy)
            .map(|a| DeploymentSpec::from_options(&a.options))
            .transpose()?;

        Ok(Config {
            environment,
            settings: self.settings,
            layouts: self.layouts,
            proxies: self.proxies,
            extensions: self.activations,
            deploy,
        })
    }
}
