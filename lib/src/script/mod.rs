//! Ordered configuration statements.
//!
//! A [`Script`] records statements exactly as they were declared and checks
//! nothing; [`ConfigLoader`](crate::ConfigLoader) validates each one as it
//! executes it.

mod parse;

use std::sync::Arc;

use crate::value::{Dict, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Assign `value` to `option`.
    Set {
        option: Arc<str>,
        value: Value,
    },
    /// Wrap pages matching `pattern` in `layout`, a layout name or `false`.
    Page {
        pattern: Arc<str>,
        layout: Value,
    },
    /// Render `template` at `path` with `locals`.
    Proxy {
        path: Arc<str>,
        template: Arc<str>,
        locals: Dict,
        ignore: bool,
    },
    /// Activate the extension `name` with `options`.
    Activate {
        name: Arc<str>,
        options: Dict,
    },
    /// Run `body` only when loading for `environment`.
    Configure {
        environment: Arc<str>,
        body: Script,
    },
}

/// A sequence of [`Statement`]s in declaration order.
///
/// ```rust
/// use siteconf::{dict, Script};
///
/// let script = Script::new()
///     .set("css_dir", "stylesheets")
///     .page("/documentation/1.x/*", "1.x.erb")
///     .activate("syntax")
///     .activate_with("deploy", dict! { "method" => "git", "branch" => "master" })
///     .configure("build", Script::new().activate("minify_css"));
///
/// assert_eq!(script.len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, derive_more::Deref)]
pub struct Script(Vec<Statement>);

impl Script {
    pub fn new() -> Self {
        Script::default()
    }

    pub fn push(mut self, statement: Statement) -> Self {
        self.0.push(statement);
        self
    }

    pub fn set<V: Into<Value>>(self, option: &str, value: V) -> Self {
        self.push(Statement::Set { option: option.into(), value: value.into() })
    }

    pub fn page<L: Into<Value>>(self, pattern: &str, layout: L) -> Self {
        self.push(Statement::Page { pattern: pattern.into(), layout: layout.into() })
    }

    /// Wraps every page matching any of `patterns` in `layout`.
    pub fn with_layout<L, I, P>(mut self, layout: L, patterns: I) -> Self
        where L: Into<Value>, I: IntoIterator<Item = P>, P: AsRef<str>
    {
        let layout = layout.into();
        for pattern in patterns {
            self = self.page(pattern.as_ref(), layout.clone());
        }

        self
    }

    pub fn proxy(self, path: &str, template: &str, locals: Dict) -> Self {
        self.push(Statement::Proxy {
            path: path.into(),
            template: template.into(),
            locals,
            ignore: false,
        })
    }

    pub fn activate(self, name: &str) -> Self {
        self.activate_with(name, Dict::new())
    }

    pub fn activate_with(self, name: &str, options: Dict) -> Self {
        self.push(Statement::Activate { name: name.into(), options })
    }

    pub fn configure(self, environment: &str, body: Script) -> Self {
        self.push(Statement::Configure { environment: environment.into(), body })
    }
}

impl FromIterator<Statement> for Script {
    fn from_iter<T: IntoIterator<Item = Statement>>(iter: T) -> Self {
        Script(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
