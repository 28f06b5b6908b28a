mod pattern;
mod validate;

pub use pattern::*;
pub use validate::{is_path_char, is_pattern_char};

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{ConfigError, Result};
use crate::util::strip_template_ext;
use crate::value::Value;

/// The layout a page is wrapped in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Render the page without a layout.
    None,
    /// Wrap the page in the named layout template.
    Named(Arc<str>),
}

impl Layout {
    /// A named layout. A trailing template engine extension is dropped, so
    /// `1.x.erb` and `1.x` name the same layout.
    pub fn named(name: &str) -> Self {
        Layout::Named(strip_template_ext(name).into())
    }

    /// Parses a layout from a `layout` option value: a string names a layout
    /// and `false` disables the layout.
    pub fn from_value(option: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(name) if name.trim().is_empty() => {
                Err(ConfigError::invalid(option, value, "layout name is empty").into())
            }
            Value::String(name) => Ok(Layout::named(name)),
            Value::Bool(false) => Ok(Layout::None),
            _ => Err(ConfigError::mismatch(option, "string or `false`", value).into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Layout::None => None,
            Layout::Named(name) => Some(name),
        }
    }
}

impl From<&Layout> for Value {
    fn from(layout: &Layout) -> Self {
        match layout {
            Layout::None => Value::Bool(false),
            Layout::Named(name) => Value::String(name.clone()),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::None => f.write_str("(none)"),
            Layout::Named(name) => f.write_str(name),
        }
    }
}

impl Serialize for Layout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Layout::None => serializer.serialize_bool(false),
            Layout::Named(name) => serializer.serialize_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutRule {
    pub pattern: PagePattern,
    pub layout: Layout,
}

/// Layout rules in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_more::Deref)]
#[serde(transparent)]
pub struct LayoutRules(Vec<LayoutRule>);

impl LayoutRules {
    pub fn new() -> Self {
        LayoutRules::default()
    }

    pub fn push(&mut self, pattern: PagePattern, layout: Layout) {
        self.0.push(LayoutRule { pattern, layout });
    }

    /// Returns the rule deciding the layout of `path`: the last registered
    /// rule whose pattern matches.
    ///
    /// ```rust
    /// use siteconf::layout::{Layout, LayoutRules, PagePattern};
    ///
    /// let mut rules = LayoutRules::new();
    /// rules.push(PagePattern::new("/documentation/*").unwrap(), Layout::named("docs"));
    /// rules.push(PagePattern::new("/documentation/1.x/*").unwrap(), Layout::named("1.x.erb"));
    ///
    /// let layout = |path: &str| rules.rule_for(path).map(|r| r.layout.clone());
    /// assert_eq!(layout("/documentation/1.x/intro.html"), Some(Layout::named("1.x")));
    /// assert_eq!(layout("/documentation/2.x/intro.html"), Some(Layout::named("docs")));
    /// assert_eq!(layout("/index.html"), None);
    /// ```
    pub fn rule_for(&self, path: &str) -> Option<&LayoutRule> {
        self.0.iter().rev().find(|rule| rule.pattern.matches(path))
    }

    /// The layout for `path`, falling back to `default` when no rule matches.
    pub fn resolve<'a>(&'a self, path: &str, default: &'a Layout) -> &'a Layout {
        self.rule_for(path).map_or(default, |rule| &rule.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_from_values() {
        let layout = |v: Value| Layout::from_value("layout", &v);

        assert_eq!(layout(Value::from("1.x.erb")).unwrap(), Layout::named("1.x"));
        assert_eq!(layout(Value::from("admin")).unwrap().name(), Some("admin"));
        assert_eq!(layout(Value::from(false)).unwrap(), Layout::None);

        let err = layout(Value::from(true)).unwrap_err();
        assert!(matches!(err.config_error(), Some(ConfigError::TypeMismatch { .. })));

        let err = layout(Value::from(" ")).unwrap_err();
        assert!(matches!(err.config_error(), Some(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn later_rules_win() {
        let mut rules = LayoutRules::new();
        let default = Layout::named("layout");
        rules.push(PagePattern::new("/admin/*").unwrap(), Layout::named("admin"));
        rules.push(PagePattern::new("/admin/raw/*").unwrap(), Layout::None);

        assert_eq!(rules.len(), 2);
        assert_eq!(rules.resolve("/admin/users.html", &default), &Layout::named("admin"));
        assert_eq!(rules.resolve("/admin/raw/dump.json", &default), &Layout::None);
        assert_eq!(rules.resolve("/index.html", &default), &default);
    }
}
