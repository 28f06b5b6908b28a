use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::layout::Layout;
use crate::options::{parse_enum, MarkdownEngine, MarkdownOptions};
use crate::util::{is_contained_relative, string_enum};
use crate::value::{Dict, Value};

string_enum! {
    /// An option [`Settings`] stores in a typed field.
    pub enum WellKnown {
        Source => "source",
        BuildDir => "build_dir",
        CssDir => "css_dir",
        JsDir => "js_dir",
        ImagesDir => "images_dir",
        FontsDir => "fonts_dir",
        LayoutsDir => "layouts_dir",
        HttpPrefix => "http_prefix",
        IndexFile => "index_file",
        Layout => "layout",
        MarkdownEngine => "markdown_engine",
        Markdown => "markdown",
        EnforceAvailableLocales => "enforce_available_locales",
        RelativeLinks => "relative_links",
        StripIndexFile => "strip_index_file",
    }
}

static WELL_KNOWN: Lazy<FxHashMap<&'static str, WellKnown>> = Lazy::new(|| {
    WellKnown::ALL.iter().map(|option| (option.as_str(), *option)).collect()
});

impl WellKnown {
    pub fn lookup(name: &str) -> Option<WellKnown> {
        WELL_KNOWN.get(name).copied()
    }

    /// The type of value the option accepts.
    pub fn expects(&self) -> &'static str {
        match self {
            WellKnown::Source
            | WellKnown::BuildDir
            | WellKnown::CssDir
            | WellKnown::JsDir
            | WellKnown::ImagesDir
            | WellKnown::FontsDir
            | WellKnown::LayoutsDir => "relative directory",
            WellKnown::HttpPrefix | WellKnown::IndexFile => "string",
            WellKnown::Layout => "string or `false`",
            WellKnown::MarkdownEngine => "markdown engine name",
            WellKnown::Markdown => "dict of boolean flags",
            WellKnown::EnforceAvailableLocales
            | WellKnown::RelativeLinks
            | WellKnown::StripIndexFile => "boolean",
        }
    }
}

/// The site's settings: every option assigned by the configuration, keyed
/// by option name. Well-known options live in typed fields; everything else
/// is a template variable in `variables`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub source: Arc<str>,
    pub build_dir: Arc<str>,
    pub css_dir: Arc<str>,
    pub js_dir: Arc<str>,
    pub images_dir: Arc<str>,
    pub fonts_dir: Arc<str>,
    pub layouts_dir: Arc<str>,
    pub http_prefix: Arc<str>,
    pub index_file: Arc<str>,
    pub layout: Layout,
    pub markdown_engine: MarkdownEngine,
    pub markdown: MarkdownOptions,
    pub enforce_available_locales: bool,
    pub relative_links: bool,
    pub strip_index_file: bool,
    pub variables: Dict,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source: "source".into(),
            build_dir: "build".into(),
            css_dir: "stylesheets".into(),
            js_dir: "javascripts".into(),
            images_dir: "images".into(),
            fonts_dir: "fonts".into(),
            layouts_dir: "layouts".into(),
            http_prefix: "/".into(),
            index_file: "index.html".into(),
            layout: Layout::named("layout"),
            markdown_engine: MarkdownEngine::default(),
            markdown: MarkdownOptions::default(),
            enforce_available_locales: true,
            relative_links: false,
            strip_index_file: true,
            variables: Dict::new(),
        }
    }
}

fn dir(option: WellKnown, value: &Value) -> Result<Arc<str>> {
    let dir = string(option, value)?;
    if !is_contained_relative(&*dir) {
        return Err(ConfigError::invalid(option.as_str(), dir, "directory must be a relative path inside the site").into());
    }

    Ok(dir.trim_end_matches('/').into())
}

fn string(option: WellKnown, value: &Value) -> Result<Arc<str>> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ConfigError::mismatch(option.as_str(), option.expects(), value).into()),
    }
}

fn flag(option: WellKnown, value: &Value) -> Result<bool> {
    value.to_bool().ok_or_else(|| ConfigError::mismatch(option.as_str(), option.expects(), value).into())
}

impl Settings {
    /// Assigns `value` to `option`, replacing any previous value.
    ///
    /// Well-known options are type-checked; a value of the wrong type is a
    /// [`ConfigError`]. Any other option is stored as a template variable.
    ///
    /// ```rust
    /// use siteconf::Settings;
    /// use siteconf::value::Value;
    ///
    /// let mut settings = Settings::default();
    /// settings.set("css_dir", "css".into()).unwrap();
    /// settings.set("skinny_version", "3.0.0".into()).unwrap();
    /// assert_eq!(&*settings.css_dir, "css");
    /// assert_eq!(settings.get("skinny_version"), Some(Value::from("3.0.0")));
    ///
    /// let err = settings.set("relative_links", "yes".into()).unwrap_err();
    /// assert_eq!(err.config_error().unwrap().subject(), "relative_links");
    /// ```
    pub fn set(&mut self, option: &str, value: Value) -> Result<()> {
        let Some(known) = WellKnown::lookup(option) else {
            self.variables.insert(option.into(), value);
            return Ok(());
        };

        let value = &value;
        match known {
            WellKnown::Source => self.source = dir(known, value)?,
            WellKnown::BuildDir => self.build_dir = dir(known, value)?,
            WellKnown::CssDir => self.css_dir = dir(known, value)?,
            WellKnown::JsDir => self.js_dir = dir(known, value)?,
            WellKnown::ImagesDir => self.images_dir = dir(known, value)?,
            WellKnown::FontsDir => self.fonts_dir = dir(known, value)?,
            WellKnown::LayoutsDir => self.layouts_dir = dir(known, value)?,
            WellKnown::HttpPrefix => {
                let prefix = string(known, value)?;
                self.http_prefix = match prefix.starts_with('/') {
                    true => prefix,
                    false => format!("/{prefix}").into(),
                };
            }
            WellKnown::IndexFile => self.index_file = string(known, value)?,
            WellKnown::Layout => self.layout = Layout::from_value(option, value)?,
            WellKnown::MarkdownEngine => {
                self.markdown_engine = parse_enum(option, value, "unknown markdown engine")?;
            }
            WellKnown::Markdown => self.markdown = MarkdownOptions::from_value(option, value)?,
            WellKnown::EnforceAvailableLocales => self.enforce_available_locales = flag(known, value)?,
            WellKnown::RelativeLinks => self.relative_links = flag(known, value)?,
            WellKnown::StripIndexFile => self.strip_index_file = flag(known, value)?,
        }

        Ok(())
    }

    /// Returns the current value of `option`, well-known or not.
    pub fn get(&self, option: &str) -> Option<Value> {
        let Some(known) = WellKnown::lookup(option) else {
            return self.variables.get(option).cloned();
        };

        Some(match known {
            WellKnown::Source => self.source.clone().into(),
            WellKnown::BuildDir => self.build_dir.clone().into(),
            WellKnown::CssDir => self.css_dir.clone().into(),
            WellKnown::JsDir => self.js_dir.clone().into(),
            WellKnown::ImagesDir => self.images_dir.clone().into(),
            WellKnown::FontsDir => self.fonts_dir.clone().into(),
            WellKnown::LayoutsDir => self.layouts_dir.clone().into(),
            WellKnown::HttpPrefix => self.http_prefix.clone().into(),
            WellKnown::IndexFile => self.index_file.clone().into(),
            WellKnown::Layout => Value::from(&self.layout),
            WellKnown::MarkdownEngine => self.markdown_engine.as_str().into(),
            WellKnown::Markdown => Value::from(&self.markdown),
            WellKnown::EnforceAvailableLocales => self.enforce_available_locales.into(),
            WellKnown::RelativeLinks => self.relative_links.into(),
            WellKnown::StripIndexFile => self.strip_index_file.into(),
        })
    }

    /// Returns `true` if `option` currently has a value.
    pub fn contains(&self, option: &str) -> bool {
        WellKnown::lookup(option).is_some() || self.variables.contains_key(option)
    }

    /// Every option and its value as a single dictionary.
    pub fn to_dict(&self) -> Dict {
        let mut dict = self.variables.clone();
        for option in WellKnown::ALL {
            if let Some(value) = self.get(option.as_str()) {
                dict.insert(option.as_str().into(), value);
            }
        }

        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(&*settings.css_dir, "stylesheets");
        assert_eq!(&*settings.js_dir, "javascripts");
        assert_eq!(&*settings.images_dir, "images");
        assert_eq!(settings.get("layout"), Some(Value::from("layout")));
        assert_eq!(settings.markdown_engine, MarkdownEngine::Kramdown);
        assert_eq!(settings.markdown, MarkdownOptions::default());
        assert!(settings.variables.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let mut settings = Settings::default();
        for (option, first, last) in [
            ("css_dir", "a", "b"),
            ("skinny_version", "2.0.0", "3.0.0"),
            ("markdown_engine", "kramdown", "redcarpet"),
        ] {
            settings.set(option, first.into()).unwrap();
            settings.set(option, last.into()).unwrap();
            assert_eq!(settings.get(option), Some(Value::from(last)));
        }
    }

    #[test]
    fn markdown_replaces_whole_record() {
        let mut settings = Settings::default();
        settings.set("markdown", dict! { "tables" => true, "autolink" => true }.into()).unwrap();
        settings.set("markdown", dict! { "autolink" => true }.into()).unwrap();

        assert!(settings.markdown.autolink);
        assert!(!settings.markdown.tables);
    }

    #[test]
    fn type_mismatches() {
        let mut settings = Settings::default();
        let cases: [(&str, Value); 6] = [
            ("css_dir", true.into()),
            ("strip_index_file", "true".into()),
            ("markdown", "fenced_code_blocks".into()),
            ("markdown_engine", 3.into()),
            ("layout", true.into()),
            ("index_file", Value::Null),
        ];

        for (option, value) in cases {
            let err = settings.set(option, value).unwrap_err();
            let config = err.config_error().unwrap();
            assert_eq!(config.subject(), option);
            assert!(matches!(config, ConfigError::TypeMismatch { .. }), "{option}: {config:?}");
        }

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn directories_are_checked() {
        let mut settings = Settings::default();
        for bad in ["", "/abs", "../up"] {
            let err = settings.set("images_dir", bad.into()).unwrap_err();
            assert!(matches!(err.config_error(), Some(ConfigError::InvalidValue { .. })));
        }

        settings.set("images_dir", "assets/img/".into()).unwrap();
        assert_eq!(&*settings.images_dir, "assets/img");
    }

    #[test]
    fn prefixes_and_layouts() {
        let mut settings = Settings::default();
        settings.set("http_prefix", "Content/images/".into()).unwrap();
        assert_eq!(&*settings.http_prefix, "/Content/images/");

        settings.set("layout", false.into()).unwrap();
        assert_eq!(settings.layout, Layout::None);
        assert_eq!(settings.get("layout"), Some(Value::from(false)));
    }

    #[test]
    fn dictionary_view() {
        let mut settings = Settings::default();
        settings.set("latest_scala_version", "2.12.6".into()).unwrap();

        let dict = settings.to_dict();
        assert_eq!(dict.len(), WellKnown::ALL.len() + 1);
        assert_eq!(dict["latest_scala_version"], Value::from("2.12.6"));
        assert_eq!(dict["css_dir"], Value::from("stylesheets"));
        assert!(settings.contains("markdown") && settings.contains("latest_scala_version"));
        assert!(!settings.contains("skinny_version"));
    }
}
