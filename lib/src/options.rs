//! Enumerated option values and the record-like `markdown` option.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::util::string_enum;
use crate::value::Value;

string_enum! {
    /// The markdown renderer pages are processed with.
    pub enum MarkdownEngine {
        Kramdown => "kramdown",
        Redcarpet => "redcarpet",
        Rdiscount => "rdiscount",
        Maruku => "maruku",
        Commonmarker => "commonmarker",
    }
}

impl Default for MarkdownEngine {
    fn default() -> Self {
        MarkdownEngine::Kramdown
    }
}

string_enum! {
    /// An extension that can be activated by the site configuration.
    pub enum Extension {
        Syntax => "syntax",
        Deploy => "deploy",
        Livereload => "livereload",
        AutomaticImageSizes => "automatic_image_sizes",
        MinifyCss => "minify_css",
        MinifyJavascript => "minify_javascript",
        AssetHash => "asset_hash",
        RelativeAssets => "relative_assets",
        DirectoryIndexes => "directory_indexes",
        Gzip => "gzip",
    }
}

impl Extension {
    pub fn parse(name: &str) -> Result<Self> {
        name.parse().map_err(|_| ConfigError::UnknownExtension(name.into()).into())
    }
}

string_enum! {
    /// The environment a configuration is loaded for.
    pub enum Environment {
        /// Previewing the site with a development server.
        Development => "development",
        /// Building the static site.
        Build => "build",
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl Environment {
    pub fn parse(name: &str) -> Result<Self> {
        name.parse().map_err(|_| ConfigError::UnknownEnvironment(name.into()).into())
    }
}

/// Parses a string-valued enumerated option.
pub(crate) fn parse_enum<T: FromStr>(option: &str, value: &Value, what: &'static str) -> Result<T> {
    match value {
        Value::String(s) => s.parse()
            .map_err(|_| ConfigError::invalid(option, s, what).into()),
        _ => Err(ConfigError::mismatch(option, "string", value).into()),
    }
}

macro_rules! markdown_options {
    ($($flag:ident),+ $(,)?) => {
        /// Flags passed to the markdown engine. Every flag defaults to off.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
        pub struct MarkdownOptions {
            $(pub $flag: bool,)+
        }

        impl MarkdownOptions {
            pub const FLAGS: &'static [&'static str] = &[$(stringify!($flag)),+];

            pub fn get(&self, flag: &str) -> Option<bool> {
                match flag {
                    $(stringify!($flag) => Some(self.$flag),)+
                    _ => None,
                }
            }

            fn flag_mut(&mut self, flag: &str) -> Option<&mut bool> {
                match flag {
                    $(stringify!($flag) => Some(&mut self.$flag),)+
                    _ => None,
                }
            }
        }
    }
}

markdown_options! {
    fenced_code_blocks,
    smartypants,
    autolink,
    with_toc_data,
    tables,
    strikethrough,
    no_intra_emphasis,
    footnotes,
    superscript,
    hard_wrap,
    lax_spacing,
    space_after_headers,
}

impl MarkdownOptions {
    /// Builds the options from a dictionary of flags. Unlisted flags are off.
    ///
    /// ```rust
    /// use siteconf::{dict, value::Value};
    /// use siteconf::options::MarkdownOptions;
    ///
    /// let value = Value::from(dict! { "autolink" => true, "tables" => false });
    /// let options = MarkdownOptions::from_value("markdown", &value).unwrap();
    /// assert!(options.autolink && !options.tables && !options.smartypants);
    ///
    /// let value = Value::from(dict! { "autolink" => "yes" });
    /// assert!(MarkdownOptions::from_value("markdown", &value).is_err());
    /// ```
    pub fn from_value(option: &str, value: &Value) -> Result<Self> {
        let dict = value.as_dict()
            .ok_or_else(|| ConfigError::mismatch(option, "dict of boolean flags", value))?;

        let mut options = MarkdownOptions::default();
        for (flag, value) in dict {
            let name = format!("{option}.{flag}");
            let slot = options.flag_mut(flag).ok_or_else(|| ConfigError::UnknownOption {
                option: name.as_str().into(),
                within: "markdown",
            })?;

            *slot = value.to_bool()
                .ok_or_else(|| ConfigError::mismatch(&name, "boolean", value))?;
        }

        Ok(options)
    }

    /// The names of the flags that are on.
    pub fn enabled(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::FLAGS.iter().copied().filter(|flag| self.get(flag) == Some(true))
    }
}

impl From<&MarkdownOptions> for Value {
    fn from(options: &MarkdownOptions) -> Self {
        let dict = MarkdownOptions::FLAGS.iter()
            .filter_map(|&flag| Some((flag, options.get(flag)?)))
            .collect::<crate::value::Dict<&str, bool>>();

        Value::from(dict)
    }
}
