#![doc = svgbobdoc::transform!(
//! Typed, ordered configuration for static site generators.
//!
//! # Overview
//!
//! A site is configured by a [`Script`]: an ordered list of statements that
//! assign options, map pages to layouts, register proxy pages, activate
//! extensions, and scope any of these to an environment. A [`ConfigLoader`]
//! executes a script exactly once, in declaration order, and produces an
//! immutable [`Config`]:
//!
//! ```svgbob
//!   +-------------+      +--------+      +--------------+      +--------+
//!   | config.toml +----->| Script +----->| ConfigLoader +----->| Config |
//!   +-------------+      +---+----+      +------+-------+      +---+----+
//!                            ^                  |                  |
//!                            |             environment             |
//!                     built in code                                |
//!        +--------------+--------------+-------------+-------------+
//!        |              |              |             |             |
//!   +----+-----+  +-----+-------+  +---+----+  +-----+-----+  +----+-----+
//!   | Settings |  | LayoutRules |  | Proxy  |  | Extension |  | Deploy-  |
//!   |          |  |             |  | Pages  |  | options   |  | mentSpec |
//!   +----------+  +-------------+  +--------+  +-----------+  +----------+
//! ```
//!
//! In words, a **config** consists of:
//!
//!   * **Settings**: the well-known options (directories, the default
//!     layout, the markdown engine and its flags, ...) in typed fields, and
//!     every other option as a template variable.
//!
//!   * **Layout rules**: page patterns such as `/documentation/1.x/*`
//!     mapped to a layout. The last matching rule wins.
//!
//!   * **Proxy pages**, **activated extensions**, and, when the `deploy`
//!     extension is active, a **deployment spec**.
//!
//! ## Loading
//!
//! ```rust
//! use siteconf::{Config, options::Environment, layout::Layout};
//!
//! let config = Config::from_toml(r#"
//!     css_dir = "stylesheets"
//!     markdown_engine = "redcarpet"
//!
//!     [markdown]
//!     fenced_code_blocks = true
//!
//!     [[page]]
//!     pattern = "/documentation/1.x/*"
//!     layout = "1.x.erb"
//! "#, Environment::Build).unwrap();
//!
//! assert_eq!(config.layout_for("/documentation/1.x/index.html"), &Layout::named("1.x"));
//! assert!(config.settings.markdown.fenced_code_blocks);
//! ```
//!
//! Every malformed or mistyped statement is an [`Error`](error::Error)
//! carrying a [`ConfigError`] that names the offending option.
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod value;
pub mod layout;
pub mod options;
pub mod settings;
pub mod deploy;
pub mod proxy;
pub mod script;
pub mod loader;
pub mod config;

pub use error::ConfigError;
pub use settings::Settings;
pub use script::{Script, Statement};
pub use loader::ConfigLoader;
pub use config::{Activation, Config};
