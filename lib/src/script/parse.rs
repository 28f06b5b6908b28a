use std::sync::Arc;

use toml::{Table, Value as Toml};

use crate::error::{ConfigError, Result};
use crate::script::{Script, Statement};
use crate::value::{Dict, Format, Source, Value};

fn kind(value: &Toml) -> &'static str {
    match value {
        Toml::String(_) => "string",
        Toml::Integer(_) => "number",
        Toml::Float(_) => "float",
        Toml::Boolean(_) => "boolean",
        Toml::Datetime(_) => "datetime",
        Toml::Array(_) => "array",
        Toml::Table(_) => "table",
    }
}

fn mismatch(option: &str, expected: &'static str, found: &Toml) -> ConfigError {
    ConfigError::TypeMismatch { option: option.into(), expected, found: kind(found) }
}

fn table(option: &str, value: Toml) -> Result<Table> {
    match value {
        Toml::Table(table) => Ok(table),
        value => Err(mismatch(option, "table", &value).into()),
    }
}

fn string(option: &str, value: Toml) -> Result<Arc<str>> {
    match value {
        Toml::String(s) => Ok(s.into()),
        value => Err(mismatch(option, "string", &value).into()),
    }
}

fn dict(option: &str, value: Toml) -> Result<Dict> {
    match Value::from_toml(option, value)? {
        Value::Dict(dict) => Ok(Arc::unwrap_or_clone(dict)),
        value => Err(ConfigError::mismatch(option, "table", &value).into()),
    }
}

fn tables(option: &str, value: Toml) -> Result<Vec<Table>> {
    match value {
        Toml::Array(array) => array.into_iter().map(|v| table(option, v)).collect(),
        value => Err(mismatch(option, "array of tables", &value).into()),
    }
}

fn unknown(option: &str, key: &str, within: &'static str) -> ConfigError {
    ConfigError::UnknownOption { option: format!("{option}.{key}").into(), within }
}

fn missing(option: &str, key: &str) -> ConfigError {
    ConfigError::invalid(&format!("{option}.{key}"), "(unset)", "required")
}

impl Script {
    /// Parses a TOML configuration document. Statements are produced in
    /// document order. The keys `activate`, `page`, `proxy`, and `configure`
    /// have a meaning of their own; every other key assigns an option.
    ///
    /// ```rust
    /// use siteconf::{Script, Statement};
    /// use siteconf::value::Value;
    ///
    /// let script = Script::parse(r#"
    ///     css_dir = "stylesheets"
    ///     skinny_version = "3.0.0"
    ///
    ///     [[page]]
    ///     pattern = "/documentation/1.x/*"
    ///     layout = "1.x.erb"
    /// "#).unwrap();
    ///
    /// assert_eq!(script.len(), 3);
    /// assert_eq!(script[1], Statement::Set {
    ///     option: "skinny_version".into(),
    ///     value: Value::from("3.0.0"),
    /// });
    /// ```
    pub fn parse(toml: &str) -> Result<Script> {
        Script::read(toml)
    }

    /// Reads and parses a TOML configuration document from `source`.
    pub fn read<S: Source>(source: S) -> Result<Script> {
        let document: Table = crate::value::Toml::read(source)?;
        Script::from_table(document, true)
    }

    fn from_table(document: Table, top_level: bool) -> Result<Script> {
        let mut statements = vec![];
        for (key, value) in document {
            match key.as_str() {
                "activate" => activations(value, &mut statements)?,
                "page" => for page in tables("page", value)? {
                    pages(page, &mut statements)?;
                },
                "proxy" => for proxy in tables("proxy", value)? {
                    statements.push(self::proxy(proxy)?);
                },
                "configure" if top_level => {
                    for (environment, body) in table("configure", value)? {
                        let option = format!("configure.{environment}");
                        statements.push(Statement::Configure {
                            environment: environment.into(),
                            body: Script::from_table(table(&option, body)?, false)?,
                        });
                    }
                }
                "configure" => {
                    let reason = "`configure` blocks cannot be nested";
                    return Err(ConfigError::invalid("configure", "(nested)", reason).into());
                }
                _ => {
                    let value = Value::from_toml(&key, value)?;
                    statements.push(Statement::Set { option: key.into(), value });
                }
            }
        }

        Ok(statements.into_iter().collect())
    }
}

fn activations(value: Toml, statements: &mut Vec<Statement>) -> Result<()> {
    for (name, value) in table("activate", value)? {
        let option = format!("activate.{name}");
        let options = match value {
            Toml::Boolean(true) => Default::default(),
            Toml::Boolean(false) => continue,
            value @ Toml::Table(_) => dict(&option, value)?,
            value => return Err(mismatch(&option, "boolean or table", &value).into()),
        };

        statements.push(Statement::Activate { name: name.into(), options });
    }

    Ok(())
}

fn pages(mut page: Table, statements: &mut Vec<Statement>) -> Result<()> {
    let layout = match page.remove("layout") {
        Some(layout) => Value::from_toml("page.layout", layout)?,
        None => return Err(missing("page", "layout").into()),
    };

    let mut patterns = vec![];
    for (key, value) in page {
        match key.as_str() {
            "pattern" => patterns.push(string("page.pattern", value)?),
            "patterns" => match value {
                Toml::Array(array) => for pattern in array {
                    patterns.push(string("page.patterns", pattern)?);
                },
                value => return Err(mismatch("page.patterns", "array of strings", &value).into()),
            },
            _ => return Err(unknown("page", &key, "page").into()),
        }
    }

    if patterns.is_empty() {
        return Err(missing("page", "pattern").into());
    }

    for pattern in patterns {
        statements.push(Statement::Page { pattern, layout: layout.clone() });
    }

    Ok(())
}

fn proxy(proxy: Table) -> Result<Statement> {
    let (mut path, mut template) = (None, None);
    let mut locals = Dict::new();
    let mut ignore = false;
    for (key, value) in proxy {
        match key.as_str() {
            "path" => path = Some(string("proxy.path", value)?),
            "template" => template = Some(string("proxy.template", value)?),
            "ignore" => ignore = match value {
                Toml::Boolean(b) => b,
                value => return Err(mismatch("proxy.ignore", "boolean", &value).into()),
            },
            "locals" => locals = dict("proxy.locals", value)?,
            _ => return Err(unknown("proxy", &key, "proxy").into()),
        }
    }

    Ok(Statement::Proxy {
        path: path.ok_or_else(|| missing("proxy", "path"))?,
        template: template.ok_or_else(|| missing("proxy", "template"))?,
        locals,
        ignore,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;

    #[test]
    fn document_order() {
        let script = Script::parse(r#"
            skinny1_version = "1.3.20"
            skinny1_blank_app_version = "{{ skinny1_version }}"
            css_dir = "stylesheets"

            [markdown]
            fenced_code_blocks = true

            [activate]
            syntax = true
            livereload = false

            [activate.deploy]
            build_before = true
        "#).unwrap();

        let expected = Script::new()
            .set("skinny1_version", "1.3.20")
            .set("skinny1_blank_app_version", "{{ skinny1_version }}")
            .set("css_dir", "stylesheets")
            .set("markdown", dict! { "fenced_code_blocks" => true })
            .activate("syntax")
            .activate_with("deploy", dict! { "build_before" => true });

        assert_eq!(script, expected);
    }

    #[test]
    fn pages_and_proxies() {
        let script = Script::parse(r#"
            [[page]]
            pattern = "/documentation/1.x/*"
            layout = "1.x.erb"

            [[page]]
            patterns = ["/admin/*", "/settings/*"]
            layout = false

            [[proxy]]
            path = "/this-page-has-no-template.html"
            template = "/template-file.html"
            ignore = true
            locals = { which_fake_page = "Rendering a fake page with a local variable" }
        "#).unwrap();

        let expected = Script::new()
            .page("/documentation/1.x/*", "1.x.erb")
            .with_layout(false, ["/admin/*", "/settings/*"])
            .push(Statement::Proxy {
                path: "/this-page-has-no-template.html".into(),
                template: "/template-file.html".into(),
                locals: dict! { "which_fake_page" => "Rendering a fake page with a local variable" },
                ignore: true,
            });

        assert_eq!(script, expected);
    }

    #[test]
    fn configure_blocks() {
        let script = Script::parse(r#"
            [configure.build]
            http_prefix = "/Content/images/"

            [configure.build.activate]
            minify_css = true
        "#).unwrap();

        let build = Script::new()
            .set("http_prefix", "/Content/images/")
            .activate("minify_css");

        assert_eq!(script, Script::new().configure("build", build));
    }

    #[test]
    fn malformed_documents() {
        let subject = |toml: &str| {
            let err = Script::parse(toml).unwrap_err();
            err.config_error().map(|e| e.subject().to_string())
        };

        assert_eq!(subject("page = 1").as_deref(), Some("page"));
        assert_eq!(subject("[[page]]\npattern = '/x'").as_deref(), Some("page.layout"));
        assert_eq!(subject("[[page]]\nlayout = 'x'").as_deref(), Some("page.pattern"));
        assert_eq!(subject("[[page]]\nlayout = 'x'\npatern = '/x'").as_deref(), Some("page.patern"));
        assert_eq!(subject("[[proxy]]\npath = '/x.html'").as_deref(), Some("proxy.template"));
        assert_eq!(subject("[activate]\nsyntax = 'yes'").as_deref(), Some("activate.syntax"));
        assert_eq!(subject("[configure.build.configure.build]\nx = 1").as_deref(), Some("configure"));
        assert_eq!(subject("ratio = 1.5").as_deref(), Some("ratio"));

        // Not a configuration error: the document isn't TOML at all.
        assert_eq!(subject("css_dir = "), None);
    }
}
