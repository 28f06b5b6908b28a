use std::sync::Arc;

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::layout::is_path_char;
use crate::value::Dict;

/// A page at `path` with no source file of its own, rendered from
/// `template` with `locals` in scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyPage {
    pub path: Arc<str>,
    pub template: Arc<str>,
    pub locals: Dict,
    /// Whether `template` should be skipped when rendering on its own.
    pub ignore: bool,
}

fn page_path(option: &'static str, path: &str) -> Result<Arc<str>> {
    let path = path.trim_start_matches('/');
    if path.is_empty() || !path.bytes().all(|b| is_path_char(&b)) {
        return Err(ConfigError::invalid(option, path, "not a valid page path").into());
    }

    Ok(format!("/{path}").into())
}

impl ProxyPage {
    /// ```rust
    /// use siteconf::dict;
    /// use siteconf::proxy::ProxyPage;
    ///
    /// let page = ProxyPage::new("this-page-has-no-template.html", "/template-file.html")
    ///     .unwrap()
    ///     .with_locals(dict! { "which_fake_page" => "Rendering a fake page" });
    ///
    /// assert_eq!(&*page.path, "/this-page-has-no-template.html");
    /// assert_eq!(&*page.template, "/template-file.html");
    /// assert!(ProxyPage::new("/no spaces.html", "/t.html").is_err());
    /// ```
    pub fn new(path: &str, template: &str) -> Result<Self> {
        Ok(ProxyPage {
            path: page_path("proxy.path", path)?,
            template: page_path("proxy.template", template)?,
            locals: Dict::new(),
            ignore: false,
        })
    }

    pub fn with_locals(mut self, locals: Dict) -> Self {
        self.locals = locals;
        self
    }

    pub fn ignoring_template(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }
}

/// Proxy pages in registration order, at most one per path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_more::Deref)]
#[serde(transparent)]
pub struct ProxyPages(Vec<ProxyPage>);

impl ProxyPages {
    /// Registers `page`, replacing an earlier proxy for the same path in place.
    pub fn insert(&mut self, page: ProxyPage) {
        match self.0.iter_mut().find(|existing| existing.path == page.path) {
            Some(existing) => *existing = page,
            None => self.0.push(page),
        }
    }

    pub fn get(&self, path: &str) -> Option<&ProxyPage> {
        let path = path.trim_start_matches('/');
        self.0.iter().find(|page| &page.path[1..] == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;

    #[test]
    fn later_proxy_replaces_earlier() {
        let mut pages = ProxyPages::default();
        pages.insert(ProxyPage::new("/a.html", "/t1.html").unwrap());
        pages.insert(ProxyPage::new("/b.html", "/t1.html").unwrap());
        pages.insert(ProxyPage::new("a.html", "/t2.html").unwrap().ignoring_template(true));

        assert_eq!(pages.len(), 2);
        assert_eq!(&*pages[0].path, "/a.html");
        assert_eq!(&*pages.get("/a.html").unwrap().template, "/t2.html");
        assert!(pages.get("a.html").unwrap().ignore);
        assert!(pages.get("/c.html").is_none());
    }

    #[test]
    fn invalid_paths() {
        for (path, template) in [("", "/t.html"), ("/", "/t.html"), ("/a*.html", "/t.html")] {
            let err = ProxyPage::new(path, template).unwrap_err();
            assert_eq!(err.config_error().unwrap().subject(), "proxy.path");
        }

        let err = ProxyPage::new("/a.html", "/t?.html").unwrap_err();
        assert_eq!(err.config_error().unwrap().subject(), "proxy.template");

        let page = ProxyPage::new("/a.html", "t.html").unwrap().with_locals(dict! { "n" => 1 });
        assert_eq!(page.locals.len(), 1);
    }
}
