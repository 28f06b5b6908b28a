mod macros;

pub(crate) use macros::string_enum;

use std::path::{Component, Path};

/// File extensions of the template engines a layout may be written in.
pub const TEMPLATE_EXTS: &[&str] = &["erb", "haml", "slim", "liquid", "builder", "str"];

/// Strips a trailing template engine extension from a layout name.
///
/// ```
/// use siteconf::util::strip_template_ext;
///
/// assert_eq!(strip_template_ext("1.x.erb"), "1.x");
/// assert_eq!(strip_template_ext("admin.haml"), "admin");
/// assert_eq!(strip_template_ext("1.x"), "1.x");
/// assert_eq!(strip_template_ext("layout"), "layout");
/// assert_eq!(strip_template_ext(".erb"), ".erb");
/// ```
pub fn strip_template_ext(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && TEMPLATE_EXTS.contains(&ext) => stem,
        _ => name,
    }
}

/// Returns `true` if `path` is non-empty, relative, and never climbs out of
/// its root via `..`.
///
/// ```
/// use siteconf::util::is_contained_relative;
///
/// assert!(is_contained_relative("stylesheets"));
/// assert!(is_contained_relative("assets/./images"));
/// assert!(!is_contained_relative(""));
/// assert!(!is_contained_relative("/var/www"));
/// assert!(!is_contained_relative("../images"));
/// assert!(!is_contained_relative("a/../../b"));
/// ```
pub fn is_contained_relative<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || path.has_root() {
        return false;
    }

    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => continue,
            Component::ParentDir if depth > 0 => depth -= 1,
            Component::ParentDir | Component::Prefix(_) | Component::RootDir => return false,
        }
    }

    true
}
