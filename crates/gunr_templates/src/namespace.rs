//! Namespace <-> path conversion.
//!
//! A template living at `<templatesDir>/billing/invoice` is addressed as
//! `billing.invoice`.

use std::path::{Path, PathBuf};

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Convert a path relative to the templates directory into a namespace.
///
/// One leading and one trailing separator are stripped, every remaining
/// separator becomes a `.`.
pub fn to_namespace(relative: &str) -> String {
    let trimmed = relative.strip_suffix(is_separator).unwrap_or(relative);
    let trimmed = trimmed.strip_prefix(is_separator).unwrap_or(trimmed);
    trimmed.replace(is_separator, ".")
}

/// Namespace of `dir`, a directory somewhere below `templates_dir`.
pub fn namespace_for(templates_dir: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(templates_dir).ok()?;
    let namespace = to_namespace(&relative.to_string_lossy());
    if namespace.is_empty() {
        None
    } else {
        Some(namespace)
    }
}

/// Convert a namespace back into a relative path, optionally under `prefix`.
pub fn from_namespace(namespace: &str, prefix: Option<&Path>) -> PathBuf {
    let relative: PathBuf = namespace.split('.').collect();
    match prefix {
        Some(prefix) => prefix.join(relative),
        None => relative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_namespace() {
        assert_eq!(to_namespace("welcome"), "welcome");
        assert_eq!(to_namespace("billing/invoice"), "billing.invoice");
        assert_eq!(to_namespace("/billing/invoice/"), "billing.invoice");
        assert_eq!(to_namespace("billing\\overdue\\final"), "billing.overdue.final");
    }

    #[test]
    fn test_round_trip() {
        for relative in ["welcome", "billing/invoice", "a/b/c/d"] {
            let path = from_namespace(&to_namespace(relative), None);
            assert_eq!(path, PathBuf::from(relative));
        }
    }

    #[test]
    fn test_from_namespace_with_prefix() {
        let path = from_namespace("billing.invoice", Some(Path::new("/srv/templates")));
        assert_eq!(path, PathBuf::from("/srv/templates/billing/invoice"));
    }

    #[test]
    fn test_namespace_for() {
        let root = Path::new("/srv/templates");
        assert_eq!(
            namespace_for(root, Path::new("/srv/templates/billing/invoice")),
            Some("billing.invoice".to_string())
        );
        assert_eq!(namespace_for(root, root), None);
        assert_eq!(namespace_for(root, Path::new("/elsewhere")), None);
    }
}
