/// Where a `$ref` string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RefTarget {
    /// A JSON Pointer into the same document (`""` is the document root).
    Local(String),
    /// Anything else: another document, a URL, or a plain-name anchor.
    External,
}

pub(crate) fn ref_target(reference: &str) -> RefTarget {
    match reference.strip_prefix('#') {
        Some(fragment) if fragment.is_empty() || fragment.starts_with('/') => {
            RefTarget::Local(fragment.to_owned())
        }
        _ => RefTarget::External,
    }
}

/// Escape a property name for use as a single JSON Pointer reference token.
pub(crate) fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
