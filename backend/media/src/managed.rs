//! Managed-asset references.
//!
//! Only files under the site's own upload prefix belong to us. Anything else
//! (CDN links, hotlinked images) must never be deleted.

/// Default URL prefix under which uploads are served.
pub const DEFAULT_UPLOAD_PREFIX: &str = "/uploads/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedAssets {
    prefix: String,
    origin: Option<String>,
}

impl Default for ManagedAssets {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_PREFIX)
    }
}

impl ManagedAssets {
    /// `prefix` is normalized to end with `/`.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            prefix,
            origin: None,
        }
    }

    /// Also accept absolute URLs on the site's own origin, e.g. `https://me.dev`.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        self.origin = Some(origin.trim_end_matches('/').to_string());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_managed(&self, reference: &str) -> bool {
        self.relative_path(reference).is_some()
    }

    /// Path of the asset below the upload prefix, without query or fragment.
    ///
    /// Returns `None` for unmanaged references and for anything that could
    /// escape the upload directory.
    pub fn relative_path<'a>(&self, reference: &'a str) -> Option<&'a str> {
        let path = match &self.origin {
            Some(origin) => reference.strip_prefix(origin.as_str()).unwrap_or(reference),
            None => reference,
        };
        let rest = path.strip_prefix(self.prefix.as_str())?;
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);
        let suspicious = rest.is_empty()
            || rest.contains('\\')
            || rest
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..");
        if suspicious { None } else { Some(rest) }
    }
}
