use std::fmt;

/// The two form encodings whose bodies get their keys normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormEncoding {
    /// `multipart/form-data`
    Multipart,
    /// `application/x-www-form-urlencoded`
    UrlEncoded,
}

impl FormEncoding {
    pub const ALL: [FormEncoding; 2] = [FormEncoding::Multipart, FormEncoding::UrlEncoded];

    /// The exact (primary, secondary) pair identifying this encoding.
    pub fn pair(self) -> (&'static str, &'static str) {
        match self {
            FormEncoding::Multipart => ("multipart", "form-data"),
            FormEncoding::UrlEncoded => ("application", "x-www-form-urlencoded"),
        }
    }
}

impl fmt::Display for FormEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (primary, secondary) = self.pair();
        write!(f, "{primary}/{secondary}")
    }
}

/// A request's media type, split into primary type and subtype.
///
/// Casing is preserved: classification compares both halves exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    primary: String,
    secondary: String,
}

impl ContentType {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Parse a `Content-Type` header value such as
    /// `multipart/form-data; boundary=xyz`. Parameters are dropped.
    pub fn parse(header: &str) -> Option<Self> {
        let media_type = header.split(';').next().unwrap_or_default();
        let (primary, secondary) = media_type.split_once('/')?;
        let (primary, secondary) = (primary.trim(), secondary.trim());
        if primary.is_empty() || secondary.is_empty() {
            return None;
        }
        Some(Self::new(primary, secondary))
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }

    pub fn form_encoding(&self) -> Option<FormEncoding> {
        FormEncoding::ALL
            .into_iter()
            .find(|encoding| encoding.pair() == (self.primary.as_str(), self.secondary.as_str()))
    }

    pub fn is_form(&self) -> bool {
        self.form_encoding().is_some()
    }
}

impl From<FormEncoding> for ContentType {
    fn from(encoding: FormEncoding) -> Self {
        let (primary, secondary) = encoding.pair();
        Self::new(primary, secondary)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary, self.secondary)
    }
}
