use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Path segment that carries the style code on the gallery CDN.
static SREF_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"styles/0_(\d+)/").expect("sref segment regex"));

/// Numeric style code parsed from an image URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SrefCode(String);

impl SrefCode {
    /// Wraps an already-extracted code without re-validating it.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SrefCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrefError {
    /// No URL contained the `styles/0_{code}/` segment.
    NoMatch,
    /// A segment matched but the captured token was not purely numeric.
    NotNumeric(String),
}

impl fmt::Display for SrefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SrefError::NoMatch => write!(f, "no image url carried a style code segment"),
            SrefError::NotNumeric(code) => write!(f, "captured style code {code:?} is not numeric"),
        }
    }
}

impl std::error::Error for SrefError {}

/// Extracts the identifying style code from the first URL that matches the
/// fixed path-segment pattern.
pub fn extract_sref<'a, I>(urls: I) -> Result<SrefCode, SrefError>
where
    I: IntoIterator<Item = &'a str>,
{
    for url in urls {
        if let Some(caps) = SREF_SEGMENT.captures(url) {
            let code = &caps[1];
            if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SrefError::NotNumeric(code.to_string()));
            }
            return Ok(SrefCode(code.to_string()));
        }
    }
    Err(SrefError::NoMatch)
}
