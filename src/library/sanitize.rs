//! Folder-name sanitization for tag values

use std::fmt;
use std::path::is_separator;

/// Character written in place of a colon
pub const COLON_REPLACEMENT: char = '-';

/// Character written in place of a path separator
pub const SEPARATOR_REPLACEMENT: char = ' ';

/// A tag value rewritten to be usable as a single directory segment.
///
/// Never contains a colon or a path separator for the current platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SafeName(String);

impl SafeName {
    /// Sanitize an optional tag value.
    ///
    /// `None` stays `None`: an absent tag is not the same thing as an empty
    /// one and callers decide what absence means for them.
    #[must_use]
    pub fn from_tag(value: Option<&str>) -> Option<Self> {
        match value {
            Some(text) => Some(sanitize(text)),
            None => {
                tracing::debug!("no tag value to sanitize");
                None
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// True when the name is blank after trimming whitespace
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// True for `.` and `..`, which would not name a child directory
    #[must_use]
    pub fn is_traversal(&self) -> bool {
        matches!(self.0.as_str(), "." | "..")
    }

    /// Usable as a directory segment under a library root
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.is_blank() && !self.is_traversal()
    }
}

impl fmt::Display for SafeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for SafeName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

/// Replace colons with `-` and path separators with a space.
///
/// Every other character is kept as-is, so the result has the same number of
/// characters as the input.
#[must_use]
pub fn sanitize(text: &str) -> SafeName {
    let cleaned = text
        .chars()
        .map(|c| {
            if c == ':' {
                COLON_REPLACEMENT
            } else if is_separator(c) {
                SEPARATOR_REPLACEMENT
            } else {
                c
            }
        })
        .collect();
    SafeName(cleaned)
}
