//! Locations inside a configuration record's shape.
//!
//! A [`Path`] is an ordered list of segments: field names for records, and
//! decimal indices or key strings for arrays, sequences and maps. Paths are
//! never extended in place; [`Path::child`] returns a fresh value so sibling
//! branches of a recursive walk cannot observe each other's segments.

use std::fmt;
use std::ops::Range;

/// Ordered sequence of segments identifying a location in a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The empty path, addressing the root record.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Builds a path from any sequence of segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_env::Path;
    ///
    /// let path = Path::from_segments(["Config", "0", "name"]);
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(path.to_string(), "Config.0.name");
    /// ```
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a new path with `segment` appended. The receiver is untouched.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Self { segments }
    }

    /// Borrow the segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The leading segment, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Number of segments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `prefix`'s segments are a prefix of this path's segments.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Removes `prefix` from the front of this path.
    ///
    /// Returns `None` when the paths are not prefix-related.
    ///
    /// # Examples
    ///
    /// ```
    /// use ortho_env::Path;
    ///
    /// let path = Path::from_segments(["Config", "0", "foo", "StringValue"]);
    /// let prefix = Path::from_segments(["Config", "0", "foo"]);
    /// assert_eq!(
    ///     path.strip_prefix(&prefix),
    ///     Some(Path::from_segments(["StringValue"]))
    /// );
    /// assert_eq!(prefix.strip_prefix(&path), None);
    /// ```
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        self.segments
            .strip_prefix(prefix.segments.as_slice())
            .map(|rest| Self {
                segments: rest.to_vec(),
            })
    }

    /// Copies the segments in `range`, clamped to the path's length.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.segments.len());
        let start = range.start.min(end);
        Self {
            segments: self.segments.get(start..end).unwrap_or_default().to_vec(),
        }
    }

    /// Iterate over the segments.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.segments.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
