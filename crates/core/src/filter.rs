//! Source filter patterns and ordered include/exclude evaluation
//!
//! A filter is an ordered list of `+<glob>` / `-<glob>` patterns. The build
//! set starts empty; an include pattern adds matching files, an exclude
//! pattern removes them, and later patterns refine earlier ones.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A single include or exclude rule in a source filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SrcPattern {
    /// Add files matching the glob to the build set
    Include(String),
    /// Remove files matching the glob from the build set
    Exclude(String),
}

impl SrcPattern {
    /// Create an include pattern
    pub fn include(glob: impl Into<String>) -> Self {
        Self::Include(glob.into())
    }

    /// Create an exclude pattern
    pub fn exclude(glob: impl Into<String>) -> Self {
        Self::Exclude(glob.into())
    }

    /// The glob this pattern applies
    pub fn glob(&self) -> &str {
        match self {
            Self::Include(glob) | Self::Exclude(glob) => glob,
        }
    }

    /// Whether this pattern adds files to the build set
    pub fn is_include(&self) -> bool {
        matches!(self, Self::Include(_))
    }

    /// Check whether a path (relative to the source root, `/`-separated)
    /// matches this pattern's glob
    pub fn matches(&self, path: &str) -> bool {
        glob_match(self.glob(), path)
    }
}

impl fmt::Display for SrcPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include(glob) => write!(f, "+<{}>", glob),
            Self::Exclude(glob) => write!(f, "-<{}>", glob),
        }
    }
}

impl FromStr for SrcPattern {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (include, rest) = match s.as_bytes().first() {
            Some(b'+') => (true, &s[1..]),
            Some(b'-') => (false, &s[1..]),
            _ => return Err(CoreError::InvalidPattern(s.to_string())),
        };

        let glob = rest
            .strip_prefix('<')
            .and_then(|r| r.strip_suffix('>'))
            .ok_or_else(|| CoreError::InvalidPattern(s.to_string()))?;

        if glob.is_empty() {
            return Err(CoreError::InvalidPattern(s.to_string()));
        }

        Ok(if include {
            Self::Include(glob.to_string())
        } else {
            Self::Exclude(glob.to_string())
        })
    }
}

// Patterns serialize as their textual form so a filter round-trips as a
// plain list of strings.
impl Serialize for SrcPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SrcPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// An ordered list of include/exclude patterns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SrcFilter {
    /// Patterns in application order
    pub patterns: Vec<SrcPattern>,
}

impl SrcFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Parse a filter from textual patterns, preserving order
    pub fn parse<I, S>(patterns: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Append a pattern
    pub fn push(&mut self, pattern: SrcPattern) {
        self.patterns.push(pattern);
    }

    /// Number of patterns in the filter
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the filter has no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate over the patterns in application order
    pub fn iter(&self) -> impl Iterator<Item = &SrcPattern> {
        self.patterns.iter()
    }

    /// Decide whether a path enters the build set.
    ///
    /// Patterns apply in order, so the last matching pattern wins. A path
    /// no pattern matches stays excluded.
    pub fn matches(&self, path: &str) -> bool {
        let mut included = false;
        for pattern in &self.patterns {
            if pattern.matches(path) {
                included = pattern.is_include();
            }
        }
        included
    }
}

impl fmt::Display for SrcFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pattern) in self.patterns.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", pattern)?;
        }
        Ok(())
    }
}

/// fnmatch-style glob matching: `*` matches any run of characters
/// (including `/`), `?` matches one character, `[abc]` / `[a-z]` /
/// `[!abc]` match character sets. An unterminated `[` is a literal.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    match_from(&pattern, &text)
}

fn match_from(pattern: &[char], text: &[char]) -> bool {
    match pattern.first() {
        None => text.is_empty(),
        Some('*') => (0..=text.len()).any(|i| match_from(&pattern[1..], &text[i..])),
        Some('?') => !text.is_empty() && match_from(&pattern[1..], &text[1..]),
        Some('[') => match parse_class(&pattern[1..]) {
            Some((negated, set, rest)) => match text.first() {
                Some(&c) if class_contains(set, c) != negated => match_from(rest, &text[1..]),
                _ => false,
            },
            None => {
                !text.is_empty() && text[0] == '[' && match_from(&pattern[1..], &text[1..])
            }
        },
        Some(&c) => !text.is_empty() && text[0] == c && match_from(&pattern[1..], &text[1..]),
    }
}

/// Parse a character class after the opening `[`. Returns the negation
/// flag, the set body, and the pattern remainder after the closing `]`,
/// or `None` when the class is unterminated.
fn parse_class(pattern: &[char]) -> Option<(bool, &[char], &[char])> {
    let (negated, body) = match pattern.first() {
        Some('!') => (true, &pattern[1..]),
        _ => (false, pattern),
    };

    // A `]` as the first member is literal
    let mut end = usize::from(body.first() == Some(&']'));
    while end < body.len() && body[end] != ']' {
        end += 1;
    }
    if end >= body.len() {
        return None;
    }
    Some((negated, &body[..end], &body[end + 1..]))
}

fn class_contains(set: &[char], c: char) -> bool {
    let mut i = 0;
    while i < set.len() {
        if i + 2 < set.len() && set[i + 1] == '-' {
            if set[i] <= c && c <= set[i + 2] {
                return true;
            }
            i += 3;
        } else {
            if set[i] == c {
                return true;
            }
            i += 1;
        }
    }
    false
}
