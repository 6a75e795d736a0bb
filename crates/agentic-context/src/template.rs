//! Resource URI templates: `scheme://literal/{placeholder}/...`.
//!
//! A pattern compiles into its scheme plus an ordered list of path segments.
//! Each segment is either a literal or a whole-segment named placeholder.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ContextError, ContextResult};

/// One path segment of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A compiled resource URI pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    scheme: String,
    segments: Vec<Segment>,
}

/// Split a URI into its scheme and `/`-separated path segments.
fn split_uri(uri: &str) -> Option<(&str, Vec<&str>)> {
    let (scheme, rest) = uri.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    Some((scheme, rest.split('/').collect()))
}

fn valid_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl UriTemplate {
    /// Compile a pattern, rejecting malformed or duplicate placeholders.
    pub fn parse(pattern: &str) -> ContextResult<Self> {
        let invalid = |problem: String| ContextError::invalid("resource pattern", pattern, problem);

        let (scheme, parts) = split_uri(pattern)
            .ok_or_else(|| invalid("expected scheme://path".to_string()))?;
        if scheme.contains('{') || scheme.contains('}') {
            return Err(invalid("placeholders are not allowed in the scheme".to_string()));
        }

        let mut segments = Vec::with_capacity(parts.len());
        let mut seen: Vec<&str> = Vec::new();

        for part in parts {
            let opens = part.matches('{').count();
            let closes = part.matches('}').count();

            if opens == 0 && closes == 0 {
                segments.push(Segment::Literal(part.to_string()));
                continue;
            }

            let name = part
                .strip_prefix('{')
                .and_then(|p| p.strip_suffix('}'))
                .filter(|_| opens == 1 && closes == 1)
                .ok_or_else(|| {
                    invalid(format!("segment '{part}' must be a literal or a whole {{name}}"))
                })?;

            if !valid_placeholder_name(name) {
                return Err(invalid(format!("invalid placeholder name '{name}'")));
            }
            if seen.contains(&name) {
                return Err(invalid(format!("duplicate placeholder '{name}'")));
            }
            seen.push(name);
            segments.push(Segment::Placeholder(name.to_string()));
        }

        Ok(Self {
            raw: pattern.to_string(),
            scheme: scheme.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the pattern has no placeholders.
    pub fn is_static(&self) -> bool {
        self.placeholder_count() == 0
    }

    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }

    /// Number of literal segments; higher means more specific.
    pub fn literal_count(&self) -> usize {
        self.segments.len() - self.placeholder_count()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Structural identity: same scheme and literal/placeholder layout,
    /// regardless of placeholder names.
    pub fn shape(&self) -> String {
        let path: Vec<&str> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(lit) => lit.as_str(),
                Segment::Placeholder(_) => "{}",
            })
            .collect();
        format!("{}://{}", self.scheme, path.join("/"))
    }

    /// Match a concrete URI, returning the percent-decoded captures.
    pub fn matches(&self, uri: &str) -> Option<BTreeMap<String, String>> {
        let (scheme, parts) = split_uri(uri)?;
        if scheme != self.scheme || parts.len() != self.segments.len() {
            return None;
        }

        let mut captures = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Placeholder(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    captures.insert(name.clone(), value);
                }
            }
        }
        Some(captures)
    }

    /// Fill placeholders from `values`, percent-encoding each value.
    pub fn expand(&self, values: &BTreeMap<String, String>) -> Option<String> {
        let mut path = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => path.push(lit.clone()),
                Segment::Placeholder(name) => {
                    let value = values.get(name)?;
                    path.push(urlencoding::encode(value).into_owned());
                }
            }
        }
        Some(format!("{}://{}", self.scheme, path.join("/")))
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
