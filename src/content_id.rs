//! Canonical dependency coordinates.
//!
//! A [`ContentId`] names one dependency as `type/source/namespace/name/version`,
//! e.g. `npm/npmjs/babel/code-frame/7.10.4` or
//! `go/golang/github.com%2Fspf13/cobra/v0.0.5`. Fields are stored decoded;
//! `/` and `%` inside a field are percent-encoded only in the string form.
//!
//! Construction never fails: anything that cannot form a valid coordinate
//! becomes [`ContentId::Invalid`] carrying the offending text.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder used for coordinates without a namespace.
pub const EMPTY_NAMESPACE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    /// Ecosystem, e.g. `npm`, `maven`, `go`.
    pub kind: String,
    /// Registry, e.g. `npmjs`, `mavencentral`, `golang`.
    pub source: String,
    pub namespace: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentId {
    Valid(Coordinate),
    /// Text that could not be turned into a coordinate. Never looked up.
    Invalid(String),
}

impl ContentId {
    /// Build an id from its parts. An empty namespace becomes [`EMPTY_NAMESPACE`];
    /// a missing version or an unusable field yields [`ContentId::Invalid`].
    pub fn new(
        kind: &str,
        source: &str,
        namespace: &str,
        name: &str,
        version: Option<&str>,
    ) -> Self {
        let namespace = if namespace.is_empty() {
            EMPTY_NAMESPACE
        } else {
            namespace
        };

        let Some(version) = version else {
            return ContentId::Invalid(format!("{kind}/{source}/{namespace}/{name}"));
        };

        let fields = [kind, source, namespace, name, version];
        if !fields.iter().all(|f| is_valid_field(f)) {
            return ContentId::Invalid(fields.join("/"));
        }

        ContentId::Valid(Coordinate {
            kind: kind.to_string(),
            source: source.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    pub fn invalid(raw: impl Into<String>) -> Self {
        ContentId::Invalid(raw.into())
    }

    /// Parse the canonical `type/source/namespace/name/version` form.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() != 5 {
            return ContentId::invalid(trimmed);
        }

        let decoded: Option<Vec<String>> = segments.iter().map(|s| decode(s)).collect();
        let Some(d) = decoded else {
            return ContentId::invalid(trimmed);
        };

        match ContentId::new(&d[0], &d[1], &d[2], &d[3], Some(&d[4])) {
            ContentId::Invalid(_) => ContentId::invalid(trimmed),
            valid => valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ContentId::Valid(_))
    }

    #[cfg(test)]
    pub fn coordinate(&self) -> Option<&Coordinate> {
        match self {
            ContentId::Valid(c) => Some(c),
            ContentId::Invalid(_) => None,
        }
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentId::Valid(c) => write!(
                f,
                "{}/{}/{}/{}/{}",
                encode(&c.kind),
                encode(&c.source),
                encode(&c.namespace),
                encode(&c.name),
                encode(&c.version)
            ),
            ContentId::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ContentId::parse(&raw))
    }
}

fn is_valid_field(field: &str) -> bool {
    !field.is_empty() && !field.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn encode(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            other => out.push(other),
        }
    }
    out
}

/// Percent-decode one segment. `None` on a truncated or non-hex escape, or
/// when the decoded bytes are not UTF-8.
fn decode(segment: &str) -> Option<String> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = segment.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_display_encodes_path_namespace() {
        let id = ContentId::new("go", "golang", "github.com/spf13", "cobra", Some("v0.0.5"));
        assert_eq!(id.to_string(), "go/golang/github.com%2Fspf13/cobra/v0.0.5");
    }

    #[test]
    fn test_empty_namespace_uses_placeholder() {
        let id = ContentId::new("npm", "npmjs", "", "left-pad", Some("1.3.0"));
        assert_eq!(id.to_string(), "npm/npmjs/-/left-pad/1.3.0");
        assert_eq!(id.coordinate().unwrap().namespace, "-");
    }

    #[test]
    fn test_missing_version_is_invalid() {
        let id = ContentId::new("npm", "npmjs", "-", "left-pad", None);
        assert!(!id.is_valid());
        assert_eq!(id.to_string(), "npm/npmjs/-/left-pad");
    }

    #[test]
    fn test_whitespace_in_field_is_invalid() {
        let id = ContentId::new("maven", "mavencentral", "org.example", "bad name", Some("1.0"));
        assert_eq!(id, ContentId::Invalid("maven/mavencentral/org.example/bad name/1.0".into()));
    }

    #[test]
    fn test_parse_decodes_segments() {
        let id = ContentId::parse("go/golang/golang.org%2Fx/tools/v0.1.0");
        let c = id.coordinate().unwrap();
        assert_eq!(c.namespace, "golang.org/x");
        assert_eq!(c.name, "tools");
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert_eq!(
            ContentId::parse("org.apache:commons-lang3:3.12.0"),
            ContentId::Invalid("org.apache:commons-lang3:3.12.0".into())
        );
        assert!(!ContentId::parse("npm/npmjs/-/a/b/c").is_valid());
        assert!(!ContentId::parse("npm/npmjs/-/a%2").is_valid());
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        let a = ContentId::parse("npm/npmjs/-/React/18.0.0");
        let b = ContentId::parse("npm/npmjs/-/react/18.0.0");
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde_as_string() {
        let id = ContentId::parse("maven/mavencentral/junit/junit/4.13.2");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"maven/mavencentral/junit/junit/4.13.2\"");
        let back: ContentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    proptest! {
        #[test]
        fn prop_parse_inverts_display(
            kind in "[a-z0-9]{1,6}",
            source in "[a-z0-9]{1,8}",
            namespace in "[A-Za-z0-9._@%/-]{1,16}",
            name in "[A-Za-z0-9._%/~+-]{1,16}",
            version in "[A-Za-z0-9.+%/-]{1,12}",
        ) {
            let id = ContentId::new(&kind, &source, &namespace, &name, Some(&version));
            prop_assert!(id.is_valid());
            prop_assert_eq!(ContentId::parse(&id.to_string()), id);
        }
    }
}
