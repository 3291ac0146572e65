//! `yarn.lock` (v1) reader.
//!
//! The format looks like YAML but is not, and has no published grammar:
//!
//! ```text
//! # yarn lockfile v1
//!
//! "@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
//!   version "7.10.4"
//!   resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.10.4.tgz#168d..."
//!   dependencies:
//!     "@babel/highlight" "^7.10.4"
//! ```
//!
//! The file is first folded into a tree by indentation (two spaces per
//! level), then every top-level entry yields one id whose version comes from
//! its `version "..."` child.

use std::sync::LazyLock;

use regex::Regex;

use crate::content_id::ContentId;

static ENTRY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:@(?P<namespace>[\w-]+)/)?(?P<name>[\w.-]+)").expect("static regex")
});

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^version "(?P<version>[^"]+)"$"#).expect("static regex"));

pub fn content_ids(input: &str) -> Vec<ContentId> {
    read_tree(input).nested.iter().map(Record::content_id).collect()
}

/// One line of the file and the lines nested under it.
#[derive(Debug, Default)]
struct Record {
    value: String,
    nested: Vec<Record>,
}

impl Record {
    fn new(line: &str) -> Self {
        Record {
            value: line.trim().to_string(),
            nested: Vec::new(),
        }
    }

    /// Treat the record as a top-level entry and extract its id.
    fn content_id(&self) -> ContentId {
        let Some(caps) = ENTRY_NAME.captures(&self.value) else {
            return ContentId::invalid(self.value.as_str());
        };
        let namespace = caps.name("namespace").map_or("", |m| m.as_str());
        let name = &caps["name"];
        ContentId::new("npm", "npmjs", namespace, name, self.version())
    }

    /// The resolved version lives in an immediate child; the first match wins.
    fn version(&self) -> Option<&str> {
        self.nested.iter().find_map(|child| {
            VERSION
                .captures(&child.value)
                .and_then(|caps| caps.name("version"))
                .map(|m| m.as_str())
        })
    }
}

/// Fold the file into a tree.
///
/// The stack holds the chain of open records; its depth is the nesting level
/// of the record on top, the root sitting at depth 1. A line at `level`
/// closes every record deeper than it, then either opens a child of the top
/// (deeper line) or closes the top and opens a sibling (same level). A closed
/// record is moved into its parent, so the tree is complete once the stack
/// is unwound to the root.
fn read_tree(input: &str) -> Record {
    let mut stack: Vec<Record> = vec![Record::default()];

    let lines = input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.starts_with('#'));

    for line in lines {
        let level = 2 + nesting_of(line);

        while stack.len() > level {
            close_top(&mut stack);
        }

        if stack.len() == level {
            close_top(&mut stack);
        }
        stack.push(Record::new(line));
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().unwrap_or_default()
}

/// Pop the top record and attach it to its parent. The root is never popped.
fn close_top(stack: &mut Vec<Record>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(record) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.nested.push(record);
        }
    }
}

/// Every two leading spaces are one level of nesting.
fn nesting_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count() / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
  version "7.10.4"
  resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.10.4.tgz#168da1a36e90da68ae8d49c0f1b48c7c6249213a"
  integrity sha512-vG6SvB6oYEhvgisZNFRmRCUkLz11c7rp+tbNTynGqc6mS1d5ATd/sGyV6W0KZZnXRKMTzZDRgQT3Ou9jhpAfUg==
  dependencies:
    "@babel/highlight" "^7.10.4"
"#;

    #[test]
    fn test_scoped_entry() {
        let ids = content_ids(SAMPLE);
        assert_eq!(ids.len(), 1);
        let c = ids[0].coordinate().unwrap();
        assert_eq!(c.kind, "npm");
        assert_eq!(c.source, "npmjs");
        assert_eq!(c.namespace, "babel");
        assert_eq!(c.name, "code-frame");
        assert_eq!(c.version, "7.10.4");
    }

    #[test]
    fn test_multiple_entries() {
        let input = r#"
lodash@^4.17.19, lodash@^4.17.20:
  version "4.17.21"
  resolved "https://registry.yarnpkg.com/lodash/-/lodash-4.17.21.tgz"

"@types/node@*":
  version "14.14.6"

js-tokens@^4.0.0:
  version "4.0.0"
  dependencies:
    version "9.9.9"
"#;
        let ids: Vec<String> = content_ids(input).iter().map(ToString::to_string).collect();
        assert_eq!(
            ids,
            vec![
                "npm/npmjs/-/lodash/4.17.21",
                "npm/npmjs/types/node/14.14.6",
                "npm/npmjs/-/js-tokens/4.0.0",
            ]
        );
    }

    #[test]
    fn test_missing_version_is_invalid() {
        let ids = content_ids("left-pad@^1.0.0:\n  resolved \"https://example.org\"\n");
        assert_eq!(ids, vec![ContentId::Invalid("npm/npmjs/-/left-pad".into())]);
    }

    #[test]
    fn test_tree_shape() {
        let root = read_tree("a:\n  b\n    c\n  d\ne:\n");
        assert_eq!(root.nested.len(), 2);
        let a = &root.nested[0];
        assert_eq!(a.value, "a:");
        assert_eq!(a.nested.len(), 2);
        assert_eq!(a.nested[0].nested[0].value, "c");
        assert_eq!(a.nested[1].value, "d");
        assert_eq!(root.nested[1].value, "e:");
    }

    #[test]
    fn test_nesting_of() {
        assert_eq!(nesting_of("foo"), 0);
        assert_eq!(nesting_of("  foo"), 1);
        assert_eq!(nesting_of("     foo"), 2);
    }
}
