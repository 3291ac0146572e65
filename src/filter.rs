use std::path::Path;

use regex::Regex;

use crate::content_id::ContentId;
use crate::error::CheckError;

/// Drops ids matching user-supplied exclusion patterns before lookup.
///
/// A pattern matches the whole canonical string form of an id; `*` stands for
/// any run of characters, everything else is literal. With no patterns the
/// filter keeps everything.
#[derive(Debug, Default)]
pub struct ExclusionFilter {
    patterns: Vec<Regex>,
}

impl ExclusionFilter {
    /// Build from pattern text, one pattern per line; blank and `#` lines are ignored.
    pub fn from_patterns(text: &str) -> Self {
        let patterns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|pattern| {
                let compiled = compile(pattern);
                if compiled.is_none() {
                    tracing::warn!(pattern = %pattern, "ignoring unusable exclusion pattern");
                }
                compiled
            })
            .collect();
        ExclusionFilter { patterns }
    }

    pub fn from_file(path: &Path) -> Result<Self, CheckError> {
        if !path.exists() {
            return Err(CheckError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_patterns(&text))
    }

    /// `true` unless the id's string form matches an exclusion.
    ///
    /// Invalid ids are kept even when a pattern matches their raw text, so
    /// every unparseable entry reaches the report.
    pub fn keep(&self, id: &ContentId) -> bool {
        if !id.is_valid() {
            return true;
        }
        let key = id.to_string();
        !self.patterns.iter().any(|p| p.is_match(&key))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn id(raw: &str) -> ContentId {
        ContentId::parse(raw)
    }

    #[test]
    fn test_no_patterns_keeps_everything() {
        let filter = ExclusionFilter::default();
        assert!(filter.keep(&id("npm/npmjs/-/left-pad/1.3.0")));
    }

    #[test]
    fn test_exact_pattern() {
        let filter = ExclusionFilter::from_patterns("npm/npmjs/-/left-pad/1.3.0\n");
        assert!(!filter.keep(&id("npm/npmjs/-/left-pad/1.3.0")));
        assert!(filter.keep(&id("npm/npmjs/-/left-pad/1.3.1")));
    }

    #[test]
    fn test_wildcard_pattern() {
        let filter = ExclusionFilter::from_patterns("# ours\nnpm/npmjs/-/left-pad/*\n");
        assert!(!filter.keep(&id("npm/npmjs/-/left-pad/1.3.0")));
        assert!(!filter.keep(&id("npm/npmjs/-/left-pad/0.0.1")));
        assert!(filter.keep(&id("npm/npmjs/-/left-pad-extra/1.0.0")));
    }

    #[test]
    fn test_pattern_is_literal_outside_star() {
        let filter = ExclusionFilter::from_patterns("maven/mavencentral/org.eclipse.*/*/*");
        assert!(!filter.keep(&id("maven/mavencentral/org.eclipse.jetty/jetty-server/9.4.31")));
        assert!(filter.keep(&id("maven/mavencentral/orgXeclipse/x/1")));
    }

    #[test]
    fn test_matches_encoded_form() {
        let filter = ExclusionFilter::from_patterns("go/golang/github.com%2Fmyorg/*");
        assert!(!filter.keep(&id("go/golang/github.com%2Fmyorg/tool/v1.0.0")));
    }

    #[test]
    fn test_invalid_ids_kept() {
        let filter = ExclusionFilter::from_patterns("*");
        assert!(!filter.keep(&id("npm/npmjs/-/a/1")));
        assert!(filter.keep(&ContentId::invalid("garbage")));
    }

    #[test]
    fn test_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "npm/npmjs/-/left-pad/*").unwrap();
        let filter = ExclusionFilter::from_file(f.path()).unwrap();
        assert!(!filter.is_empty());
        assert!(!filter.keep(&id("npm/npmjs/-/left-pad/1.3.0")));
    }
}
