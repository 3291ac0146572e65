use std::sync::LazyLock;

use regex::Regex;

use crate::content_id::{ContentId, EMPTY_NAMESPACE};

static MODULE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~-]+(?:/[A-Za-z0-9._~-]+)*$").expect("static regex"));

/// Extract a Go module id from one `go.sum` line:
/// `modulePath version[/go.mod] hash`.
///
/// The module path splits at its last `/` into namespace and name, e.g.
/// `github.com/spf13/cobra` becomes namespace `github.com/spf13` and name
/// `cobra`; a path without `/` gets the empty-namespace placeholder.
/// `None` when the line is not a checksum line.
pub fn parse_line(line: &str) -> Option<ContentId> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [module, version, _hash] = tokens[..] else {
        return None;
    };

    if !MODULE_PATH.is_match(module) {
        return None;
    }

    let version = version.strip_suffix("/go.mod").unwrap_or(version);
    let version = version.strip_suffix("+incompatible").unwrap_or(version);
    if !version.starts_with('v') || version.len() < 2 {
        return None;
    }

    let (namespace, name) = match module.rsplit_once('/') {
        Some((namespace, name)) => (namespace, name),
        None => (EMPTY_NAMESPACE, module),
    };

    let host = module.split('/').next().unwrap_or(module);
    if !host.contains('.') {
        tracing::warn!(module = %module, "module path does not start with a domain; check this id manually");
    }

    match ContentId::new("go", "golang", namespace, name, Some(version)) {
        ContentId::Invalid(_) => None,
        id => Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> String {
        parse_line(line).unwrap().to_string()
    }

    #[test]
    fn test_path_and_module() {
        assert_eq!(
            parsed("github.com/spf13/cobra v0.0.5 h1:f0B+LkLX6DtmRH1isoNA9VTtNUK9K8xYd28JNNfOv/s="),
            "go/golang/github.com%2Fspf13/cobra/v0.0.5"
        );
        assert_eq!(
            parsed("golang.org/x/tools v0.0.0-20180221164845-07fd8470d635/go.mod h1:n7NCudcB/nEzxVGmLbDWY5pfWTLqBcC2KZ6jyYvM4mQ="),
            "go/golang/golang.org%2Fx/tools/v0.0.0-20180221164845-07fd8470d635"
        );
        assert_eq!(
            parsed("gopkg.in/alecthomas/kingpin.v2 v2.2.6/go.mod h1:FMv+mEhP44yOT+4EoQTLFTRgOQ1FBLkstjWtayDeSgw="),
            "go/golang/gopkg.in%2Falecthomas/kingpin.v2/v2.2.6"
        );
    }

    #[test]
    fn test_domain_only_namespace() {
        assert_eq!(
            parsed("google.golang.org/genproto v0.0.0-20190418145605-e7d98fc518a7/go.mod h1:VzzqZJRnGkLBvHegQrXjBqPurQTc5/KpmUdxsrq26oE="),
            "go/golang/google.golang.org/genproto/v0.0.0-20190418145605-e7d98fc518a7"
        );
        assert_eq!(
            parsed("go.uber.org/zap v1.10.0/go.mod h1:vwi/ZaCAaUcBkycHslxD9B2zi4UTXhF60s6SWpuDF0Q="),
            "go/golang/go.uber.org/zap/v1.10.0"
        );
    }

    #[test]
    fn test_no_path() {
        assert_eq!(
            parsed("go.opencensus.io v0.21.0/go.mod h1:mSImk1erAIZhrmZN+AvHh14ztQfjbGwt4TtuofqLduU="),
            "go/golang/-/go.opencensus.io/v0.21.0"
        );
    }

    #[test]
    fn test_incompatible_marker_stripped() {
        assert_eq!(
            parsed("github.com/docker/docker v17.12.0-ce-rc1.0.20200309214505-aa6a9891b09c+incompatible h1:abc="),
            "go/golang/github.com%2Fdocker/docker/v17.12.0-ce-rc1.0.20200309214505-aa6a9891b09c"
        );
    }

    #[test]
    fn test_fails() {
        assert_eq!(parse_line("groupid:artifactid:v1.0"), None);
        assert_eq!(parse_line("groupid:artifactid 1.0"), None);
        assert_eq!(parse_line("github.com/spf13/cobra 0.0.5 h1:xyz="), None);
        assert_eq!(parse_line("github.com/spf13/cobra v0.0.5"), None);
        assert_eq!(parse_line(""), None);
    }
}
