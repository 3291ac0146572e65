use crate::content_id::ContentId;

const SCOPES: [&str; 6] = ["compile", "provided", "runtime", "test", "system", "import"];

/// Parse a Maven coordinate as printed by `mvn dependency:list`.
///
/// Accepted shapes:
/// - `groupId:artifactId:version`
/// - `groupId:artifactId:version:scope`
/// - `groupId:artifactId:packaging:version[:scope]`
/// - `groupId:artifactId:packaging:classifier:version[:scope]`
///
/// A trailing part counts as a scope only when it is a known Maven scope.
/// Text after the first whitespace (`(optional)`, ` -- module foo`) is
/// ignored. `None` when the text has no recognisable shape.
pub fn parse_coordinate(raw: &str) -> Option<ContentId> {
    let token = raw.split_whitespace().next()?;
    let mut parts: Vec<&str> = token.split(':').collect();

    if parts.len() > 3 && parts.last().is_some_and(|p| SCOPES.contains(p)) {
        parts.pop();
    }

    let (group, artifact, version) = match parts[..] {
        [group, artifact, version] => (group, artifact, version),
        [group, artifact, _packaging, version] => (group, artifact, version),
        [group, artifact, _packaging, _classifier, version] => (group, artifact, version),
        _ => return None,
    };

    Some(ContentId::new(
        "maven",
        "mavencentral",
        group,
        artifact,
        Some(version).filter(|v| !v.is_empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_part() {
        let id = parse_coordinate("org.apache.commons:commons-lang3:3.12.0").unwrap();
        assert_eq!(id.to_string(), "maven/mavencentral/org.apache.commons/commons-lang3/3.12.0");
    }

    #[test]
    fn test_scope_discarded() {
        let id = parse_coordinate("junit:junit:4.13.2:test").unwrap();
        assert_eq!(id.to_string(), "maven/mavencentral/junit/junit/4.13.2");
    }

    #[test]
    fn test_packaging_and_scope() {
        let id = parse_coordinate("org.eclipse.jetty:jetty-server:jar:9.4.31.v20200723:compile").unwrap();
        assert_eq!(
            id.to_string(),
            "maven/mavencentral/org.eclipse.jetty/jetty-server/9.4.31.v20200723"
        );
    }

    #[test]
    fn test_packaging_without_scope() {
        let id = parse_coordinate("com.google.guava:guava:jar:31.1-jre").unwrap();
        assert_eq!(id.to_string(), "maven/mavencentral/com.google.guava/guava/31.1-jre");
    }

    #[test]
    fn test_classifier() {
        let id = parse_coordinate("io.netty:netty-transport-native-epoll:jar:linux-x86_64:4.1.86.Final:runtime")
            .unwrap();
        assert_eq!(
            id.to_string(),
            "maven/mavencentral/io.netty/netty-transport-native-epoll/4.1.86.Final"
        );
    }

    #[test]
    fn test_trailing_annotations_ignored() {
        let id = parse_coordinate("org.slf4j:slf4j-api:jar:2.0.9:compile -- module org.slf4j").unwrap();
        assert_eq!(id.to_string(), "maven/mavencentral/org.slf4j/slf4j-api/2.0.9");
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(parse_coordinate("junit:junit"), None);
        assert_eq!(parse_coordinate("a:b:c:d:e:f:g"), None);
        assert_eq!(parse_coordinate(""), None);
    }

    #[test]
    fn test_empty_part_is_invalid() {
        let id = parse_coordinate("junit::4.13.2").unwrap();
        assert!(!id.is_valid());
    }
}
