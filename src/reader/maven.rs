use crate::content_id::ContentId;
use crate::parser::maven;

const LOG_PREFIXES: [&str; 3] = ["[INFO]", "[WARNING]", "[DEBUG]"];

/// Read `mvn dependency:list` output, raw or already filtered.
///
/// Log prefixes are stripped. A line is an entry when its first token contains
/// `:`; everything else is Maven chatter ("The following files have been
/// resolved:", "none") and skipped. Entries of the wrong shape become
/// [`ContentId::Invalid`].
pub fn content_ids(input: &str) -> Vec<ContentId> {
    super::entry_lines(input)
        .map(strip_log_prefix)
        .filter(|line| {
            line.split_whitespace()
                .next()
                .is_some_and(|token| token.contains(':'))
        })
        .map(|line| maven::parse_coordinate(line).unwrap_or_else(|| ContentId::invalid(line)))
        .collect()
}

fn strip_log_prefix(line: &str) -> &str {
    LOG_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .unwrap_or(line)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_mvn_output() {
        let input = "\
[INFO] Scanning for projects...
[INFO]
[INFO] The following files have been resolved:
[INFO]    org.eclipse.jetty:jetty-server:jar:9.4.31.v20200723:compile
[INFO]    junit:junit:jar:4.13.2:test
[INFO]    org.hamcrest:hamcrest-core:jar:1.3:test -- module hamcrest.core (auto)
[INFO] BUILD SUCCESS
";
        let ids: Vec<String> = content_ids(input).iter().map(ToString::to_string).collect();
        assert_eq!(
            ids,
            vec![
                "maven/mavencentral/org.eclipse.jetty/jetty-server/9.4.31.v20200723",
                "maven/mavencentral/junit/junit/4.13.2",
                "maven/mavencentral/org.hamcrest/hamcrest-core/1.3",
            ]
        );
    }

    #[test]
    fn test_filtered_tuples() {
        let ids = content_ids("commons-io:commons-io:2.11.0:compile\n");
        assert_eq!(ids[0].to_string(), "maven/mavencentral/commons-io/commons-io/2.11.0");
    }

    #[test]
    fn test_bad_arity_is_invalid() {
        let ids = content_ids("junit:junit\n");
        assert_eq!(ids, vec![ContentId::Invalid("junit:junit".into())]);
    }
}
