use crate::content_id::ContentId;
use crate::parser::{golang, maven};

/// Read a flat list: one coordinate per line, `#` comments and blank lines
/// skipped.
///
/// Each line is tried as a canonical id (`npm/npmjs/-/left-pad/1.3.0`), then a
/// Maven coordinate (`groupId:artifactId:version`), then a `go.sum` line.
pub fn content_ids(input: &str) -> Vec<ContentId> {
    super::entry_lines(input).map(parse_entry).collect()
}

fn parse_entry(line: &str) -> ContentId {
    let canonical = ContentId::parse(line);
    if canonical.is_valid() {
        return canonical;
    }

    maven::parse_coordinate(line)
        .filter(ContentId::is_valid)
        .or_else(|| golang::parse_line(line))
        .unwrap_or_else(|| {
            tracing::debug!(line = %line, "unrecognised coordinate");
            ContentId::invalid(line)
        })
}
