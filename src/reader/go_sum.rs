use crate::content_id::ContentId;
use crate::parser::golang;

/// Read a `go.sum` file.
///
/// Lines that are not `modulePath version[/go.mod] hash` are skipped rather
/// than reported. A module usually appears twice (source and `go.mod`
/// checksums); both occurrences are kept.
pub fn content_ids(input: &str) -> Vec<ContentId> {
    super::entry_lines(input)
        .filter_map(|line| {
            let id = golang::parse_line(line);
            if id.is_none() {
                tracing::debug!(line = %line, "skipping go.sum line");
            }
            id
        })
        .collect()
}
