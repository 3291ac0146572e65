use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::ResultsCollector;
use crate::models::{LicenseData, Provenance};

/// Writes `id,license,status,authority` rows as results arrive.
pub struct CsvCollector<W: Write> {
    out: W,
    header_written: bool,
    failed: Option<std::io::Error>,
}

impl CsvCollector<Box<dyn Write>> {
    /// Open the summary destination; `-` is stdout.
    pub fn create(path: &Path) -> Result<Self> {
        let out: Box<dyn Write> = if path == Path::new("-") {
            Box::new(std::io::stdout())
        } else {
            let file = File::create(path)
                .with_context(|| format!("cannot create summary file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        };
        Ok(CsvCollector::new(out))
    }
}

impl<W: Write> CsvCollector<W> {
    pub fn new(out: W) -> Self {
        CsvCollector {
            out,
            header_written: false,
            failed: None,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_row(&mut self, fields: &[&str]) -> std::io::Result<()> {
        let row: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        writeln!(self.out, "{}", row.join(","))
    }
}

impl<W: Write> ResultsCollector for CsvCollector<W> {
    fn accept(&mut self, data: &LicenseData) {
        if self.failed.is_some() {
            return;
        }

        let authority = match &data.provenance {
            Provenance::Authoritative { authority } => authority.as_deref().unwrap_or(""),
            Provenance::Declared => "declared",
            Provenance::Unresolved => "",
        };
        let id = data.id.to_string();
        let status = data.status.to_string();

        let mut result = Ok(());
        if !self.header_written {
            result = self.write_row(&["id", "license", "status", "authority"]);
            self.header_written = true;
        }
        if result.is_ok() {
            result = self.write_row(&[
                id.as_str(),
                data.license.as_deref().unwrap_or(""),
                status.as_str(),
                authority,
            ]);
        }
        if let Err(e) = result {
            self.failed = Some(e);
        }
    }

    fn close(&mut self) -> Result<()> {
        if let Some(e) = self.failed.take() {
            return Err(e).context("failed to write summary");
        }
        if !self.header_written {
            self.write_row(&["id", "license", "status", "authority"])?;
            self.header_written = true;
        }
        self.out.flush().context("failed to flush summary")
    }
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::tests::sample;

    #[test]
    fn test_rows() {
        let mut collector = CsvCollector::new(Vec::new());
        for data in sample() {
            collector.accept(&data);
        }
        collector.close().unwrap();

        let text = String::from_utf8(collector.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "id,license,status,authority",
                "npm/npmjs/-/left-pad/1.3.0,WTFPL,approved,CQ1234",
                "maven/mavencentral/org.acme/evil/6.6.6,GPL-3.0,restricted,",
                "\"what, \"\"is\"\" this\",,needs review,",
            ]
        );
    }

    #[test]
    fn test_header_only_when_empty() {
        let mut collector = CsvCollector::new(Vec::new());
        collector.close().unwrap();
        assert_eq!(
            String::from_utf8(collector.into_inner()).unwrap(),
            "id,license,status,authority\n"
        );
    }

    #[test]
    fn test_create_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");
        let mut collector = CsvCollector::create(&path).unwrap();
        collector.accept(&sample()[0]);
        collector.close().unwrap();
        drop(collector);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("left-pad"));
    }
}
