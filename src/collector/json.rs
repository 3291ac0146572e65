use std::io::Write;

use anyhow::{Context, Result};

use super::ResultsCollector;
use crate::models::LicenseData;

/// Buffers every result and writes them as one pretty JSON array on close.
pub struct JsonCollector<W: Write> {
    out: W,
    results: Vec<LicenseData>,
}

impl JsonCollector<std::io::Stdout> {
    pub fn stdout() -> Self {
        JsonCollector::new(std::io::stdout())
    }
}

impl<W: Write> JsonCollector<W> {
    pub fn new(out: W) -> Self {
        JsonCollector {
            out,
            results: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultsCollector for JsonCollector<W> {
    fn accept(&mut self, data: &LicenseData) {
        self.results.push(data.clone());
    }

    fn close(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &self.results).context("failed to write JSON report")?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
