//! Sinks for classified results.
//!
//! - [`console`]: colored summary and tables of entries needing attention.
//! - [`csv`]: one row per dependency, for `--summary`.
//! - [`json`]: the full result set, for `--report json`.
//!
//! The process exit status is computed from the results ([`ExitStatus`]), not
//! read back from a collector.

pub mod console;
pub mod csv;
pub mod json;

use anyhow::Result;

use crate::models::{LicenseData, Status};

pub trait ResultsCollector {
    fn accept(&mut self, data: &LicenseData);

    /// Flush whatever was collected.
    fn close(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every dependency is approved.
    Clear,
    /// At least one dependency is restricted or needs review.
    NeedsAttention,
}

impl ExitStatus {
    pub fn from_results(results: &[LicenseData]) -> Self {
        if results.iter().all(|d| d.status == Status::Approved) {
            ExitStatus::Clear
        } else {
            ExitStatus::NeedsAttention
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Clear => 0,
            ExitStatus::NeedsAttention => 1,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content_id::ContentId;
    use crate::models::Provenance;

    pub(crate) fn sample() -> Vec<LicenseData> {
        vec![
            LicenseData::resolved(
                ContentId::parse("npm/npmjs/-/left-pad/1.3.0"),
                Some("WTFPL".into()),
                Status::Approved,
                Provenance::Authoritative {
                    authority: Some("CQ1234".into()),
                },
            ),
            LicenseData::resolved(
                ContentId::parse("maven/mavencentral/org.acme/evil/6.6.6"),
                Some("GPL-3.0".into()),
                Status::Restricted,
                Provenance::Authoritative { authority: None },
            ),
            LicenseData::needs_review(ContentId::invalid("what, \"is\" this"), None, Provenance::Unresolved),
        ]
    }

    #[test]
    fn test_exit_status_all_approved() {
        let results = vec![sample().remove(0)];
        assert_eq!(ExitStatus::from_results(&results), ExitStatus::Clear);
        assert_eq!(ExitStatus::from_results(&results).code(), 0);
    }

    #[test]
    fn test_exit_status_needs_attention() {
        assert_eq!(ExitStatus::from_results(&sample()).code(), 1);
    }

    #[test]
    fn test_exit_status_empty_is_clear() {
        assert_eq!(ExitStatus::from_results(&[]), ExitStatus::Clear);
    }
}
