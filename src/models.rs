use serde::Serialize;

use crate::content_id::ContentId;

/// Resolved license disposition for one dependency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseData {
    pub id: ContentId,
    /// License expression, when one is known.
    pub license: Option<String>,
    pub status: Status,
    pub provenance: Provenance,
    pub risk: LicenseRisk,
}

impl LicenseData {
    /// An entry nobody could vouch for.
    pub fn needs_review(id: ContentId, license: Option<String>, provenance: Provenance) -> Self {
        Self::resolved(id, license, Status::NeedsReview, provenance)
    }

    pub fn resolved(
        id: ContentId,
        license: Option<String>,
        status: Status,
        provenance: Provenance,
    ) -> Self {
        let risk = risk_of(license.as_deref());
        LicenseData {
            id,
            license,
            status,
            provenance,
            risk,
        }
    }
}

fn risk_of(license: Option<&str>) -> LicenseRisk {
    crate::license::classifier::classify(license.unwrap_or("unknown"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Approved,
    Restricted,
    NeedsReview,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Approved => write!(f, "approved"),
            Status::Restricted => write!(f, "restricted"),
            Status::NeedsReview => write!(f, "needs review"),
        }
    }
}

/// Where a license answer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// The clearance service vouched for the entry.
    Authoritative { authority: Option<String> },
    /// The manifest declared a license and local policy judged it.
    Declared,
    Unresolved,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Authoritative {
                authority: Some(authority),
            } => write!(f, "{}", authority),
            Provenance::Authoritative { authority: None } => write!(f, "clearance"),
            Provenance::Declared => write!(f, "declared"),
            Provenance::Unresolved => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LicenseRisk {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Proprietary,
    Unknown,
}

impl std::fmt::Display for LicenseRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseRisk::Permissive => write!(f, "Permissive"),
            LicenseRisk::WeakCopyleft => write!(f, "Weak Copyleft"),
            LicenseRisk::StrongCopyleft => write!(f, "Strong Copyleft"),
            LicenseRisk::Proprietary => write!(f, "Proprietary"),
            LicenseRisk::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Outcome of evaluating a license expression against the local policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolicyVerdict {
    Pass,
    Warn,
    Error,
}
