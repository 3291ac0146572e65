//! Manifest readers.
//!
//! Every reader turns the raw text of one manifest into an ordered list of
//! [`ContentId`]s. Readers are total: an entry that cannot be understood
//! becomes [`ContentId::Invalid`] instead of failing the whole file. The only
//! exception is `go.sum`, whose malformed lines are skipped.
//!
//! The supported formats form a closed set, [`ManifestKind`], selected from the
//! file name.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::content_id::ContentId;
use crate::error::CheckError;

pub mod flat;
pub mod go_sum;
pub mod maven;
pub mod npm;
pub mod pom;
pub mod yarn;

/// What a reader recovered from one manifest.
#[derive(Debug, Default, PartialEq)]
pub struct Manifest {
    /// Ids in input order, duplicates preserved.
    pub ids: Vec<ContentId>,
    /// Licenses the manifest itself declares for some entries.
    pub declared: HashMap<ContentId, String>,
}

impl Manifest {
    pub fn from_ids(ids: Vec<ContentId>) -> Self {
        Manifest {
            ids,
            declared: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// One coordinate per line.
    Flat,
    /// `package-lock.json` / `npm-shrinkwrap.json`.
    PackageLock,
    YarnLock,
    GoSum,
    /// `mvn dependency:list` output.
    MavenList,
    Pom,
}

impl ManifestKind {
    /// Pick the reader for a file from its name; `-` and unknown names are flat lists.
    pub fn for_path(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("package-lock.json") | Some("npm-shrinkwrap.json") => ManifestKind::PackageLock,
            Some("yarn.lock") => ManifestKind::YarnLock,
            Some("go.sum") => ManifestKind::GoSum,
            Some("pom.xml") => ManifestKind::Pom,
            Some("dependencies.txt") | Some("dependency-list.txt") => ManifestKind::MavenList,
            _ => ManifestKind::Flat,
        }
    }

    pub fn read(self, input: &str) -> Manifest {
        match self {
            ManifestKind::Flat => Manifest::from_ids(flat::content_ids(input)),
            ManifestKind::PackageLock => npm::read(input),
            ManifestKind::YarnLock => Manifest::from_ids(yarn::content_ids(input)),
            ManifestKind::GoSum => Manifest::from_ids(go_sum::content_ids(input)),
            ManifestKind::MavenList => Manifest::from_ids(maven::content_ids(input)),
            ManifestKind::Pom => Manifest::from_ids(pom::content_ids(input)),
        }
    }

    #[cfg(test)]
    pub fn content_ids(self, input: &str) -> Vec<ContentId> {
        self.read(input).ids
    }
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestKind::Flat => write!(f, "flat list"),
            ManifestKind::PackageLock => write!(f, "package-lock.json"),
            ManifestKind::YarnLock => write!(f, "yarn.lock"),
            ManifestKind::GoSum => write!(f, "go.sum"),
            ManifestKind::MavenList => write!(f, "maven dependency list"),
            ManifestKind::Pom => write!(f, "pom.xml"),
        }
    }
}

/// Read a manifest from a path (`-` means stdin).
///
/// `kind` overrides file-name based selection. A missing file is an error;
/// everything past that point degrades per entry.
pub fn read_manifest(name: &str, kind: Option<ManifestKind>) -> Result<Manifest, CheckError> {
    let path = Path::new(name);
    let kind = kind.unwrap_or_else(|| ManifestKind::for_path(path));

    let content = if name == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CheckError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        if !path.exists() {
            return Err(CheckError::NotFound {
                path: path.to_path_buf(),
            });
        }
        std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };

    tracing::debug!(file = %name, format = %kind, "reading manifest");
    Ok(kind.read(&content))
}

/// Lines that carry content: not blank and not `#` comments.
pub(crate) fn entry_lines(input: &str) -> impl Iterator<Item = &str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}
