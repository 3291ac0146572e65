use crate::models::LicenseRisk;

/// Classify a single canonical SPDX identifier into a risk level.
pub fn classify_spdx_id(id: &str) -> LicenseRisk {
    // `GPL-2.0+` style suffixes carry the same risk as the base id.
    match id.trim().trim_end_matches('+') {
        "MIT" | "MIT-0" | "Apache-1.1" | "Apache-2.0" | "BSD-2-Clause" | "BSD-3-Clause"
        | "BSD-4-Clause" | "ISC" | "0BSD" | "Unlicense" | "Zlib" | "CC0-1.0" | "WTFPL"
        | "CC-BY-3.0" | "CC-BY-4.0" | "PSF-2.0" | "Python-2.0" | "BlueOak-1.0.0"
        | "Artistic-2.0" | "BSL-1.0" | "W3C" | "EDL-1.0" => LicenseRisk::Permissive,

        "LGPL-2.0" | "LGPL-2.0-only" | "LGPL-2.0-or-later" | "LGPL-2.1" | "LGPL-2.1-only"
        | "LGPL-2.1-or-later" | "LGPL-3.0" | "LGPL-3.0-only" | "LGPL-3.0-or-later"
        | "MPL-1.1" | "MPL-2.0" | "EUPL-1.2" | "CDDL-1.0" | "CDDL-1.1" | "EPL-1.0"
        | "EPL-2.0" | "APSL-2.0" | "OSL-3.0" => LicenseRisk::WeakCopyleft,

        "GPL-2.0" | "GPL-2.0-only" | "GPL-2.0-or-later" | "GPL-3.0" | "GPL-3.0-only"
        | "GPL-3.0-or-later" | "AGPL-3.0" | "AGPL-3.0-only" | "AGPL-3.0-or-later"
        | "EUPL-1.1" | "SSPL-1.0" => LicenseRisk::StrongCopyleft,

        _ => LicenseRisk::Unknown,
    }
}

/// Rewrite common non-SPDX license names to their SPDX ids.
///
/// Matching ignores ASCII case; anything unrecognised is returned trimmed.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let spdx = match trimmed.to_ascii_lowercase().as_str() {
        "apache 2.0" | "apache-2" | "apache license 2.0" | "apache license, version 2.0"
        | "the apache software license, version 2.0" => "Apache-2.0",
        "mit license" | "the mit license" => "MIT",
        "bsd" | "bsd license" | "bsd 3-clause" | "new bsd" | "modified bsd" => "BSD-3-Clause",
        "bsd 2-clause" | "simplified bsd" => "BSD-2-Clause",
        "gpl v2" | "gplv2" | "gnu gpl v2" | "gnu general public license v2" => "GPL-2.0",
        "gpl v3" | "gplv3" | "gnu gpl v3" | "gnu general public license v3" => "GPL-3.0",
        "lgpl v2.1" | "lgplv2.1" | "gnu lgpl v2.1" => "LGPL-2.1",
        "lgpl v3" | "lgplv3" | "gnu lgpl v3" => "LGPL-3.0",
        "agpl v3" | "agplv3" | "gnu agpl v3" => "AGPL-3.0",
        "mpl 2.0" | "mplv2" | "mozilla public license 2.0" => "MPL-2.0",
        "eclipse public license 1.0" | "epl 1.0" => "EPL-1.0",
        "eclipse public license 2.0" | "epl 2.0" | "eclipse public license - v 2.0" => "EPL-2.0",
        "eclipse distribution license - v 1.0" | "edl 1.0" => "EDL-1.0",
        "isc license" => "ISC",
        "cc0" | "public domain" => "CC0-1.0",
        _ => return trimmed.to_string(),
    };
    spdx.to_string()
}
