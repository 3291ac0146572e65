use crate::license::expression::Expr;
use crate::license::spdx::{classify_spdx_id, normalize};
use crate::models::LicenseRisk;

/// Classify a license string (raw or SPDX) into a risk level.
///
/// OR alternatives take the most permissive component, AND conjunctions the
/// most restrictive. Proprietary/commercial wording wins outright.
pub fn classify(license: &str) -> LicenseRisk {
    let trimmed = license.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        return LicenseRisk::Unknown;
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("proprietary") || lower.contains("commercial") {
        return LicenseRisk::Proprietary;
    }

    match Expr::parse(&normalize(trimmed)) {
        Some(expr) => expr.evaluate(&classify_spdx_id, most_restrictive, most_permissive),
        None => LicenseRisk::Unknown,
    }
}

// Unknown ranks last in both orders: any known component beats it.
fn permissive_rank(risk: LicenseRisk) -> u8 {
    match risk {
        LicenseRisk::Permissive => 0,
        LicenseRisk::WeakCopyleft => 1,
        LicenseRisk::StrongCopyleft => 2,
        LicenseRisk::Proprietary => 3,
        LicenseRisk::Unknown => 4,
    }
}

fn restrictive_rank(risk: LicenseRisk) -> u8 {
    match risk {
        LicenseRisk::Proprietary => 0,
        LicenseRisk::StrongCopyleft => 1,
        LicenseRisk::WeakCopyleft => 2,
        LicenseRisk::Permissive => 3,
        LicenseRisk::Unknown => 4,
    }
}

fn most_permissive(a: LicenseRisk, b: LicenseRisk) -> LicenseRisk {
    if permissive_rank(b) < permissive_rank(a) {
        b
    } else {
        a
    }
}

fn most_restrictive(a: LicenseRisk, b: LicenseRisk) -> LicenseRisk {
    if restrictive_rank(b) < restrictive_rank(a) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_expression() {
        assert_eq!(classify("MIT OR GPL-3.0"), LicenseRisk::Permissive);
    }

    #[test]
    fn test_slash_separator() {
        assert_eq!(classify("MIT/Apache-2.0"), LicenseRisk::Permissive);
        assert_eq!(classify("GPL-3.0/LGPL-3.0"), LicenseRisk::WeakCopyleft);
    }

    #[test]
    fn test_and_expression() {
        assert_eq!(classify("MIT AND GPL-3.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify("MIT AND CUSTOM-1"), LicenseRisk::Permissive);
    }

    #[test]
    fn test_nested_expression() {
        assert_eq!(
            classify("(EPL-2.0 OR GPL-2.0 WITH Classpath-exception-2.0) AND MIT"),
            LicenseRisk::WeakCopyleft
        );
    }

    #[test]
    fn test_proprietary() {
        assert_eq!(classify("Proprietary"), LicenseRisk::Proprietary);
        assert_eq!(classify("commercial license"), LicenseRisk::Proprietary);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify(""), LicenseRisk::Unknown);
        assert_eq!(classify("unknown"), LicenseRisk::Unknown);
        assert_eq!(classify("CUSTOM-LICENSE-42"), LicenseRisk::Unknown);
    }

    #[test]
    fn test_normalized_names() {
        assert_eq!(classify("Apache License, Version 2.0"), LicenseRisk::Permissive);
        assert_eq!(classify("Eclipse Public License 2.0"), LicenseRisk::WeakCopyleft);
    }
}
