//! License string normalization, expression parsing and risk classification.
//!
//! - [`spdx`]: maps canonical SPDX identifiers to [`LicenseRisk`](crate::models::LicenseRisk)
//!   and normalizes common non-SPDX strings.
//! - [`expression`]: SPDX `AND` / `OR` / `WITH` expression parser shared by the
//!   risk classifier and the local policy.
//! - [`classifier`]: risk of a raw license string.

pub mod classifier;
pub mod expression;
pub mod spdx;
