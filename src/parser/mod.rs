//! Ecosystem-specific coordinate grammars.
//!
//! Manifest readers delegate here when an entry needs more than splitting on
//! a delimiter: Go checksum lines and the several Maven coordinate shapes.

pub mod golang;
pub mod maven;
