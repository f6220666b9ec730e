//! Generated Rust copies of the embedded definitions.
//!
//! Files in this directory are written by `exchange-defs generate`; edit the
//! manifests under `definitions/` instead.

pub mod preprocessor_status;
