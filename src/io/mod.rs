//! Input/output helpers.
//!
//! - NDJSON record reading/writing (`jsonl`)

pub mod jsonl;

pub use jsonl::*;
