//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed subject-domain enumeration (`Domain`) and record labels (`DomainLabel`)
//! - the passthrough record wrapper (`Record`)
//! - per-stage configuration (`AnnotateConfig`, `SampleConfig`)

pub mod types;

pub use types::*;
