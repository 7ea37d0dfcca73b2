//! Reporting utilities: stage summaries and quota tables.

pub mod format;

pub use format::*;
