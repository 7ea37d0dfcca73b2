//! `domain-strata` library crate.
//!
//! The binary (`strata`) is a thin wrapper around this library so that:
//!
//! - the classifier and quota logic are testable without spawning processes
//! - each stage can be driven with a different category source (e.g. in tests)

pub mod app;
pub mod classify;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod sample;
