//! Domain classification from category metadata.
//!
//! - static keyword table (`keywords`)
//! - scoring and domain assignment (`classifier`)

pub mod classifier;
pub mod keywords;

pub use classifier::*;
pub use keywords::*;
