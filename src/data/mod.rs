//! External data access.
//!
//! - MediaWiki category lookup (`wikipedia`)

pub mod wikipedia;

pub use wikipedia::*;
