//! Stratified sampling of labeled records.
//!
//! - percentage caps (`caps`)
//! - per-domain quota computation (`quota`)
//! - seeded per-domain draws and final shuffle (`draw`)

pub mod caps;
pub mod draw;
pub mod quota;

pub use caps::*;
pub use draw::*;
pub use quota::*;
