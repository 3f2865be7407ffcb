//! Foundational types shared by every Murmur crate.
//!
//! - [`errors`]: the [`MurmurError`] type and the [`Result`] alias
//! - [`math`]: scalar interpolation helpers

pub mod errors;
pub mod math;

pub use errors::{MurmurError, Result};
pub use math::lerp;
