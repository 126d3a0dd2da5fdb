//! # Configuration Module
//!
//! Compile-time limits and defaults live in [`constants`]. Runtime knobs for a
//! single selection are carried by [`crate::select::SelectOptions`], whose
//! defaults come from here.

pub mod constants;
pub use constants::*;
