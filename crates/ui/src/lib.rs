#![forbid(unsafe_code)]

//! Presentation-agnostic view models for the quiz client.
//!
//! Nothing here formats for a specific toolkit; views map these structs to
//! whatever surface hosts them.

pub mod vm;

pub use vm::*;
