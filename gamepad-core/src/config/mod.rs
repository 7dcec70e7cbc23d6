//! Configuration types
//!
//! Board wiring expressed as register values, validated before any
//! hardware is touched.

pub mod board;

pub use board::*;
