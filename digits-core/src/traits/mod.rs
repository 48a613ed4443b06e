//! Abstract interfaces shared by dataset producers and consumers
//!
//! Traits are pure interfaces - implementations live next to the
//! algorithms or in the I/O crate.

pub mod classify;

pub use classify::Classify;
