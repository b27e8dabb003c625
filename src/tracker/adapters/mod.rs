//! Adapter implementations of the tracker ports.

pub mod filesystem;
pub mod memory;
pub mod postgres;
