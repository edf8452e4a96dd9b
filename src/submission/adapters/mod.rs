//! Adapter implementations for submission ports.

pub mod memory;
