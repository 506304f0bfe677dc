//! sglog - bounded rotating append-only log writer
//!
//! This library provides the logger and its configuration; the `sglog`
//! binary is the composition root that wires them together.

pub mod config;
pub mod logging;
