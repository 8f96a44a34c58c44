//! Environment discovery
//!
//! This module provides the environment snapshot and the functions that
//! derive terminal capabilities from it: color space, CI provider,
//! Unicode support and window size.

pub mod ci;
pub mod color_space;
pub mod environment;
pub mod unicode;
pub mod window_size;
pub mod windows;
