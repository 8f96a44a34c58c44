//! Utility functions for working with terminal escape codes.

pub mod escape_codes;
