//! # biscuit-termenv
//!
//! Terminal environment detection for console-output libraries that need
//! to degrade gracefully.
//!
//! This crate answers four questions about the place output is going:
//!
//! - **Color Space**: none, 16, 256 or 16 million colors, honoring
//!   `NO_COLOR`, `FORCE_COLOR`, `--color`/`--no-color` and CI providers
//! - **Unicode**: whether box-drawing glyphs and emoji will render
//! - **Window Size**: columns and rows, with a caller-supplied fallback
//! - **Escape Codes**: removing ANSI sequences from text
//!
//! ## Quick Start
//!
//! ```
//! use biscuit_termenv::{color_space, strip, ColorSpace};
//!
//! let message = "\x1b[32mok\x1b[0m";
//! if color_space() >= ColorSpace::Ansi16 {
//!     println!("{message}");
//! } else {
//!     println!("{}", strip(message));
//! }
//! ```
//!
//! Every ambient function reads the process environment afresh. To
//! evaluate several capabilities against one consistent view, capture a
//! [`TerminalEnvironment`] or an [`EnvironmentSnapshot`] and reuse it.
//!
//! ## Modules
//!
//! - [`terminal`] - `TerminalEnvironment` with all capabilities
//! - [`discovery`] - Snapshot-based detection functions
//!   - [`discovery::environment`] - Snapshots and host probes
//!   - [`discovery::color_space`] - Color space resolution
//!   - [`discovery::ci`] - CI provider detection
//!   - [`discovery::windows`] - Windows release tiers
//!   - [`discovery::unicode`] - Unicode heuristic
//!   - [`discovery::window_size`] - Window size
//! - [`utils`] - Escape code constants and stripping

pub mod discovery;
pub mod error;
pub mod terminal;
pub mod utils;

pub use discovery::color_space::{ColorSpace, ResolverOptions, resolve_color_space};
pub use discovery::environment::{EnvironmentProbe, EnvironmentSnapshot, Runtime};
pub use discovery::unicode::is_unicode_supported;
pub use discovery::window_size::{WindowSize, window_size};
pub use error::{Result, TermenvError};
pub use terminal::TerminalEnvironment;
pub use utils::escape_codes::{
    ERASE_LINE, ERASE_LINE_LEFT, ERASE_LINE_RIGHT, ERASE_SCREEN, ERASE_SCREEN_LEFT,
    ERASE_SCREEN_RIGHT, RESET, has_escape_codes, strip,
};

/// The color space of the current process.
pub fn color_space() -> ColorSpace {
    resolve_color_space(&EnvironmentSnapshot::current())
}

/// Whether the current process can emit any color.
pub fn is_colors_supported() -> bool {
    color_space().is_colors_supported()
}

/// Whether the current process can emit at least 16 colors.
pub fn is_16_color_supported() -> bool {
    color_space().is_16_color_supported()
}

/// Whether the current process can emit at least 256 colors.
pub fn is_256_color_supported() -> bool {
    color_space().is_256_color_supported()
}

/// Whether the current process can emit 24-bit color.
pub fn is_true_color_supported() -> bool {
    color_space().is_true_color_supported()
}
