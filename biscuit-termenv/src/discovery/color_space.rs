//! Color space resolution.
//!
//! Maps an [`EnvironmentSnapshot`] to one of four [`ColorSpace`] levels.
//! Explicit user overrides (`NO_COLOR`, `FORCE_COLOR`, `--color` /
//! `--no-color` flags) are honored before any heuristic, and a disable
//! always beats an enable.
//!
//! ## Resolution order
//!
//! 1. `NO_COLOR`, a disabling flag, or `FORCE_COLOR=0|false` → [`ColorSpace::Mono`]
//! 2. `FORCE_COLOR=1|2|3|true|always|...` or an enabling flag → forced level
//! 3. Deno without environment access → `Mono`
//! 4. Browser → `TrueColor`
//! 5. `COLORTERM`, then CI providers (see [`crate::discovery::ci`])
//! 6. No TTY or a `dumb`/`-mono` terminal → `Mono`
//! 7. Windows (by build number) and Kitty
//! 8. `TERM` patterns (`-256color`, `xterm`, `screen`, ...)
//! 9. Anything else → [`ResolverOptions::unknown_terminal`]
//!
//! ## Examples
//!
//! ```
//! use biscuit_termenv::discovery::color_space::{resolve_color_space, ColorSpace};
//! use biscuit_termenv::discovery::environment::{EnvironmentSnapshot, Runtime};
//!
//! let snapshot = EnvironmentSnapshot::new(Runtime::Native)
//!     .with_tty(true)
//!     .with_platform("linux")
//!     .with_env("TERM", "xterm-256color");
//!
//! let level = resolve_color_space(&snapshot);
//! assert_eq!(level, ColorSpace::Ansi256);
//! assert!(level.is_16_color_supported());
//! assert!(!level.is_true_color_supported());
//! ```

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::discovery::ci::color_space_by_ci;
use crate::discovery::environment::{EnvironmentSnapshot, Runtime};
use crate::discovery::windows::WindowsVersion;
use crate::error::{Result, TermenvError};

/// How many colors the output target can display.
///
/// The ordering is meaningful: "supports at least `level`" is `space >= level`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ColorSpace {
    /// no color support
    #[default]
    Mono = 0,
    /// 16 colors (8 normal plus "bright" variants)
    Ansi16 = 1,
    /// 256 color palette (8 bit)
    Ansi256 = 2,
    /// 16 million colors (24 bit)
    TrueColor = 3,
}

impl ColorSpace {
    /// The numeric level (`0..=3`).
    pub const fn level(self) -> u8 {
        self as u8
    }

    /// The color space for a numeric level, saturating above 3.
    pub const fn from_level(level: u8) -> Self {
        match level {
            0 => ColorSpace::Mono,
            1 => ColorSpace::Ansi16,
            2 => ColorSpace::Ansi256,
            _ => ColorSpace::TrueColor,
        }
    }

    pub fn is_colors_supported(self) -> bool {
        self > ColorSpace::Mono
    }

    pub fn is_16_color_supported(self) -> bool {
        self >= ColorSpace::Ansi16
    }

    pub fn is_256_color_supported(self) -> bool {
        self >= ColorSpace::Ansi256
    }

    pub fn is_true_color_supported(self) -> bool {
        self == ColorSpace::TrueColor
    }
}

impl std::fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorSpace::Mono => write!(f, "mono"),
            ColorSpace::Ansi16 => write!(f, "ansi16"),
            ColorSpace::Ansi256 => write!(f, "ansi256"),
            ColorSpace::TrueColor => write!(f, "truecolor"),
        }
    }
}

impl FromStr for ColorSpace {
    type Err = TermenvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "mono" | "none" => Ok(ColorSpace::Mono),
            "1" | "16" | "ansi" | "ansi16" => Ok(ColorSpace::Ansi16),
            "2" | "256" | "ansi256" => Ok(ColorSpace::Ansi256),
            "3" | "24bit" | "truecolor" => Ok(ColorSpace::TrueColor),
            _ => Err(TermenvError::InvalidColorSpace(s.to_string())),
        }
    }
}

/// Tunables for [`resolve_color_space_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Level assumed for a TTY whose `TERM` matches no known pattern.
    pub unknown_terminal: ColorSpace,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            unknown_terminal: ColorSpace::TrueColor,
        }
    }
}

/// What a `FORCE_COLOR` value asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForceColor {
    Off,
    On(ColorSpace),
}

impl ForceColor {
    /// `None` when the value carries no signal (empty).
    fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_ascii_lowercase();
        if value.is_empty() {
            return None;
        }
        if value == "false" {
            return Some(ForceColor::Off);
        }

        let force = match value.parse::<i64>() {
            Ok(n) if n <= 0 => ForceColor::Off,
            Ok(1) => ForceColor::On(ColorSpace::Ansi16),
            Ok(2) => ForceColor::On(ColorSpace::Ansi256),
            Ok(_) => ForceColor::On(ColorSpace::TrueColor),
            // "true", "always" and any other text
            Err(_) => ForceColor::On(ColorSpace::TrueColor),
        };
        Some(force)
    }
}

static DISABLE_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-{1,2}(?:no-color|color=(?:false|never))$").expect("Invalid disable flag regex")
});

static ENABLE_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-{1,2}color(?:=(?:true|always))?$").expect("Invalid enable flag regex")
});

static MONO_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-mono|dumb").expect("Invalid mono TERM regex"));

static TERM_256: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-256(?:colou?r)?$").expect("Invalid 256 TERM regex"));

static TERM_16: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:screen|tmux|xterm|vt[1-5][0-9]{1,2}|ansi|cygwin|linux|mintty|rxvt)|color",
    )
    .expect("Invalid 16 color TERM regex")
});

fn decided(color_space: ColorSpace, source: &'static str) -> ColorSpace {
    tracing::debug!(?color_space, source, "Resolved color space");
    color_space
}

/// Resolves the color space of `snapshot` with the default options.
pub fn resolve_color_space(snapshot: &EnvironmentSnapshot) -> ColorSpace {
    resolve_color_space_with(snapshot, &ResolverOptions::default())
}

/// Resolves the color space of `snapshot`.
///
/// Total: unreadable or malformed signals count as "no signal" and the
/// result is always one of the four [`ColorSpace`] levels.
pub fn resolve_color_space_with(
    snapshot: &EnvironmentSnapshot,
    options: &ResolverOptions,
) -> ColorSpace {
    let force = snapshot.var("FORCE_COLOR").and_then(ForceColor::parse);

    if snapshot.has_var("NO_COLOR") {
        return decided(ColorSpace::Mono, "NO_COLOR");
    }
    if snapshot.has_flag(&DISABLE_FLAG) {
        return decided(ColorSpace::Mono, "argv");
    }
    match force {
        Some(ForceColor::Off) => return decided(ColorSpace::Mono, "FORCE_COLOR"),
        Some(ForceColor::On(level)) => return decided(level, "FORCE_COLOR"),
        None => {}
    }
    if snapshot.has_flag(&ENABLE_FLAG) {
        return decided(ColorSpace::TrueColor, "argv");
    }

    color_space_by_runtime(snapshot, options)
}

/// The heuristic part of the resolver: everything after the explicit
/// overrides.
pub fn color_space_by_runtime(
    snapshot: &EnvironmentSnapshot,
    options: &ResolverOptions,
) -> ColorSpace {
    match snapshot.runtime() {
        // Deno hands out an empty env when permission to read it is denied
        Runtime::Deno if snapshot.env_is_empty() => {
            return decided(ColorSpace::Mono, "runtime");
        }
        Runtime::Browser => return decided(ColorSpace::TrueColor, "runtime"),
        _ => {}
    }

    if let Some(colorterm) = snapshot.var("COLORTERM") {
        let level = match colorterm.trim().to_ascii_lowercase().as_str() {
            "24bit" | "truecolor" => Some(ColorSpace::TrueColor),
            "ansi256" => Some(ColorSpace::Ansi256),
            "ansi" => Some(ColorSpace::Ansi16),
            _ => None,
        };
        if let Some(level) = level {
            return decided(level, "COLORTERM");
        }
    }

    if let Some(level) = color_space_by_ci(snapshot) {
        return decided(level, "CI");
    }

    let term = snapshot.var("TERM").unwrap_or_default();

    if !snapshot.is_tty() {
        return decided(ColorSpace::Mono, "tty");
    }
    if MONO_TERM.is_match(term) {
        return decided(ColorSpace::Mono, "TERM");
    }

    if snapshot.platform() == "win32" {
        return decided(windows_color_space(snapshot), "platform");
    }
    if term.to_ascii_lowercase().contains("kitty") {
        return decided(ColorSpace::TrueColor, "TERM");
    }

    if TERM_256.is_match(term) {
        return decided(ColorSpace::Ansi256, "TERM");
    }
    if TERM_16.is_match(term) {
        return decided(ColorSpace::Ansi16, "TERM");
    }

    decided(options.unknown_terminal, "fallback")
}

/// Without a readable release we assume a modern (true color) Windows.
fn windows_color_space(snapshot: &EnvironmentSnapshot) -> ColorSpace {
    let Some(release) = snapshot.os_release() else {
        return ColorSpace::TrueColor;
    };

    match release.parse::<WindowsVersion>() {
        Ok(version) => version.color_space(),
        Err(err) => {
            tracing::debug!(%err, "Unparsable Windows release, assuming true color");
            ColorSpace::TrueColor
        }
    }
}
