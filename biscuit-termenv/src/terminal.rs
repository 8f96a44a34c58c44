//! A consistent view of every terminal capability at once.

use serde::Serialize;

use crate::discovery::{
    ci::{CiVendor, detect_ci},
    color_space::{ColorSpace, ResolverOptions, resolve_color_space_with},
    environment::{EnvironmentProbe, EnvironmentSnapshot, Runtime, detect_probe},
    unicode::is_unicode_supported_in,
    window_size::{WindowSize, window_size},
};

/// Every capability of the output target, derived from a single
/// [`EnvironmentSnapshot`] so the answers agree with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalEnvironment {
    /// The host runtime
    pub runtime: Runtime,
    /// Platform identifier (`win32`, `darwin`, `linux`, ...)
    pub platform: String,
    pub is_tty: bool,
    /// The CI provider running this process (if any)
    pub ci: Option<CiVendor>,
    pub color_space: ColorSpace,
    /// Whether Unicode glyphs are expected to render
    pub unicode: bool,
    /// Window size in cells; `0` on an axis that could not be measured
    pub size: WindowSize,
}

impl Default for TerminalEnvironment {
    fn default() -> TerminalEnvironment {
        TerminalEnvironment::new()
    }
}

impl TerminalEnvironment {
    /// Captures the current process (or browser page).
    pub fn new() -> TerminalEnvironment {
        TerminalEnvironment::from_probe(detect_probe().as_ref())
    }

    pub fn from_probe(probe: &dyn EnvironmentProbe) -> TerminalEnvironment {
        let snapshot = probe.snapshot();
        let size = match snapshot.runtime() {
            Runtime::Browser => WindowSize::default(),
            _ => window_size(WindowSize::default()),
        };
        TerminalEnvironment::from_snapshot(&snapshot, size, &ResolverOptions::default())
    }

    /// Derives every capability from `snapshot`; `size` is taken as given.
    pub fn from_snapshot(
        snapshot: &EnvironmentSnapshot,
        size: WindowSize,
        options: &ResolverOptions,
    ) -> TerminalEnvironment {
        let terminal = TerminalEnvironment {
            runtime: snapshot.runtime(),
            platform: snapshot.platform().to_string(),
            is_tty: snapshot.is_tty(),
            ci: detect_ci(snapshot),
            color_space: resolve_color_space_with(snapshot, options),
            unicode: is_unicode_supported_in(snapshot),
            size,
        };
        tracing::debug!(
            runtime = %terminal.runtime,
            color_space = %terminal.color_space,
            unicode = terminal.unicode,
            ci = ?terminal.ci,
            "Detected terminal environment"
        );
        terminal
    }

    pub fn is_colors_supported(&self) -> bool {
        self.color_space.is_colors_supported()
    }

    pub fn is_16_color_supported(&self) -> bool {
        self.color_space.is_16_color_supported()
    }

    pub fn is_256_color_supported(&self) -> bool {
        self.color_space.is_256_color_supported()
    }

    pub fn is_true_color_supported(&self) -> bool {
        self.color_space.is_true_color_supported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::environment::StaticProbe;

    fn github_actions() -> EnvironmentSnapshot {
        EnvironmentSnapshot::new(Runtime::Native)
            .with_platform("linux")
            .with_env("CI", "true")
            .with_env("GITHUB_ACTIONS", "true")
    }

    #[test]
    fn test_from_snapshot_is_consistent() {
        let terminal = TerminalEnvironment::from_snapshot(
            &github_actions(),
            WindowSize::new(100, 40),
            &ResolverOptions::default(),
        );
        assert_eq!(terminal.runtime, Runtime::Native);
        assert_eq!(terminal.platform, "linux");
        assert!(!terminal.is_tty);
        assert_eq!(terminal.ci, Some(CiVendor::GitHubActions));
        assert_eq!(terminal.color_space, ColorSpace::TrueColor);
        assert!(terminal.is_true_color_supported());
        assert!(terminal.is_256_color_supported());
        // no TTY on linux
        assert!(!terminal.unicode);
        assert_eq!(terminal.size, WindowSize::new(100, 40));
    }

    #[test]
    fn test_from_probe_uses_injected_snapshot() {
        let probe = StaticProbe::new(github_actions().with_env("NO_COLOR", "1"));
        let terminal = TerminalEnvironment::from_probe(&probe);
        assert_eq!(terminal.color_space, ColorSpace::Mono);
        assert!(!terminal.is_colors_supported());
        assert!(!terminal.is_16_color_supported());
    }

    #[test]
    fn test_browser_has_no_window() {
        let probe = StaticProbe::new(EnvironmentSnapshot::new(Runtime::Browser));
        let terminal = TerminalEnvironment::from_probe(&probe);
        assert_eq!(terminal.size, WindowSize::default());
        assert_eq!(terminal.color_space, ColorSpace::TrueColor);
    }

    #[test]
    fn test_serializes_to_json() {
        let terminal = TerminalEnvironment::from_snapshot(
            &github_actions(),
            WindowSize::new(80, 24),
            &ResolverOptions::default(),
        );
        let json = serde_json::to_value(&terminal).unwrap();
        assert_eq!(json["runtime"], "native");
        assert_eq!(json["color_space"], "truecolor");
        assert_eq!(json["ci"], "GitHubActions");
        assert_eq!(json["size"]["width"], 80);
    }
}
