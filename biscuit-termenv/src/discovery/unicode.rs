//! Unicode rendering heuristic.

use crate::discovery::environment::EnvironmentSnapshot;

/// `TERM` values known to render Unicode on non-Windows hosts.
const UNICODE_TERMS: &[&str] = &[
    "xterm",
    "xterm-256color",
    "xterm-color",
    "screen",
    "screen-256color",
    "tmux",
    "tmux-256color",
];

/// Whether the environment described by `snapshot` can render Unicode.
///
/// On Windows only modern hosts (Windows Terminal, VS Code, CI logs,
/// alacritty) qualify. Elsewhere a TTY is required; macOS always
/// qualifies, other systems need a known `TERM` or a UTF-8 `LANG`.
pub fn is_unicode_supported_in(snapshot: &EnvironmentSnapshot) -> bool {
    let term = snapshot.var("TERM");

    if snapshot.platform() == "win32" {
        return snapshot.non_empty_var("CI").is_some()
            || snapshot.non_empty_var("WT_SESSION").is_some()
            || snapshot.var("TERM_PROGRAM") == Some("vscode")
            || matches!(term, Some("xterm-256color" | "alacritty"));
    }

    if !snapshot.is_tty() || term == Some("dumb") {
        return false;
    }

    if snapshot.platform() == "darwin" {
        return true;
    }

    if term.is_some_and(|t| UNICODE_TERMS.contains(&t)) {
        return true;
    }

    snapshot
        .var("LANG")
        .is_some_and(|lang| lang.contains("UTF-8"))
}

/// [`is_unicode_supported_in`] for the current process.
pub fn is_unicode_supported() -> bool {
    is_unicode_supported_in(&EnvironmentSnapshot::current())
}
