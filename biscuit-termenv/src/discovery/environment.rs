//! Environment snapshots and the probes that produce them.
//!
//! Every detection routine in this crate is a pure function of an
//! [`EnvironmentSnapshot`]. The snapshot is a plain value: the ambient
//! helpers build a fresh one from the running process on every call, while
//! tests (and callers who want a stable view across several queries) build
//! one directly.
//!
//! ## Examples
//!
//! ```
//! use biscuit_termenv::discovery::environment::{EnvironmentSnapshot, Runtime};
//!
//! let snapshot = EnvironmentSnapshot::new(Runtime::Native)
//!     .with_tty(true)
//!     .with_platform("linux")
//!     .with_env("TERM", "xterm-256color");
//!
//! assert_eq!(snapshot.var("TERM"), Some("xterm-256color"));
//! assert_eq!(snapshot.var("NO_COLOR"), None);
//! ```

use std::collections::HashMap;
use std::env;
use std::io::IsTerminal;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The host runtime the process (or module) is executing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Deno,
    Node,
    Bun,
    /// A web page; there is no TTY and no environment to read.
    Browser,
    /// A compiled process reading its own OS state.
    Native,
    Unknown,
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Deno => write!(f, "deno"),
            Runtime::Node => write!(f, "node"),
            Runtime::Bun => write!(f, "bun"),
            Runtime::Browser => write!(f, "browser"),
            Runtime::Native => write!(f, "native"),
            Runtime::Unknown => write!(f, "unknown"),
        }
    }
}

/// Everything the detection heuristics look at, captured at one moment.
///
/// Missing environment variables are simply absent from the map; lookups
/// return `None` rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    is_tty: bool,
    argv: Vec<String>,
    platform: String,
    env: HashMap<String, String>,
    runtime: Runtime,
    os_release: Option<String>,
}

impl EnvironmentSnapshot {
    /// An empty snapshot for `runtime`: no TTY, no argv, no env, no platform.
    pub fn new(runtime: Runtime) -> Self {
        Self {
            is_tty: false,
            argv: Vec::new(),
            platform: String::new(),
            env: HashMap::new(),
            runtime,
            os_release: None,
        }
    }

    /// Snapshot of the current process, taken through [`detect_probe`].
    pub fn current() -> Self {
        detect_probe().snapshot()
    }

    pub fn with_tty(mut self, is_tty: bool) -> Self {
        self.is_tty = is_tty;
        self
    }

    pub fn with_argv<I, S>(mut self, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv = argv.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the platform identifier (`"win32"`, `"darwin"`, `"linux"`, ...).
    pub fn with_platform<T: Into<String>>(mut self, platform: T) -> Self {
        self.platform = platform.into();
        self
    }

    /// Adds (or replaces) a single environment variable.
    pub fn with_env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Adds every `(key, value)` pair from `vars`.
    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the OS release string (e.g. `"10.0.19045"` on Windows).
    pub fn with_os_release<T: Into<String>>(mut self, release: T) -> Self {
        self.os_release = Some(release.into());
        self
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    pub fn os_release(&self) -> Option<&str> {
        self.os_release.as_deref()
    }

    /// The value of the environment variable `key`, if present.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Whether `key` is defined at all, regardless of its value.
    pub fn has_var(&self, key: &str) -> bool {
        self.env.contains_key(key)
    }

    /// The value of `key` when it is present and not blank.
    pub fn non_empty_var(&self, key: &str) -> Option<&str> {
        self.var(key).filter(|v| !v.trim().is_empty())
    }

    /// Whether no environment variables could be read.
    pub fn env_is_empty(&self) -> bool {
        self.env.is_empty()
    }

    /// Whether any command-line argument matches `pattern`.
    pub fn has_flag(&self, pattern: &Regex) -> bool {
        self.argv.iter().any(|arg| pattern.is_match(arg))
    }
}

/// Maps a Rust `std::env::consts::OS` value onto the platform identifiers
/// used by the heuristics (`"windows"` becomes `"win32"`, `"macos"` becomes
/// `"darwin"`; everything else passes through).
pub fn platform_name(os: &str) -> String {
    match os {
        "windows" => "win32".to_string(),
        "macos" => "darwin".to_string(),
        other => other.to_string(),
    }
}

/// A source of [`EnvironmentSnapshot`]s.
///
/// Implementations must read their host state afresh on every call.
pub trait EnvironmentProbe: Send + Sync {
    fn snapshot(&self) -> EnvironmentSnapshot;
}

/// Reads the state of the current operating-system process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessProbe;

impl EnvironmentProbe for ProcessProbe {
    fn snapshot(&self) -> EnvironmentSnapshot {
        let env = read_env();
        let is_tty = std::io::stdout().is_terminal();
        tracing::trace!(
            is_tty,
            env_vars = env.len(),
            os = env::consts::OS,
            "Captured process environment snapshot"
        );

        EnvironmentSnapshot {
            is_tty,
            argv: env::args_os()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect(),
            platform: platform_name(env::consts::OS),
            env,
            runtime: Runtime::Native,
            os_release: os_release(),
        }
    }
}

/// Keys that are not valid UTF-8 are skipped; values are converted lossily
/// so that presence checks (`NO_COLOR`, `CI`, ...) still see them.
fn read_env() -> HashMap<String, String> {
    env::vars_os()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            Some((key, value.to_string_lossy().into_owned()))
        })
        .collect()
}

/// The OS release never changes while the process runs, so it is read once.
fn os_release() -> Option<String> {
    static RELEASE: OnceLock<Option<String>> = OnceLock::new();
    RELEASE.get_or_init(read_os_release).clone()
}

#[cfg(windows)]
fn read_os_release() -> Option<String> {
    let output = std::process::Command::new("cmd")
        .args(["/C", "ver"])
        .output()
        .ok()?;
    let text = String::from_utf8_lossy(&output.stdout);
    let release = crate::discovery::windows::extract_release(&text);
    tracing::trace!(release = ?release, "Read Windows release from `ver`");
    release
}

#[cfg(not(windows))]
fn read_os_release() -> Option<String> {
    None
}

/// Hands out copies of an injected snapshot.
///
/// Useful for tests and for callers that want to evaluate several
/// capabilities against the same frozen view.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    snapshot: EnvironmentSnapshot,
}

impl StaticProbe {
    pub fn new(snapshot: EnvironmentSnapshot) -> Self {
        Self { snapshot }
    }
}

impl From<EnvironmentSnapshot> for StaticProbe {
    fn from(snapshot: EnvironmentSnapshot) -> Self {
        Self::new(snapshot)
    }
}

impl EnvironmentProbe for StaticProbe {
    fn snapshot(&self) -> EnvironmentSnapshot {
        self.snapshot.clone()
    }
}

/// A page in a web browser: no TTY, no argv and no environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserProbe;

impl EnvironmentProbe for BrowserProbe {
    fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot::new(Runtime::Browser).with_platform("browser")
    }
}

/// Picks the probe for the host this crate was compiled for.
///
/// `wasm32` targets without an operating system run inside a browser;
/// everything else is an OS process.
pub fn detect_probe() -> Box<dyn EnvironmentProbe> {
    if cfg!(all(target_arch = "wasm32", target_os = "unknown")) {
        Box::new(BrowserProbe)
    } else {
        Box::new(ProcessProbe)
    }
}
