//! Continuous Integration detection.
//!
//! CI runners rarely give their jobs a TTY, yet most of them render ANSI
//! colors in build logs. This module identifies the provider from its marker
//! variables and supplies the CI branch of the color heuristic.
//!
//! ## Examples
//!
//! ```
//! use biscuit_termenv::discovery::ci::{detect_ci, CiVendor};
//! use biscuit_termenv::discovery::environment::{EnvironmentSnapshot, Runtime};
//!
//! let snapshot = EnvironmentSnapshot::new(Runtime::Native)
//!     .with_env("CI", "true")
//!     .with_env("GITHUB_ACTIONS", "true");
//!
//! assert_eq!(detect_ci(&snapshot), Some(CiVendor::GitHubActions));
//! ```

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::discovery::color_space::ColorSpace;
use crate::discovery::environment::EnvironmentSnapshot;
use crate::error::{Result, TermenvError};

/// A recognised CI provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CiVendor {
    GitHubActions,
    GiteaActions,
    GitLab,
    Travis,
    CircleCi,
    AppVeyor,
    Buildkite,
    Drone,
    Codeship,
    Netlify,
    Vercel,
    Woodpecker,
    AzurePipelines,
    TeamCity,
    /// `CI` is set but no provider marker was found
    Generic,
}

impl CiVendor {
    /// Human readable provider name.
    pub fn name(self) -> &'static str {
        match self {
            CiVendor::GitHubActions => "GitHub Actions",
            CiVendor::GiteaActions => "Gitea Actions",
            CiVendor::GitLab => "GitLab CI",
            CiVendor::Travis => "Travis CI",
            CiVendor::CircleCi => "CircleCI",
            CiVendor::AppVeyor => "AppVeyor",
            CiVendor::Buildkite => "Buildkite",
            CiVendor::Drone => "Drone",
            CiVendor::Codeship => "Codeship",
            CiVendor::Netlify => "Netlify CI",
            CiVendor::Vercel => "Vercel",
            CiVendor::Woodpecker => "Woodpecker",
            CiVendor::AzurePipelines => "Azure Pipelines",
            CiVendor::TeamCity => "TeamCity",
            CiVendor::Generic => "CI",
        }
    }

    /// Whether the provider's log viewer renders 24-bit color.
    pub fn supports_true_color(self) -> bool {
        matches!(self, CiVendor::GitHubActions | CiVendor::GiteaActions)
    }
}

impl std::fmt::Display for CiVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker variables checked by existence, in priority order.
const VENDOR_MARKERS: &[(&str, CiVendor)] = &[
    ("GITHUB_ACTIONS", CiVendor::GitHubActions),
    ("GITEA_ACTIONS", CiVendor::GiteaActions),
    ("GITLAB_CI", CiVendor::GitLab),
    ("TRAVIS", CiVendor::Travis),
    ("CIRCLECI", CiVendor::CircleCi),
    ("APPVEYOR", CiVendor::AppVeyor),
    ("BUILDKITE", CiVendor::Buildkite),
    ("DRONE", CiVendor::Drone),
    ("NETLIFY", CiVendor::Netlify),
    ("VERCEL", CiVendor::Vercel),
    ("WOODPECKER", CiVendor::Woodpecker),
    ("TEAMCITY_VERSION", CiVendor::TeamCity),
    // Azure DevOps doesn't set CI
    ("TF_BUILD", CiVendor::AzurePipelines),
    ("AGENT_NAME", CiVendor::AzurePipelines),
];

/// Identifies the CI provider running this process, if any.
pub fn detect_ci(snapshot: &EnvironmentSnapshot) -> Option<CiVendor> {
    if let Some((_, vendor)) = VENDOR_MARKERS
        .iter()
        .find(|(marker, _)| snapshot.has_var(marker))
    {
        return Some(*vendor);
    }

    if snapshot
        .var("CI_NAME")
        .is_some_and(|name| name.trim().eq_ignore_ascii_case("codeship"))
    {
        return Some(CiVendor::Codeship);
    }

    snapshot.has_var("CI").then_some(CiVendor::Generic)
}

/// Whether this process runs under any CI provider.
pub fn is_ci(snapshot: &EnvironmentSnapshot) -> bool {
    detect_ci(snapshot).is_some()
}

/// A JetBrains TeamCity server version, e.g. `9.1.0` from
/// `"9.1.0 (build 32523)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamCityVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

static TEAMCITY_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("Invalid TeamCity version regex")
});

impl TeamCityVersion {
    /// TeamCity renders 256 colors since 2020.1.1.
    const ANSI_256_SINCE: TeamCityVersion = TeamCityVersion {
        major: 2020,
        minor: 1,
        patch: 1,
    };

    /// ANSI colors in build logs arrived with TeamCity 9.1.
    pub fn supports_color(&self) -> bool {
        (self.major == 9 && self.minor >= 1) || self.major >= 10
    }

    pub fn color_space(&self) -> ColorSpace {
        if !self.supports_color() {
            ColorSpace::Mono
        } else if *self >= Self::ANSI_256_SINCE {
            ColorSpace::Ansi256
        } else {
            ColorSpace::Ansi16
        }
    }
}

impl FromStr for TeamCityVersion {
    type Err = TermenvError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TermenvError::InvalidVersion {
            kind: "teamcity",
            value: s.to_string(),
        };
        let caps = TEAMCITY_VERSION_RE.captures(s).ok_or_else(invalid)?;
        let part = |idx: usize| -> Result<u32> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse().map_err(|_| invalid()),
                None => Ok(0),
            }
        };

        Ok(TeamCityVersion {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
        })
    }
}

/// The CI branch of the color heuristic.
///
/// Returns `None` when no CI marker is present. TeamCity servers too old
/// to render color yield `Some(ColorSpace::Mono)`, which callers must treat
/// as final.
pub fn color_space_by_ci(snapshot: &EnvironmentSnapshot) -> Option<ColorSpace> {
    if let Some(raw) = snapshot.var("TEAMCITY_VERSION") {
        let level = match raw.parse::<TeamCityVersion>() {
            Ok(version) => version.color_space(),
            Err(err) => {
                tracing::debug!(%err, "Unparsable TEAMCITY_VERSION, assuming no color");
                ColorSpace::Mono
            }
        };
        return Some(level);
    }

    if snapshot.has_var("TF_BUILD") {
        return Some(ColorSpace::Ansi16);
    }

    if snapshot.has_var("CI") {
        let true_color = VENDOR_MARKERS
            .iter()
            .filter(|(_, vendor)| vendor.supports_true_color())
            .any(|(marker, _)| snapshot.has_var(marker));
        return Some(if true_color {
            ColorSpace::TrueColor
        } else {
            ColorSpace::Ansi16
        });
    }

    None
}
