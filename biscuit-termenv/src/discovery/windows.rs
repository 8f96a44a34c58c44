//! Windows release parsing.
//!
//! The Windows 10 console gained 256-color support in build 10586 and
//! 24-bit color in build 14931 (2016-09-21).

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::discovery::color_space::ColorSpace;
use crate::error::{Result, TermenvError};

/// First build with 256-color console support.
pub const ANSI_256_BUILD: u32 = 10586;
/// First build with true color console support.
pub const TRUE_COLOR_BUILD: u32 = 14931;

/// A dot-separated Windows release such as `10.0.19045`.
///
/// Missing components are zero and anything after the build (a revision)
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl WindowsVersion {
    pub fn color_space(&self) -> ColorSpace {
        if self.major < 10 {
            ColorSpace::Ansi16
        } else if self.build >= TRUE_COLOR_BUILD {
            ColorSpace::TrueColor
        } else if self.build >= ANSI_256_BUILD {
            ColorSpace::Ansi256
        } else {
            ColorSpace::Ansi16
        }
    }
}

impl FromStr for WindowsVersion {
    type Err = TermenvError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TermenvError::InvalidVersion {
            kind: "windows",
            value: s.to_string(),
        };

        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u32> {
            match parts.next() {
                Some(part) => part.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };

        Ok(WindowsVersion {
            major: next(true)?,
            minor: next(false)?,
            build: next(false)?,
        })
    }
}

static RELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("Invalid release regex"));

/// Pulls `major.minor.build` out of the output of `ver`, e.g.
/// `"Microsoft Windows [Version 10.0.19045.3803]"`.
pub fn extract_release(text: &str) -> Option<String> {
    RELEASE_RE.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_release() {
        assert_eq!(
            "10.0.19045".parse::<WindowsVersion>(),
            Ok(WindowsVersion {
                major: 10,
                minor: 0,
                build: 19045
            })
        );
    }

    #[test]
    fn test_parse_ignores_revision() {
        let version: WindowsVersion = "10.0.19045.3803".parse().unwrap();
        assert_eq!(version.build, 19045);
    }

    #[test]
    fn test_parse_partial_release() {
        let version: WindowsVersion = "6.1".parse().unwrap();
        assert_eq!((version.major, version.minor, version.build), (6, 1, 0));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<WindowsVersion>().is_err());
        assert!("ten".parse::<WindowsVersion>().is_err());
        assert!("10.x.19045".parse::<WindowsVersion>().is_err());
        assert_eq!(
            "10..1".parse::<WindowsVersion>(),
            Err(TermenvError::InvalidVersion {
                kind: "windows",
                value: "10..1".to_string()
            })
        );
    }

    #[test]
    fn test_color_tiers() {
        let tier = |v: &str| v.parse::<WindowsVersion>().unwrap().color_space();
        assert_eq!(tier("10.0.10240"), ColorSpace::Ansi16);
        assert_eq!(tier("10.0.10586"), ColorSpace::Ansi256);
        assert_eq!(tier("10.0.14930"), ColorSpace::Ansi256);
        assert_eq!(tier("10.0.14931"), ColorSpace::TrueColor);
        assert_eq!(tier("10.0.22631"), ColorSpace::TrueColor);
        assert_eq!(tier("6.3.9600"), ColorSpace::Ansi16);
    }

    #[test]
    fn test_extract_release() {
        assert_eq!(
            extract_release("\r\nMicrosoft Windows [Version 10.0.19045.3803]\r\n"),
            Some("10.0.19045".to_string())
        );
        assert_eq!(extract_release("no version here"), None);
    }
}
