//! Attribute value types shared across the WiX object model.
//!
//! - [`YesNoType`] - optional boolean attributes (`Wix.YesNoType`)
//! - [`InstallUninstallType`] - service actions tied to install/uninstall

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Namespaces and Constants
// ============================================================================

/// WiX v3 namespace, declared on the root `<Wix>` element
pub const XMLNS_WIX: &str = "http://schemas.microsoft.com/wix/2006/wi";

/// Identifier of the root directory of every installer
pub const TARGETDIR: &str = "TARGETDIR";

// ============================================================================
// YesNoType
// ============================================================================

/// Tri-state boolean used for optional WiX attributes.
///
/// `Unspecified` is not the same as `No`: unspecified optional attributes are
/// left out of the document so the schema default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum YesNoType {
    /// Attribute not set
    #[default]
    Unspecified,
    /// `yes`
    Yes,
    /// `no`
    No,
}

impl YesNoType {
    /// Maps `true` to `Yes` and `false` to `No`. Never yields `Unspecified`.
    pub fn from_bool(v: bool) -> Self {
        if v {
            YesNoType::Yes
        } else {
            YesNoType::No
        }
    }

    /// Returns the attribute token for this value.
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNoType::Unspecified => "unspecified",
            YesNoType::Yes => "yes",
            YesNoType::No => "no",
        }
    }

    /// Returns true unless the value is `Unspecified`.
    pub fn is_specified(&self) -> bool {
        *self != YesNoType::Unspecified
    }
}

impl From<bool> for YesNoType {
    fn from(v: bool) -> Self {
        Self::from_bool(v)
    }
}

impl TryFrom<u8> for YesNoType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(YesNoType::Unspecified),
            1 => Ok(YesNoType::Yes),
            2 => Ok(YesNoType::No),
            _ => Err(Error::InvalidEnumValue {
                kind: "YesNoType",
                value: code.to_string(),
            }),
        }
    }
}

impl FromStr for YesNoType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "unspecified" | "" => Ok(YesNoType::Unspecified),
            "yes" => Ok(YesNoType::Yes),
            "no" => Ok(YesNoType::No),
            _ => Err(Error::InvalidEnumValue {
                kind: "YesNoType",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for YesNoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// InstallUninstallType
// ============================================================================

/// When a service action happens (`Wix.InstallUninstallType`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstallUninstallType {
    /// Attribute not set
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "unspecified"))]
    Unspecified,
    /// Only during install
    #[cfg_attr(feature = "serde", serde(rename = "install"))]
    InstallOnly,
    /// Only during uninstall
    #[cfg_attr(feature = "serde", serde(rename = "uninstall"))]
    UninstallOnly,
    /// During both install and uninstall
    #[cfg_attr(feature = "serde", serde(rename = "both"))]
    Both,
}

impl InstallUninstallType {
    /// Returns the attribute token for this value.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallUninstallType::Unspecified => "unspecified",
            InstallUninstallType::InstallOnly => "install",
            InstallUninstallType::UninstallOnly => "uninstall",
            InstallUninstallType::Both => "both",
        }
    }

    /// Returns true unless the value is `Unspecified`.
    pub fn is_specified(&self) -> bool {
        *self != InstallUninstallType::Unspecified
    }
}

impl TryFrom<u8> for InstallUninstallType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(InstallUninstallType::Unspecified),
            1 => Ok(InstallUninstallType::InstallOnly),
            2 => Ok(InstallUninstallType::UninstallOnly),
            3 => Ok(InstallUninstallType::Both),
            _ => Err(Error::InvalidEnumValue {
                kind: "InstallUninstallType",
                value: code.to_string(),
            }),
        }
    }
}

impl FromStr for InstallUninstallType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "unspecified" | "" => Ok(InstallUninstallType::Unspecified),
            "install" => Ok(InstallUninstallType::InstallOnly),
            "uninstall" => Ok(InstallUninstallType::UninstallOnly),
            "both" => Ok(InstallUninstallType::Both),
            _ => Err(Error::InvalidEnumValue {
                kind: "InstallUninstallType",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for InstallUninstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no_tokens() {
        assert_eq!(YesNoType::Unspecified.as_str(), "unspecified");
        assert_eq!(YesNoType::Yes.as_str(), "yes");
        assert_eq!(YesNoType::No.as_str(), "no");
        assert_eq!(YesNoType::default(), YesNoType::Unspecified);
    }

    #[test]
    fn test_yes_no_from_code() {
        assert_eq!(YesNoType::try_from(0).unwrap(), YesNoType::Unspecified);
        assert_eq!(YesNoType::try_from(1).unwrap(), YesNoType::Yes);
        assert_eq!(YesNoType::try_from(2).unwrap(), YesNoType::No);

        let err = YesNoType::try_from(3).unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue { kind: "YesNoType", .. }));
        assert!(err.to_string().contains("invalid YesNoType value"));
    }

    #[test]
    fn test_yes_no_from_bool() {
        assert_eq!(YesNoType::from_bool(true), YesNoType::Yes);
        assert_eq!(YesNoType::from(false), YesNoType::No);
    }

    #[test]
    fn test_yes_no_parse() {
        assert_eq!("YES".parse::<YesNoType>().unwrap(), YesNoType::Yes);
        assert_eq!("no".parse::<YesNoType>().unwrap(), YesNoType::No);
        assert!("maybe".parse::<YesNoType>().is_err());
    }

    #[test]
    fn test_install_uninstall_tokens() {
        assert_eq!(InstallUninstallType::Unspecified.to_string(), "unspecified");
        assert_eq!(InstallUninstallType::InstallOnly.to_string(), "install");
        assert_eq!(InstallUninstallType::UninstallOnly.to_string(), "uninstall");
        assert_eq!(InstallUninstallType::Both.to_string(), "both");
    }

    #[test]
    fn test_install_uninstall_from_code() {
        assert_eq!(
            InstallUninstallType::try_from(3).unwrap(),
            InstallUninstallType::Both
        );
        assert!(matches!(
            InstallUninstallType::try_from(4),
            Err(Error::InvalidEnumValue {
                kind: "InstallUninstallType",
                ..
            })
        ));
    }
}
