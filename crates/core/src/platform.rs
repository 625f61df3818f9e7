//! Target platform family identification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target hardware/toolchain families recognized by the build ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFamily {
    Espressif32,
    Espressif8266,
    Atmelavr,
    Atmelsam,
    Ststm32,
    Nordicnrf52,
    Raspberrypi,
    Native,
}

impl TargetFamily {
    /// Parse a platform identifier string
    ///
    /// Returns `None` for identifiers naming no known family; an unknown
    /// identifier is not an error anywhere in this crate.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "espressif32" => Some(Self::Espressif32),
            "espressif8266" => Some(Self::Espressif8266),
            "atmelavr" => Some(Self::Atmelavr),
            "atmelsam" => Some(Self::Atmelsam),
            "ststm32" => Some(Self::Ststm32),
            "nordicnrf52" => Some(Self::Nordicnrf52),
            "raspberrypi" => Some(Self::Raspberrypi),
            "native" => Some(Self::Native),
            _ => None,
        }
    }

    /// Returns the family name as used in platform identifier strings
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Espressif32 => "espressif32",
            Self::Espressif8266 => "espressif8266",
            Self::Atmelavr => "atmelavr",
            Self::Atmelsam => "atmelsam",
            Self::Ststm32 => "ststm32",
            Self::Nordicnrf52 => "nordicnrf52",
            Self::Raspberrypi => "raspberrypi",
            Self::Native => "native",
        }
    }
}

impl fmt::Display for TargetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_families() {
        assert_eq!(
            TargetFamily::parse("espressif32"),
            Some(TargetFamily::Espressif32)
        );
        assert_eq!(TargetFamily::parse("ststm32"), Some(TargetFamily::Ststm32));
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(TargetFamily::parse("some-other-platform"), None);
        assert_eq!(TargetFamily::parse(""), None);
        // Identifiers are case-sensitive
        assert_eq!(TargetFamily::parse("Espressif32"), None);
    }

    #[test]
    fn test_display_roundtrip() {
        let family = TargetFamily::Espressif32;
        assert_eq!(TargetFamily::parse(&family.to_string()), Some(family));
    }
}
