//! OpenFlow protocol version.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OpenFlow protocol version negotiated with a datapath.
///
/// Version 1.0 exposes a single flat flow table and carries bare action lists.
/// Later versions expose a multi-table pipeline and carry instructions.
///
/// # Examples
///
/// ```
/// use of_types::ProtocolVersion;
///
/// let pv: ProtocolVersion = "1.3".parse().unwrap();
/// assert_eq!(pv, ProtocolVersion::V1_3);
/// assert!(pv.is_multi_table());
/// assert_eq!(pv.wire_value(), 0x04);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProtocolVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
}

impl ProtocolVersion {
    /// Returns the `ofp_header.version` byte for this version.
    pub const fn wire_value(&self) -> u8 {
        match self {
            Self::V1_0 => 0x01,
            Self::V1_1 => 0x02,
            Self::V1_2 => 0x03,
            Self::V1_3 => 0x04,
        }
    }

    /// Decodes a header version byte.
    pub const fn from_wire(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::V1_0),
            0x02 => Some(Self::V1_1),
            0x03 => Some(Self::V1_2),
            0x04 => Some(Self::V1_3),
            _ => None,
        }
    }

    /// Returns true for the single flat table generation (1.0).
    pub const fn is_single_table(&self) -> bool {
        matches!(self, Self::V1_0)
    }

    /// Returns true for the instruction-based multi-table generations.
    pub const fn is_multi_table(&self) -> bool {
        !self.is_single_table()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ProtocolVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "1.3", "v1.3", "V_1_3" and "OF13"
        let normalized: String = s
            .trim()
            .to_uppercase()
            .trim_start_matches("OF")
            .trim_start_matches('V')
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();

        match normalized.as_str() {
            "10" => Ok(Self::V1_0),
            "11" => Ok(Self::V1_1),
            "12" => Ok(Self::V1_2),
            "13" => Ok(Self::V1_3),
            _ => Err(ParseError::InvalidProtocolVersion(s.to_string())),
        }
    }
}

impl TryFrom<String> for ProtocolVersion {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProtocolVersion> for String {
    fn from(pv: ProtocolVersion) -> String {
        pv.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_formats() {
        assert_eq!("1.0".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1_0);
        assert_eq!("v1.3".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1_3);
        assert_eq!("V_1_3".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1_3);
        assert_eq!("OF13".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1_3);
        assert!("1.5".parse::<ProtocolVersion>().is_err());
        assert!("".parse::<ProtocolVersion>().is_err());
    }

    #[test]
    fn test_generations() {
        assert!(ProtocolVersion::V1_0.is_single_table());
        assert!(!ProtocolVersion::V1_0.is_multi_table());
        assert!(ProtocolVersion::V1_3.is_multi_table());
    }

    #[test]
    fn test_wire_round_trip() {
        for pv in [
            ProtocolVersion::V1_0,
            ProtocolVersion::V1_1,
            ProtocolVersion::V1_2,
            ProtocolVersion::V1_3,
        ] {
            assert_eq!(ProtocolVersion::from_wire(pv.wire_value()), Some(pv));
        }
        assert_eq!(ProtocolVersion::from_wire(0x06), None);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ProtocolVersion::V1_3).unwrap();
        assert_eq!(json, "\"1.3\"");
        let pv: ProtocolVersion = serde_json::from_str("\"1.0\"").unwrap();
        assert_eq!(pv, ProtocolVersion::V1_0);
    }
}
