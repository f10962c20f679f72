//! VLAN id as carried in an OXM `VLAN_VID` match field.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// VLAN match value.
///
/// Unlike an 802.1Q tag, an OXM VLAN match can also express "untagged" and
/// "any tag present", so this is an enum rather than a bare number.
///
/// # Examples
///
/// ```
/// use of_types::VlanVid;
///
/// let vid: VlanVid = "42".parse().unwrap();
/// assert_eq!(vid, VlanVid::Tagged(42));
/// assert_eq!(vid.oxm_value(), 0x1000 | 42);
/// assert!("4096".parse::<VlanVid>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VlanVid {
    /// Packets without a VLAN tag.
    None,
    /// Packets with any VLAN tag.
    Present,
    /// Packets tagged with exactly this VLAN id.
    Tagged(u16),
}

impl VlanVid {
    /// Largest 12-bit VLAN id.
    pub const MAX: u16 = 4095;

    /// `OFPVID_PRESENT` bit of the OXM encoding.
    pub const PRESENT_BIT: u16 = 0x1000;

    /// Creates a tagged VLAN id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id does not fit in 12 bits.
    pub const fn tagged(id: u16) -> Result<Self, ParseError> {
        if id <= Self::MAX {
            Ok(VlanVid::Tagged(id))
        } else {
            Err(ParseError::InvalidVlanVid(id))
        }
    }

    /// Returns the OXM encoded value (with `OFPVID_PRESENT` for tags).
    pub const fn oxm_value(&self) -> u16 {
        match self {
            VlanVid::None => 0,
            VlanVid::Present => Self::PRESENT_BIT,
            VlanVid::Tagged(id) => Self::PRESENT_BIT | *id,
        }
    }
}

impl fmt::Display for VlanVid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanVid::None => write!(f, "none"),
            VlanVid::Present => write!(f, "present"),
            VlanVid::Tagged(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for VlanVid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "untagged" => Ok(VlanVid::None),
            "present" | "any" => Ok(VlanVid::Present),
            other => {
                // Handle "Vlan100" format
                let digits = other.strip_prefix("vlan").unwrap_or(other);
                let id: u16 = digits.parse().map_err(|_| ParseError::InvalidVlanVid(0))?;
                VlanVid::tagged(id)
            }
        }
    }
}

impl TryFrom<String> for VlanVid {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VlanVid> for String {
    fn from(vid: VlanVid) -> String {
        vid.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tagged_range() {
        assert!(VlanVid::tagged(0).is_ok());
        assert!(VlanVid::tagged(4095).is_ok());
        assert!(VlanVid::tagged(4096).is_err());
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!("untagged".parse::<VlanVid>().unwrap(), VlanVid::None);
        assert_eq!("present".parse::<VlanVid>().unwrap(), VlanVid::Present);
        assert_eq!("Vlan100".parse::<VlanVid>().unwrap(), VlanVid::Tagged(100));
    }

    #[test]
    fn test_oxm_value() {
        assert_eq!(VlanVid::None.oxm_value(), 0);
        assert_eq!(VlanVid::Present.oxm_value(), 0x1000);
        assert_eq!(VlanVid::Tagged(5).oxm_value(), 0x1005);
    }
}
