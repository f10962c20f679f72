//! Switch port numbers, including the OpenFlow reserved ports.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A datapath port number.
///
/// Numbers above [`PortNumber::MAX_PHYSICAL`] are reserved ports with
/// special forwarding meaning (NORMAL, CONTROLLER, FLOOD, ...). The 32-bit
/// (1.1+) encoding is used throughout; 1.0 values are widened on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortNumber(u32);

impl PortNumber {
    /// Highest number usable for a physical or logical port.
    pub const MAX_PHYSICAL: u32 = 0xffff_ff00;

    /// Send the packet out the port it arrived on.
    pub const IN_PORT: PortNumber = PortNumber(0xffff_fff8);
    /// Submit the packet to the first flow table.
    pub const TABLE: PortNumber = PortNumber(0xffff_fff9);
    /// Forward using the non-OpenFlow (legacy L2/L3) pipeline.
    pub const NORMAL: PortNumber = PortNumber(0xffff_fffa);
    /// Flood using the non-OpenFlow pipeline.
    pub const FLOOD: PortNumber = PortNumber(0xffff_fffb);
    /// All standard ports except the ingress port.
    pub const ALL: PortNumber = PortNumber(0xffff_fffc);
    /// Send to the controller as a packet-in.
    pub const CONTROLLER: PortNumber = PortNumber(0xffff_fffd);
    /// The local networking stack of the switch.
    pub const LOCAL: PortNumber = PortNumber(0xffff_fffe);
    /// Wildcard port, used only in flow deletion and stats requests.
    pub const ANY: PortNumber = PortNumber(0xffff_ffff);

    /// Creates a port number from its raw value.
    pub const fn new(raw: u32) -> Self {
        PortNumber(raw)
    }

    /// Returns the raw 32-bit value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Returns true for one of the reserved logical ports.
    pub const fn is_reserved(&self) -> bool {
        self.0 > Self::MAX_PHYSICAL
    }

    fn reserved_name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::IN_PORT => "IN_PORT",
            Self::TABLE => "TABLE",
            Self::NORMAL => "NORMAL",
            Self::FLOOD => "FLOOD",
            Self::ALL => "ALL",
            Self::CONTROLLER => "CONTROLLER",
            Self::LOCAL => "LOCAL",
            Self::ANY => "ANY",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reserved_name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for PortNumber {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let port = match s.trim().to_uppercase().as_str() {
            "IN_PORT" => Self::IN_PORT,
            "TABLE" => Self::TABLE,
            "NORMAL" => Self::NORMAL,
            "FLOOD" => Self::FLOOD,
            "ALL" => Self::ALL,
            "CONTROLLER" => Self::CONTROLLER,
            "LOCAL" => Self::LOCAL,
            "ANY" => Self::ANY,
            other => {
                let raw: u32 = other
                    .parse()
                    .map_err(|_| ParseError::InvalidPortNumber(s.to_string()))?;
                if raw == 0 || raw > Self::MAX_PHYSICAL {
                    return Err(ParseError::InvalidPortNumber(s.to_string()));
                }
                PortNumber(raw)
            }
        };
        Ok(port)
    }
}

impl TryFrom<String> for PortNumber {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PortNumber> for String {
    fn from(port: PortNumber) -> String {
        port.to_string()
    }
}

impl From<u32> for PortNumber {
    fn from(raw: u32) -> Self {
        PortNumber(raw)
    }
}
