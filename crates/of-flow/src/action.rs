//! Actions: concrete packet operations.

use of_types::PortNumber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::field::MatchField;

/// Action type tag, as advertised in a table's action capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Output,
    CopyTtlOut,
    CopyTtlIn,
    SetMplsTtl,
    DecMplsTtl,
    PushVlan,
    PopVlan,
    PushMpls,
    PopMpls,
    SetQueue,
    Group,
    SetNwTtl,
    DecNwTtl,
    SetField,
    PushPbb,
    PopPbb,
    Experimenter,
}

impl ActionType {
    /// Every action type, in wire code order.
    pub const ALL: [ActionType; 17] = [
        Self::Output,
        Self::CopyTtlOut,
        Self::CopyTtlIn,
        Self::SetMplsTtl,
        Self::DecMplsTtl,
        Self::PushVlan,
        Self::PopVlan,
        Self::PushMpls,
        Self::PopMpls,
        Self::SetQueue,
        Self::Group,
        Self::SetNwTtl,
        Self::DecNwTtl,
        Self::SetField,
        Self::PushPbb,
        Self::PopPbb,
        Self::Experimenter,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Output => "OUTPUT",
            Self::CopyTtlOut => "COPY_TTL_OUT",
            Self::CopyTtlIn => "COPY_TTL_IN",
            Self::SetMplsTtl => "SET_MPLS_TTL",
            Self::DecMplsTtl => "DEC_MPLS_TTL",
            Self::PushVlan => "PUSH_VLAN",
            Self::PopVlan => "POP_VLAN",
            Self::PushMpls => "PUSH_MPLS",
            Self::PopMpls => "POP_MPLS",
            Self::SetQueue => "SET_QUEUE",
            Self::Group => "GROUP",
            Self::SetNwTtl => "SET_NW_TTL",
            Self::DecNwTtl => "DEC_NW_TTL",
            Self::SetField => "SET_FIELD",
            Self::PushPbb => "PUSH_PBB",
            Self::PopPbb => "POP_PBB",
            Self::Experimenter => "EXPERIMENTER",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|at| at.as_str() == upper)
            .ok_or_else(|| format!("Unknown action type: {}", s))
    }
}

/// A packet-processing action.
///
/// Under 1.0 a flow carries a list of these directly; under 1.3 they are
/// nested in apply-actions or write-actions instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Forward out a port. `max_len` bounds the bytes sent to the controller.
    Output { port: PortNumber, max_len: u16 },
    CopyTtlOut,
    CopyTtlIn,
    SetMplsTtl(u8),
    DecMplsTtl,
    /// Push a VLAN tag with the given TPID ethertype.
    PushVlan(u16),
    PopVlan,
    PushMpls(u16),
    /// Pop an MPLS label, leaving the given payload ethertype.
    PopMpls(u16),
    SetQueue(u32),
    Group(u32),
    SetNwTtl(u8),
    DecNwTtl,
    /// Rewrite a header field to the carried value.
    SetField(MatchField),
    PushPbb(u16),
    PopPbb,
    Experimenter(u32),
}

impl Action {
    /// Largest `max_len` that still requests bytes rather than the whole
    /// packet; used when stealing packets to the controller.
    pub const CONTROLLER_MAX: u16 = 0xffe5;

    /// Output to a port with no byte limit.
    pub const fn output(port: PortNumber) -> Self {
        Action::Output { port, max_len: 0 }
    }

    /// Output to the controller with the given byte limit.
    pub const fn to_controller(max_len: u16) -> Self {
        Action::Output {
            port: PortNumber::CONTROLLER,
            max_len,
        }
    }

    /// Returns the type tag of this action.
    pub const fn action_type(&self) -> ActionType {
        match self {
            Self::Output { .. } => ActionType::Output,
            Self::CopyTtlOut => ActionType::CopyTtlOut,
            Self::CopyTtlIn => ActionType::CopyTtlIn,
            Self::SetMplsTtl(_) => ActionType::SetMplsTtl,
            Self::DecMplsTtl => ActionType::DecMplsTtl,
            Self::PushVlan(_) => ActionType::PushVlan,
            Self::PopVlan => ActionType::PopVlan,
            Self::PushMpls(_) => ActionType::PushMpls,
            Self::PopMpls(_) => ActionType::PopMpls,
            Self::SetQueue(_) => ActionType::SetQueue,
            Self::Group(_) => ActionType::Group,
            Self::SetNwTtl(_) => ActionType::SetNwTtl,
            Self::DecNwTtl => ActionType::DecNwTtl,
            Self::SetField(_) => ActionType::SetField,
            Self::PushPbb(_) => ActionType::PushPbb,
            Self::PopPbb => ActionType::PopPbb,
            Self::Experimenter(_) => ActionType::Experimenter,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.action_type();
        match self {
            Self::Output { port, max_len } if *port == PortNumber::CONTROLLER => {
                write!(f, "{}:{}({})", at, port, max_len)
            }
            Self::Output { port, .. } => write!(f, "{}:{}", at, port),
            Self::SetMplsTtl(ttl) | Self::SetNwTtl(ttl) => write!(f, "{}:{}", at, ttl),
            Self::PushVlan(et) | Self::PushMpls(et) | Self::PopMpls(et) | Self::PushPbb(et) => {
                write!(f, "{}:0x{:04x}", at, et)
            }
            Self::SetQueue(id) | Self::Group(id) | Self::Experimenter(id) => {
                write!(f, "{}:{}", at, id)
            }
            Self::SetField(field) => write!(f, "{}:{}", at, field),
            Self::CopyTtlOut
            | Self::CopyTtlIn
            | Self::DecMplsTtl
            | Self::PopVlan
            | Self::DecNwTtl
            | Self::PopPbb => write!(f, "{}", at),
        }
    }
}
