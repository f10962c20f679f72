//! OpenFlow protocol primitives shared by the flow adjustment crates.
//!
//! This crate provides type-safe representations of the small values that
//! appear in flow rules and pipeline descriptions:
//!
//! - [`ProtocolVersion`]: negotiated OpenFlow protocol version
//! - [`TableId`]: flow table identifier
//! - [`PortNumber`]: switch port number, including reserved ports
//! - [`BufferId`]: datapath packet buffer identifier
//! - [`VlanVid`]: VLAN id as it appears in an OXM match
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`IpPrefix`]: IPv4/IPv6 address with prefix length

mod buffer;
mod ip;
mod mac;
mod port;
mod table;
mod version;
mod vlan;

pub use buffer::BufferId;
pub use ip::IpPrefix;
pub use mac::MacAddress;
pub use port::PortNumber;
pub use table::TableId;
pub use version::ProtocolVersion;
pub use vlan::VlanVid;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid VLAN id: {0} (must be 0-4095)")]
    InvalidVlanVid(u16),

    #[error("invalid table id: {0}")]
    InvalidTableId(String),

    #[error("invalid port number: {0}")]
    InvalidPortNumber(String),

    #[error("unknown protocol version: {0}")]
    InvalidProtocolVersion(String),
}
