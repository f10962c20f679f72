//! Match field types and values.
//!
//! Field types correspond to the OXM basic class fields a table can
//! advertise in its match capability.

use of_types::{IpPrefix, MacAddress, PortNumber, VlanVid};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FlowError;

/// OXM basic match field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    InPort,
    Metadata,
    EthDst,
    EthSrc,
    EthType,
    VlanVid,
    VlanPcp,
    IpDscp,
    IpEcn,
    IpProto,
    Ipv4Src,
    Ipv4Dst,
    TcpSrc,
    TcpDst,
    UdpSrc,
    UdpDst,
    Icmpv4Type,
    Icmpv4Code,
    ArpOp,
    ArpSpa,
    ArpTpa,
    Ipv6Src,
    Ipv6Dst,
    Icmpv6Type,
    Icmpv6Code,
    MplsLabel,
    TunnelId,
}

impl FieldType {
    /// Every field type, in OXM code order.
    pub const ALL: [FieldType; 27] = [
        Self::InPort,
        Self::Metadata,
        Self::EthDst,
        Self::EthSrc,
        Self::EthType,
        Self::VlanVid,
        Self::VlanPcp,
        Self::IpDscp,
        Self::IpEcn,
        Self::IpProto,
        Self::Ipv4Src,
        Self::Ipv4Dst,
        Self::TcpSrc,
        Self::TcpDst,
        Self::UdpSrc,
        Self::UdpDst,
        Self::Icmpv4Type,
        Self::Icmpv4Code,
        Self::ArpOp,
        Self::ArpSpa,
        Self::ArpTpa,
        Self::Ipv6Src,
        Self::Ipv6Dst,
        Self::Icmpv6Type,
        Self::Icmpv6Code,
        Self::MplsLabel,
        Self::TunnelId,
    ];

    /// Returns the canonical upper-case name (e.g. `ETH_TYPE`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InPort => "IN_PORT",
            Self::Metadata => "METADATA",
            Self::EthDst => "ETH_DST",
            Self::EthSrc => "ETH_SRC",
            Self::EthType => "ETH_TYPE",
            Self::VlanVid => "VLAN_VID",
            Self::VlanPcp => "VLAN_PCP",
            Self::IpDscp => "IP_DSCP",
            Self::IpEcn => "IP_ECN",
            Self::IpProto => "IP_PROTO",
            Self::Ipv4Src => "IPV4_SRC",
            Self::Ipv4Dst => "IPV4_DST",
            Self::TcpSrc => "TCP_SRC",
            Self::TcpDst => "TCP_DST",
            Self::UdpSrc => "UDP_SRC",
            Self::UdpDst => "UDP_DST",
            Self::Icmpv4Type => "ICMPV4_TYPE",
            Self::Icmpv4Code => "ICMPV4_CODE",
            Self::ArpOp => "ARP_OP",
            Self::ArpSpa => "ARP_SPA",
            Self::ArpTpa => "ARP_TPA",
            Self::Ipv6Src => "IPV6_SRC",
            Self::Ipv6Dst => "IPV6_DST",
            Self::Icmpv6Type => "ICMPV6_TYPE",
            Self::Icmpv6Code => "ICMPV6_CODE",
            Self::MplsLabel => "MPLS_LABEL",
            Self::TunnelId => "TUNNEL_ID",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|ft| ft.as_str() == upper)
            .ok_or_else(|| format!("Unknown match field type: {}", s))
    }
}

/// A match field type together with the value it must equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    InPort(PortNumber),
    Metadata { value: u64, mask: Option<u64> },
    EthDst(MacAddress),
    EthSrc(MacAddress),
    EthType(u16),
    VlanVid(VlanVid),
    VlanPcp(u8),
    IpDscp(u8),
    IpEcn(u8),
    IpProto(u8),
    Ipv4Src(IpPrefix),
    Ipv4Dst(IpPrefix),
    TcpSrc(u16),
    TcpDst(u16),
    UdpSrc(u16),
    UdpDst(u16),
    Icmpv4Type(u8),
    Icmpv4Code(u8),
    ArpOp(u16),
    ArpSpa(IpPrefix),
    ArpTpa(IpPrefix),
    Ipv6Src(IpPrefix),
    Ipv6Dst(IpPrefix),
    Icmpv6Type(u8),
    Icmpv6Code(u8),
    MplsLabel(u32),
    TunnelId { value: u64, mask: Option<u64> },
}

impl MatchField {
    /// Returns the type tag of this field.
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::InPort(_) => FieldType::InPort,
            Self::Metadata { .. } => FieldType::Metadata,
            Self::EthDst(_) => FieldType::EthDst,
            Self::EthSrc(_) => FieldType::EthSrc,
            Self::EthType(_) => FieldType::EthType,
            Self::VlanVid(_) => FieldType::VlanVid,
            Self::VlanPcp(_) => FieldType::VlanPcp,
            Self::IpDscp(_) => FieldType::IpDscp,
            Self::IpEcn(_) => FieldType::IpEcn,
            Self::IpProto(_) => FieldType::IpProto,
            Self::Ipv4Src(_) => FieldType::Ipv4Src,
            Self::Ipv4Dst(_) => FieldType::Ipv4Dst,
            Self::TcpSrc(_) => FieldType::TcpSrc,
            Self::TcpDst(_) => FieldType::TcpDst,
            Self::UdpSrc(_) => FieldType::UdpSrc,
            Self::UdpDst(_) => FieldType::UdpDst,
            Self::Icmpv4Type(_) => FieldType::Icmpv4Type,
            Self::Icmpv4Code(_) => FieldType::Icmpv4Code,
            Self::ArpOp(_) => FieldType::ArpOp,
            Self::ArpSpa(_) => FieldType::ArpSpa,
            Self::ArpTpa(_) => FieldType::ArpTpa,
            Self::Ipv6Src(_) => FieldType::Ipv6Src,
            Self::Ipv6Dst(_) => FieldType::Ipv6Dst,
            Self::Icmpv6Type(_) => FieldType::Icmpv6Type,
            Self::Icmpv6Code(_) => FieldType::Icmpv6Code,
            Self::MplsLabel(_) => FieldType::MplsLabel,
            Self::TunnelId { .. } => FieldType::TunnelId,
        }
    }

    /// Checks that the value fits the field's width and address family.
    pub fn validate(&self) -> Result<(), FlowError> {
        let reason = match self {
            Self::VlanPcp(pcp) if *pcp > 7 => Some(format!("priority {} exceeds 7", pcp)),
            Self::IpDscp(dscp) if *dscp > 63 => Some(format!("dscp {} exceeds 63", dscp)),
            Self::IpEcn(ecn) if *ecn > 3 => Some(format!("ecn {} exceeds 3", ecn)),
            Self::MplsLabel(label) if *label > 0x000f_ffff => {
                Some(format!("label {} exceeds 20 bits", label))
            }
            Self::Ipv4Src(p) | Self::Ipv4Dst(p) | Self::ArpSpa(p) | Self::ArpTpa(p)
                if !p.is_ipv4() =>
            {
                Some(format!("{} is not an IPv4 prefix", p))
            }
            Self::Ipv6Src(p) | Self::Ipv6Dst(p) if !p.is_ipv6() => {
                Some(format!("{} is not an IPv6 prefix", p))
            }
            _ => None,
        };

        match reason {
            Some(reason) => Err(FlowError::InvalidFieldValue {
                field: self.field_type(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ft = self.field_type();
        match self {
            Self::InPort(port) => write!(f, "{}={}", ft, port),
            Self::Metadata { value, mask } | Self::TunnelId { value, mask } => match mask {
                Some(m) => write!(f, "{}=0x{:x}/0x{:x}", ft, value, m),
                None => write!(f, "{}=0x{:x}", ft, value),
            },
            Self::EthDst(mac) | Self::EthSrc(mac) => write!(f, "{}={}", ft, mac),
            Self::EthType(et) | Self::ArpOp(et) => write!(f, "{}=0x{:04x}", ft, et),
            Self::VlanVid(vid) => write!(f, "{}={}", ft, vid),
            Self::VlanPcp(v)
            | Self::IpDscp(v)
            | Self::IpEcn(v)
            | Self::IpProto(v)
            | Self::Icmpv4Type(v)
            | Self::Icmpv4Code(v)
            | Self::Icmpv6Type(v)
            | Self::Icmpv6Code(v) => write!(f, "{}={}", ft, v),
            Self::Ipv4Src(p)
            | Self::Ipv4Dst(p)
            | Self::ArpSpa(p)
            | Self::ArpTpa(p)
            | Self::Ipv6Src(p)
            | Self::Ipv6Dst(p) => write!(f, "{}={}", ft, p),
            Self::TcpSrc(port) | Self::TcpDst(port) | Self::UdpSrc(port) | Self::UdpDst(port) => {
                write!(f, "{}={}", ft, port)
            }
            Self::MplsLabel(label) => write!(f, "{}={}", ft, label),
        }
    }
}
