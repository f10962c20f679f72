//! Flow table identifier.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a flow table within a datapath pipeline.
///
/// Table 0 is the base table: the only table of a 1.0 datapath and the
/// entry point of packet processing for later versions. 0xff is the wire
/// wildcard ("all tables") and is never a valid placement.
///
/// # Examples
///
/// ```
/// use of_types::TableId;
///
/// let tid: TableId = "100".parse().unwrap();
/// assert_eq!(tid.as_u8(), 100);
/// assert!(TableId::BASE.is_base());
/// assert!("255".parse::<TableId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TableId(u8);

impl TableId {
    /// The base table (table 0).
    pub const BASE: TableId = TableId(0);

    /// Largest table id a flow may be placed in.
    pub const MAX: u8 = 0xfe;

    /// Wire value meaning "all tables".
    pub const ALL: u8 = 0xff;

    /// Creates a table id.
    ///
    /// # Errors
    ///
    /// Returns an error for the reserved "all tables" value.
    pub fn new(id: u8) -> Result<Self, ParseError> {
        if id <= Self::MAX {
            Ok(TableId(id))
        } else {
            Err(ParseError::InvalidTableId(id.to_string()))
        }
    }

    /// Returns the raw table number.
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Returns true for the base table.
    pub const fn is_base(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u8 = s
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidTableId(s.to_string()))?;
        TableId::new(raw)
    }
}

impl TryFrom<u8> for TableId {
    type Error = ParseError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        TableId::new(id)
    }
}

impl From<TableId> for u8 {
    fn from(tid: TableId) -> u8 {
        tid.0
    }
}
