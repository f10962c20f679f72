//! Datapath packet buffer identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a packet buffered on the datapath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BufferId(u32);

impl BufferId {
    /// No buffered packet is associated with the message.
    pub const NO_BUFFER: BufferId = BufferId(0xffff_ffff);

    pub const fn new(raw: u32) -> Self {
        BufferId(raw)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    pub const fn is_buffered(&self) -> bool {
        self.0 != Self::NO_BUFFER.0
    }
}

impl Default for BufferId {
    fn default() -> Self {
        Self::NO_BUFFER
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_buffered() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "NO_BUFFER")
        }
    }
}
