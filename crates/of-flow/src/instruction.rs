//! Instructions: multi-table directives attached to a 1.3 flow.

use itertools::Itertools;
use of_types::TableId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::action::Action;

/// Instruction type tag, as advertised in a table's instruction capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstructionType {
    GotoTable,
    WriteMetadata,
    WriteActions,
    ApplyActions,
    ClearActions,
    Meter,
    Experimenter,
}

impl InstructionType {
    pub const ALL: [InstructionType; 7] = [
        Self::GotoTable,
        Self::WriteMetadata,
        Self::WriteActions,
        Self::ApplyActions,
        Self::ClearActions,
        Self::Meter,
        Self::Experimenter,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GotoTable => "GOTO_TABLE",
            Self::WriteMetadata => "WRITE_METADATA",
            Self::WriteActions => "WRITE_ACTIONS",
            Self::ApplyActions => "APPLY_ACTIONS",
            Self::ClearActions => "CLEAR_ACTIONS",
            Self::Meter => "METER",
            Self::Experimenter => "EXPERIMENTER",
        }
    }
}

impl fmt::Display for InstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstructionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|it| it.as_str() == upper)
            .ok_or_else(|| format!("Unknown instruction type: {}", s))
    }
}

/// A flow instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Continue processing in a later table.
    GotoTable(TableId),
    /// Write masked bits into the metadata register.
    WriteMetadata { metadata: u64, mask: u64 },
    /// Merge actions into the action set executed at pipeline exit.
    WriteActions(Vec<Action>),
    /// Execute actions immediately, in order.
    ApplyActions(Vec<Action>),
    /// Empty the action set.
    ClearActions,
    /// Direct the packet to a meter.
    Meter(u32),
    Experimenter(u32),
}

impl Instruction {
    /// Returns the type tag of this instruction.
    pub const fn instruction_type(&self) -> InstructionType {
        match self {
            Self::GotoTable(_) => InstructionType::GotoTable,
            Self::WriteMetadata { .. } => InstructionType::WriteMetadata,
            Self::WriteActions(_) => InstructionType::WriteActions,
            Self::ApplyActions(_) => InstructionType::ApplyActions,
            Self::ClearActions => InstructionType::ClearActions,
            Self::Meter(_) => InstructionType::Meter,
            Self::Experimenter(_) => InstructionType::Experimenter,
        }
    }

    /// Returns the goto target, if this is a goto-table instruction.
    pub const fn goto_target(&self) -> Option<TableId> {
        match self {
            Self::GotoTable(tid) => Some(*tid),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let it = self.instruction_type();
        match self {
            Self::GotoTable(tid) => write!(f, "{}:{}", it, tid),
            Self::WriteMetadata { metadata, mask } => {
                write!(f, "{}:0x{:x}/0x{:x}", it, metadata, mask)
            }
            Self::WriteActions(actions) | Self::ApplyActions(actions) => {
                write!(f, "{}[{}]", it, actions.iter().join(","))
            }
            Self::ClearActions => write!(f, "{}", it),
            Self::Meter(id) | Self::Experimenter(id) => write!(f, "{}:{}", it, id),
        }
    }
}
