//! Capability classes and kinds used to query a table.

use of_flow::{ActionType, InstructionType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Context under which a table's support for an instruction or action is
/// queried.
///
/// A table may accept an action when applied immediately but not when
/// written to the action set, and may accept a different set again for its
/// table-miss rule. Each query must use the class that matches the rule
/// being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapabilityClass {
    /// Instructions accepted on a regular rule.
    Instructions,
    /// Instructions accepted on the table-miss rule.
    InstructionsMiss,
    /// Actions accepted inside apply-actions.
    Apply,
    /// Actions accepted inside apply-actions of the table-miss rule.
    ApplyMiss,
    /// Actions accepted inside write-actions.
    Write,
    /// Actions accepted inside write-actions of the table-miss rule.
    WriteMiss,
}

impl CapabilityClass {
    pub const fn instructions(miss: bool) -> Self {
        if miss {
            Self::InstructionsMiss
        } else {
            Self::Instructions
        }
    }

    pub const fn apply(miss: bool) -> Self {
        if miss {
            Self::ApplyMiss
        } else {
            Self::Apply
        }
    }

    pub const fn write(miss: bool) -> Self {
        if miss {
            Self::WriteMiss
        } else {
            Self::Write
        }
    }

    /// Returns true for the table-miss variants.
    pub const fn is_miss(&self) -> bool {
        matches!(
            self,
            Self::InstructionsMiss | Self::ApplyMiss | Self::WriteMiss
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Instructions => "INSTRUCTIONS",
            Self::InstructionsMiss => "INSTRUCTIONS_MISS",
            Self::Apply => "APPLY_ACTIONS",
            Self::ApplyMiss => "APPLY_ACTIONS_MISS",
            Self::Write => "WRITE_ACTIONS",
            Self::WriteMiss => "WRITE_ACTIONS_MISS",
        }
    }
}

impl fmt::Display for CapabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The instruction or action kind a capability query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Instruction(InstructionType),
    Action(ActionType),
}

impl From<InstructionType> for CapabilityKind {
    fn from(it: InstructionType) -> Self {
        Self::Instruction(it)
    }
}

impl From<ActionType> for CapabilityKind {
    fn from(at: ActionType) -> Self {
        Self::Action(at)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instruction(it) => write!(f, "instruction {}", it),
            Self::Action(at) => write!(f, "action {}", at),
        }
    }
}
