//! OpenFlow flow rule model.
//!
//! This crate models the already-parsed content of a flow mod: what it
//! matches, what it does, and the opaque metadata that rides along with it.
//! It carries no wire encoding; the types exist so that placement logic can
//! reason about flows with exhaustive matches instead of integer codes.
//!
//! # Key Components
//!
//! - [`Match`]: set of [`MatchField`]s, at most one per [`FieldType`]
//! - [`Action`]: packet operation, tagged by [`ActionType`]
//! - [`Instruction`]: multi-table directive, tagged by [`InstructionType`]
//! - [`FlowBody`]: bare actions (1.0) or instructions (1.3)
//! - [`FlowMod`]: the complete rule, built with [`FlowModBuilder`]

mod action;
mod error;
mod field;
mod flow_mod;
mod instruction;
mod matching;

pub use action::{Action, ActionType};
pub use error::{FlowError, Result};
pub use field::{FieldType, MatchField};
pub use flow_mod::{FlowBody, FlowMod, FlowModBuilder, FlowModCommand, FlowModFlags};
pub use instruction::{Instruction, InstructionType};
pub use matching::{Match, MatchBuilder};
