//! Flow mod: a complete flow rule with its metadata.

use itertools::Itertools;
use of_types::{BufferId, PortNumber, TableId};
use std::fmt;

use crate::action::Action;
use crate::error::FlowError;
use crate::instruction::Instruction;
use crate::matching::Match;

/// Flow mod command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowModCommand {
    #[default]
    Add,
    Modify,
    ModifyStrict,
    Delete,
    DeleteStrict,
}

impl fmt::Display for FlowModCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Modify => write!(f, "MODIFY"),
            Self::ModifyStrict => write!(f, "MODIFY_STRICT"),
            Self::Delete => write!(f, "DELETE"),
            Self::DeleteStrict => write!(f, "DELETE_STRICT"),
        }
    }
}

/// Flow mod flags (`OFPFF_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlowModFlags {
    /// Send a flow-removed message when the flow expires or is deleted.
    pub send_flow_rem: bool,
    /// Refuse the add if it overlaps an existing flow.
    pub check_overlap: bool,
    pub reset_counts: bool,
    pub no_packet_counts: bool,
    pub no_byte_counts: bool,
}

impl FlowModFlags {
    /// Only `SEND_FLOW_REM` set.
    pub const fn send_flow_rem() -> Self {
        Self {
            send_flow_rem: true,
            check_overlap: false,
            reset_counts: false,
            no_packet_counts: false,
            no_byte_counts: false,
        }
    }
}

/// What a flow does when it matches.
///
/// 1.0 flows carry a bare action list; 1.3 flows carry instructions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlowBody {
    Actions(Vec<Action>),
    Instructions(Vec<Instruction>),
}

impl FlowBody {
    /// Returns the body as instructions, wrapping a bare action list in a
    /// single apply-actions instruction.
    pub fn to_instructions(&self) -> Vec<Instruction> {
        match self {
            FlowBody::Actions(actions) => vec![Instruction::ApplyActions(actions.clone())],
            FlowBody::Instructions(instructions) => instructions.clone(),
        }
    }

    pub fn is_instructions(&self) -> bool {
        matches!(self, FlowBody::Instructions(_))
    }
}

impl Default for FlowBody {
    fn default() -> Self {
        FlowBody::Instructions(Vec::new())
    }
}

impl fmt::Display for FlowBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowBody::Actions(actions) => write!(f, "actions=[{}]", actions.iter().join(",")),
            FlowBody::Instructions(instructions) => {
                write!(f, "instructions=[{}]", instructions.iter().join(","))
            }
        }
    }
}

/// A flow rule: match, body, optional table placement and metadata.
///
/// Everything other than `table_id`, `flow_match` and `body` is opaque to
/// placement and is carried through adjustment unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlowMod {
    pub command: FlowModCommand,
    /// Table the flow is placed in; `None` until placement decides.
    pub table_id: Option<TableId>,
    pub flow_match: Match,
    pub body: FlowBody,
    pub priority: u16,
    pub cookie: u64,
    pub cookie_mask: u64,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub buffer_id: BufferId,
    pub out_port: Option<PortNumber>,
    pub out_group: Option<u32>,
    pub flags: FlowModFlags,
}

impl FlowMod {
    /// Default priority for flows that do not set one (`OFP_DEFAULT_PRIORITY`).
    pub const DEFAULT_PRIORITY: u16 = 0x8000;

    /// Starts building a flow mod.
    pub fn builder() -> FlowModBuilder {
        FlowModBuilder::default()
    }

    /// Returns true if the flow has an empty match (a table-miss shape).
    pub fn is_table_miss(&self) -> bool {
        self.flow_match.is_match_all()
    }

    /// Returns the instructions, if the body is instruction based.
    pub fn instructions(&self) -> Option<&[Instruction]> {
        match &self.body {
            FlowBody::Instructions(instructions) => Some(instructions),
            FlowBody::Actions(_) => None,
        }
    }

    /// Returns the bare actions, if the body is action based.
    pub fn actions(&self) -> Option<&[Action]> {
        match &self.body {
            FlowBody::Actions(actions) => Some(actions),
            FlowBody::Instructions(_) => None,
        }
    }

    /// Returns a copy placed in the given table.
    pub fn placed_in(&self, table: TableId) -> FlowMod {
        FlowMod {
            table_id: Some(table),
            ..self.clone()
        }
    }

    /// Returns a copy with match and body replaced and metadata kept.
    pub fn reshaped(&self, flow_match: Match, body: FlowBody) -> FlowMod {
        FlowMod {
            flow_match,
            body,
            ..self.clone()
        }
    }
}

impl fmt::Display for FlowMod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlowMod({}, table=", self.command)?;
        match self.table_id {
            Some(tid) => write!(f, "{}", tid)?,
            None => write!(f, "-")?,
        }
        write!(
            f,
            ", prio={}, cookie=0x{:x}, match={}, {})",
            self.priority, self.cookie, self.flow_match, self.body
        )
    }
}

/// Builder for [`FlowMod`].
///
/// Uses a fluent API; actions and instructions are mutually exclusive.
#[derive(Debug, Clone)]
pub struct FlowModBuilder {
    command: FlowModCommand,
    table_id: Option<TableId>,
    flow_match: Match,
    actions: Option<Vec<Action>>,
    instructions: Option<Vec<Instruction>>,
    priority: u16,
    cookie: u64,
    cookie_mask: u64,
    idle_timeout: u16,
    hard_timeout: u16,
    buffer_id: BufferId,
    out_port: Option<PortNumber>,
    out_group: Option<u32>,
    flags: FlowModFlags,
}

impl Default for FlowModBuilder {
    fn default() -> Self {
        Self {
            command: FlowModCommand::Add,
            table_id: None,
            flow_match: Match::all(),
            actions: None,
            instructions: None,
            priority: FlowMod::DEFAULT_PRIORITY,
            cookie: 0,
            cookie_mask: 0,
            idle_timeout: 0,
            hard_timeout: 0,
            buffer_id: BufferId::NO_BUFFER,
            out_port: None,
            out_group: None,
            flags: FlowModFlags::default(),
        }
    }
}

impl FlowModBuilder {
    pub fn command(mut self, command: FlowModCommand) -> Self {
        self.command = command;
        self
    }

    pub fn table_id(mut self, table: TableId) -> Self {
        self.table_id = Some(table);
        self
    }

    pub fn flow_match(mut self, flow_match: Match) -> Self {
        self.flow_match = flow_match;
        self
    }

    /// Appends a bare (1.0 style) action.
    pub fn action(mut self, action: Action) -> Self {
        self.actions.get_or_insert_with(Vec::new).push(action);
        self
    }

    /// Appends several bare actions.
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.get_or_insert_with(Vec::new).extend(actions);
        self
    }

    /// Appends an instruction.
    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.instructions
            .get_or_insert_with(Vec::new)
            .push(instruction);
        self
    }

    /// Appends several instructions.
    pub fn instructions(mut self, instructions: impl IntoIterator<Item = Instruction>) -> Self {
        self.instructions
            .get_or_insert_with(Vec::new)
            .extend(instructions);
        self
    }

    pub fn priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    pub fn cookie(mut self, cookie: u64) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn cookie_mask(mut self, mask: u64) -> Self {
        self.cookie_mask = mask;
        self
    }

    pub fn idle_timeout(mut self, seconds: u16) -> Self {
        self.idle_timeout = seconds;
        self
    }

    pub fn hard_timeout(mut self, seconds: u16) -> Self {
        self.hard_timeout = seconds;
        self
    }

    pub fn buffer_id(mut self, buffer_id: BufferId) -> Self {
        self.buffer_id = buffer_id;
        self
    }

    pub fn out_port(mut self, port: PortNumber) -> Self {
        self.out_port = Some(port);
        self
    }

    pub fn out_group(mut self, group: u32) -> Self {
        self.out_group = Some(group);
        self
    }

    pub fn flags(mut self, flags: FlowModFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Builds the flow mod.
    ///
    /// A flow with neither actions nor instructions gets an empty
    /// instruction list (drop).
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::MixedBody`] if both actions and instructions
    /// were supplied.
    pub fn build(self) -> Result<FlowMod, FlowError> {
        let body = match (self.actions, self.instructions) {
            (Some(_), Some(_)) => return Err(FlowError::MixedBody),
            (Some(actions), None) => FlowBody::Actions(actions),
            (None, Some(instructions)) => FlowBody::Instructions(instructions),
            (None, None) => FlowBody::default(),
        };

        Ok(FlowMod {
            command: self.command,
            table_id: self.table_id,
            flow_match: self.flow_match,
            body,
            priority: self.priority,
            cookie: self.cookie,
            cookie_mask: self.cookie_mask,
            idle_timeout: self.idle_timeout,
            hard_timeout: self.hard_timeout,
            buffer_id: self.buffer_id,
            out_port: self.out_port,
            out_group: self.out_group,
            flags: self.flags,
        })
    }
}
