//! Table-miss default flows.
//!
//! Every table gets a match-all, priority 0 rule deciding what happens to
//! packets nothing else matched. In hybrid mode that is normal forwarding at
//! every stage. Otherwise chaining tables jump to their miss target and the
//! last table steals to the controller.

use of_flow::{Action, FlowBody, FlowMod, FlowModCommand, FlowModFlags, Instruction, Match};
use of_pipeline::{PipelineDefinition, TableContext};
use of_types::{BufferId, PortNumber, TableId};

use crate::error::{AdjustError, Result};

/// Cookie carried by every synthesized default flow.
pub const DEFAULT_FLOW_COOKIE: u64 = 0xffff_0000_0000_0000;

/// Priority of synthesized default flows.
pub const DEFAULT_FLOW_PRIORITY: u16 = 0;

/// Forward the packet through the switch's conventional pipeline.
pub const fn normal_action() -> Action {
    Action::output(PortNumber::NORMAL)
}

/// Send the packet to the controller.
pub const fn steal_action() -> Action {
    Action::to_controller(Action::CONTROLLER_MAX)
}

/// Action applied by a terminal table's default flow.
pub const fn default_action(hybrid_mode: bool) -> Action {
    if hybrid_mode {
        normal_action()
    } else {
        steal_action()
    }
}

/// Match-all flow with default metadata and the given placement and body.
pub fn default_flow(table_id: Option<TableId>, body: FlowBody) -> FlowMod {
    FlowMod {
        command: FlowModCommand::Add,
        table_id,
        flow_match: Match::all(),
        body,
        priority: DEFAULT_FLOW_PRIORITY,
        cookie: DEFAULT_FLOW_COOKIE,
        cookie_mask: 0,
        idle_timeout: 0,
        hard_timeout: 0,
        buffer_id: BufferId::NO_BUFFER,
        out_port: None,
        out_group: None,
        flags: FlowModFlags::send_flow_rem(),
    }
}

/// The single default flow of a single-table device.
pub fn single_table_default(hybrid_mode: bool) -> FlowMod {
    default_flow(None, FlowBody::Actions(vec![default_action(hybrid_mode)]))
}

/// Instructions of a table's default flow.
pub(crate) fn table_default_instructions(
    table: &dyn TableContext,
    hybrid_mode: bool,
) -> Vec<Instruction> {
    match table.miss_target() {
        Some(target) if !hybrid_mode => vec![Instruction::GotoTable(target)],
        _ => vec![Instruction::ApplyActions(vec![default_action(hybrid_mode)])],
    }
}

/// Default flow of one table.
pub fn table_default(table: &dyn TableContext, hybrid_mode: bool) -> FlowMod {
    default_flow(
        Some(table.table_id()),
        FlowBody::Instructions(table_default_instructions(table, hybrid_mode)),
    )
}

/// Default flows for every table of a multi-table pipeline, in pipeline
/// order. With no known tables, one flow in the base table.
pub fn pipeline_defaults(
    pipeline: &dyn PipelineDefinition,
    hybrid_mode: bool,
) -> Result<Vec<FlowMod>> {
    if !pipeline.has_tables() {
        return Ok(vec![default_flow(
            Some(TableId::BASE),
            FlowBody::Instructions(vec![Instruction::ApplyActions(vec![default_action(
                hybrid_mode,
            )])]),
        )]);
    }

    pipeline
        .table_ids()
        .into_iter()
        .map(|tid| {
            pipeline
                .table_context(tid)
                .map(|table| table_default(table, hybrid_mode))
                .ok_or(AdjustError::UnknownTable { table: tid })
        })
        .collect()
}

/// Returns true if `flow` is structurally the default flow its table would
/// receive: same table, empty match, same instructions.
pub(crate) fn is_table_default(table: &dyn TableContext, flow: &FlowMod, hybrid_mode: bool) -> bool {
    flow.table_id == Some(table.table_id())
        && flow.flow_match.is_match_all()
        && flow.body == FlowBody::Instructions(table_default_instructions(table, hybrid_mode))
}
