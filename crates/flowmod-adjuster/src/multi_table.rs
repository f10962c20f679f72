//! Multi-table (1.3) placement.
//!
//! A flow without a table assignment enters the pipeline at the entry table
//! and walks the miss chain until some table can host it:
//!
//! - A table that matches only part of the flow gets a narrowed pass-through
//!   rule (supported fields, goto the miss target). The full flow continues
//!   at the miss target.
//! - A table that matches the whole flow but rejects one of its instructions
//!   is skipped, and the unmodified flow moves on to the miss target. From
//!   then on no narrowing is attempted.
//!
//! Every table is visited at most once. Emitted rules that are structurally
//! identical to their table's default flow are dropped, since the default
//! flows already install them.

use of_flow::{FlowBody, FlowMod, Instruction};
use of_pipeline::{CapabilityKind, PipelineDefinition, TableContext};
use of_types::TableId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::adjuster::PlacementStrategy;
use crate::defaults::{is_table_default, pipeline_defaults};
use crate::error::{AdjustError, Result};
use crate::support::{check_instructions, unsupported_fields};

/// Placement for devices with a multi-table pipeline.
#[derive(Debug, Clone)]
pub struct MultiTable {
    pipeline: Arc<dyn PipelineDefinition>,
    hybrid_mode: bool,
}

impl MultiTable {
    pub fn new(pipeline: Arc<dyn PipelineDefinition>, hybrid_mode: bool) -> Self {
        Self {
            pipeline,
            hybrid_mode,
        }
    }

    pub fn hybrid_mode(&self) -> bool {
        self.hybrid_mode
    }

    fn context(&self, table: TableId) -> Result<&dyn TableContext> {
        self.pipeline
            .table_context(table)
            .ok_or(AdjustError::UnknownTable { table })
    }

    /// Checks a flow that already names its table; it is returned as is.
    fn validate_placed(&self, flow: FlowMod, table_id: TableId) -> Result<Vec<FlowMod>> {
        let table = self.context(table_id)?;

        let missing = unsupported_fields(table, &flow.flow_match);
        if !missing.is_empty() {
            return Err(AdjustError::UnsupportedMatch {
                fields: missing,
                table: table_id,
            });
        }

        let instructions = flow.body.to_instructions();
        check_instructions(table, &instructions, flow.is_table_miss())
            .map_err(|kind| AdjustError::unsupported(kind, table_id))?;

        Ok(vec![flow])
    }

    /// Walks the miss chain from `entry` and places `flow`.
    fn place(&self, flow: &FlowMod, entry: TableId) -> Result<Vec<FlowMod>> {
        let instructions = flow.body.to_instructions();
        let miss = flow.is_table_miss();

        let mut placed = Vec::new();
        let mut visited = HashSet::new();
        let mut relocating: Option<CapabilityKind> = None;
        let mut current = entry;

        loop {
            if !visited.insert(current) {
                return Err(AdjustError::MissChainCycle { table: current });
            }
            let table = self.context(current)?;
            let missing = unsupported_fields(table, &flow.flow_match);

            if missing.is_empty() {
                match check_instructions(table, &instructions, miss) {
                    Ok(()) => {
                        let rule = flow.placed_in(current);
                        if is_table_default(table, &rule, self.hybrid_mode) {
                            debug!(table = %current, "flow duplicates table default, suppressed");
                        } else {
                            debug!(table = %current, "flow placed");
                            placed.push(rule);
                        }
                        return Ok(placed);
                    }
                    Err(kind) => {
                        let Some(next) = table.miss_target() else {
                            return Err(AdjustError::unsupported(kind, current));
                        };
                        debug!(table = %current, %kind, %next, "relocating flow to miss target");
                        relocating = Some(kind);
                        current = next;
                    }
                }
                continue;
            }

            let Some(next) = table.miss_target() else {
                return Err(match relocating {
                    Some(kind) => AdjustError::unsupported(kind, current),
                    None => AdjustError::UnsupportedMatch {
                        fields: missing,
                        table: current,
                    },
                });
            };

            if relocating.is_some() {
                debug!(table = %current, %next, "table cannot match relocated flow, skipping");
                current = next;
                continue;
            }

            let narrowed = flow
                .reshaped(
                    flow.flow_match
                        .retain_types(|ft| table.supports_match_field(ft)),
                    FlowBody::Instructions(vec![Instruction::GotoTable(next)]),
                )
                .placed_in(current);

            if is_table_default(table, &narrowed, self.hybrid_mode) {
                debug!(table = %current, %next, "pass-through duplicates table default, suppressed");
            } else {
                let goto = narrowed.body.to_instructions();
                check_instructions(table, &goto, narrowed.is_table_miss())
                    .map_err(|kind| AdjustError::unsupported(kind, current))?;
                debug!(
                    table = %current,
                    %next,
                    narrowed = %narrowed.flow_match,
                    "narrowed match, chaining to miss target"
                );
                placed.push(narrowed);
            }
            current = next;
        }
    }
}

impl PlacementStrategy for MultiTable {
    fn adjust(&self, flow: &FlowMod) -> Result<Vec<FlowMod>> {
        let normalized = normalize(flow);

        let Some(entry) = self
            .pipeline
            .entry_table()
            .filter(|_| self.pipeline.has_tables())
        else {
            return Ok(vec![normalized.placed_in(TableId::BASE)]);
        };

        match normalized.table_id {
            Some(table_id) => self.validate_placed(normalized, table_id),
            None => self.place(&normalized, entry),
        }
    }

    fn defaults(&self, hybrid_mode: bool) -> Result<Vec<FlowMod>> {
        pipeline_defaults(self.pipeline.as_ref(), hybrid_mode)
    }
}

/// Wraps a bare action list into a single apply-actions instruction.
fn normalize(flow: &FlowMod) -> FlowMod {
    if flow.body.is_instructions() {
        return flow.clone();
    }
    FlowMod {
        body: FlowBody::Instructions(flow.body.to_instructions()),
        ..flow.clone()
    }
}
