//! Single-table (1.0) placement.

use of_flow::FlowMod;

use crate::adjuster::PlacementStrategy;
use crate::defaults::single_table_default;
use crate::error::Result;

/// Placement for devices with one implicit flow table.
///
/// Flows pass through untouched; there is no capability information to
/// check against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleTable;

impl PlacementStrategy for SingleTable {
    fn adjust(&self, flow: &FlowMod) -> Result<Vec<FlowMod>> {
        Ok(vec![flow.clone()])
    }

    fn defaults(&self, hybrid_mode: bool) -> Result<Vec<FlowMod>> {
        Ok(vec![single_table_default(hybrid_mode)])
    }
}
