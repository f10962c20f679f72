//! OpenFlow flow mod adjuster.
//!
//! Given a flow rule issued by a controller application and the table
//! pipeline of a particular device, decides where the rule goes: as is,
//! narrowed and chained across tables, relocated to a more capable table,
//! rejected, or dropped as a duplicate of the pipeline's own table-miss
//! wiring. Also synthesizes those table-miss defaults.
//!
//! # Architecture
//!
//! ```text
//! FlowModAdjuster ── configure(version, pipeline, hybrid) ──┐
//!        │                                                  │
//!        ├── 1.0 ──> SingleTable  (identity)                │
//!        └── 1.3 ──> MultiTable   (miss-chain placement) <──┘
//!                         │
//!                         └── PipelineDefinition / TableContext
//! ```
//!
//! The adjuster performs no I/O. Once configured it holds only immutable
//! state and can be shared across threads.

mod adjuster;
mod config;
mod defaults;
mod error;
mod multi_table;
mod single_table;
mod support;

pub use adjuster::{FlowModAdjuster, PlacementStrategy};
pub use config::AdjusterConfig;
pub use defaults::{
    default_action, default_flow, normal_action, pipeline_defaults, single_table_default,
    steal_action, table_default, DEFAULT_FLOW_COOKIE, DEFAULT_FLOW_PRIORITY,
};
pub use error::{AdjustError, Result};
pub use multi_table::MultiTable;
pub use single_table::SingleTable;
