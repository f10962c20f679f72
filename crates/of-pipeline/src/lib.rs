//! Switch table pipeline description.
//!
//! A pipeline is the ordered set of flow tables a device exposes, together
//! with what each table can match on, which instructions and actions it
//! accepts under each capability class, and where it chains on a miss.
//!
//! Placement logic consumes a pipeline through two traits:
//!
//! - [`PipelineDefinition`]: topology (which tables exist, in what order)
//! - [`TableContext`]: capability oracle for a single table
//!
//! [`Pipeline`] and [`TableFeatures`] are the in-memory implementations,
//! buildable in code or loaded from JSON/YAML via [`PipelineConfig`].

mod capability;
mod config;
mod context;
mod error;
mod features;
mod pipeline;

pub use capability::{CapabilityClass, CapabilityKind};
pub use config::PipelineConfig;
pub use context::{PipelineDefinition, TableContext};
pub use error::{PipelineError, Result};
pub use features::{TableFeatures, TableFeaturesBuilder};
pub use pipeline::{Pipeline, PipelineBuilder};
