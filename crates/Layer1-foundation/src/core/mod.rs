//! Core Module - interfaces shared by every layer
//!
//! - `types.rs`: values crossing the provider seam (`DivisionStandings`, `StatcastType`)
//! - `traits.rs`: interfaces (`StatsProvider`, `Tool`, `ToolContext`)

mod traits;
mod types;

pub use traits::{StatsProvider, Tool, ToolContext, ToolMeta, ToolResult};
pub use types::{DivisionStandings, StatcastType};
