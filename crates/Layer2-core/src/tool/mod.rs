//! Tool System - the baseball tools exposed over MCP
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ToolRegistry                                               │
//! │  ├── register(tool)                                         │
//! │  ├── get(name)                                              │
//! │  └── all() - sorted by name, for tools/list                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Builtin Tools (Tool trait)                                 │
//! │  ├── players: get_player_stats, compare_players,            │
//! │  │            similarity_score                              │
//! │  ├── teams:   get_team_stats, list_team_abbreviations       │
//! │  ├── games:   get_schedule, get_game_log, get_standings     │
//! │  ├── statcast: get_statcast                                 │
//! │  └── reference: park_factors                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tools parse their JSON input, call a loader with the context's store and
//! provider, and render the table as tab-separated text.

pub mod builtin;
mod registry;

pub use baseball_foundation::{Tool, ToolContext};

pub use builtin::{
    all_tools, ComparePlayersTool, GetGameLogTool, GetPlayerStatsTool, GetScheduleTool,
    GetStandingsTool, GetStatcastTool, GetTeamStatsTool, ListTeamAbbreviationsTool,
    ParkFactorsTool, SimilarityScoreTool,
};
pub use registry::ToolRegistry;
