//! # baseball-provider
//!
//! Live implementation of the upstream fetch contract.
//!
//! ## Features
//! - MLB Stats API (JSON): season hitting, team hitting, schedules, standings
//! - Baseball Savant (CSV): pitch-level Statcast events
//! - Automatic retry with exponential backoff, honouring HTTP 429

pub mod error;
pub mod gateway;
pub mod providers;
pub mod retry;

pub use gateway::StatsGateway;

// Error and retry
pub use error::ProviderError;
pub use retry::{with_retry, RetryConfig};

// Clients
pub use providers::mlb_stats::{MlbStatsClient, TeamDirectory, TeamInfo};
pub use providers::savant::{PlayerFilter, SavantClient};
