//! Upstream service clients

pub mod mlb_stats;
pub mod savant;
