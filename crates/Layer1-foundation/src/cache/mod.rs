//! Cache key policy
//!
//! - `keys`: `DataKind` and the deterministic `CacheKey` per kind
//! - `teams`: team-code aliases shared by keys, loaders and the provider

mod keys;
mod teams;

pub use keys::{CacheKey, DataKind};
pub use teams::{is_known_team, normalize_team, TEAM_DIRECTORY};
