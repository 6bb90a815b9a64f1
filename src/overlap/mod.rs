// Community overlap discovery — expanding a seed community into the set
// of communities whose audiences disproportionately co-occur with it.

pub mod discover;
pub mod stats;

pub use discover::{discover, CommunityOverlapScore};
pub use stats::{CommunityStatsProvider, SubredditStatsClient};
