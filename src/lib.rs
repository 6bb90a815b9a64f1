// Magpie: community-overlap driven discourse aggregation.
//
// This is the library root. Each module corresponds to a stage of the
// aggregation pipeline, in data-flow order: overlap discovery expands a
// seed community, the reddit harvester collects primary posts, hashtag
// extraction derives a term bank, and the fan-out pipeline distributes
// it to the secondary source collectors.

pub mod config;
pub mod error;
pub mod hashtags;
pub mod model;
pub mod output;
pub mod overlap;
pub mod pipeline;
pub mod reddit;
pub mod sources;
