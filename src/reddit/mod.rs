// Primary platform — Reddit public listings and the combinatorial harvester.

pub mod client;
pub mod harvest;

pub use client::RedditClient;
pub use harvest::{harvest, RetrievalStrategy, TimeFilter};
