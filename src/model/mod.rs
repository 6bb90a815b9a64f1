// Shared data model — post records, identity, windows, quotas.

pub mod dedup;
pub mod post;
pub mod quota;
pub mod window;

pub use dedup::DedupIndex;
pub use post::{PostRecord, SourceId};
pub use quota::QuotaSpec;
pub use window::DateWindow;
