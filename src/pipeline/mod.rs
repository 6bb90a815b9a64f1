// The aggregation pipeline — fan-out, sampling, and the run driver.

pub mod fanout;
pub mod run;
pub mod sampling;

pub use fanout::{fanout, FanoutResult};
pub use run::{run, AggregateRun, PipelineDeps};
pub use sampling::sample;
