// Terminal presentation of run results.

pub mod terminal;

pub use terminal::{display_bank, display_overlaps, display_summary};
