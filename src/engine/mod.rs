//! Assignment status engine.
//!
//! Pure functions of their inputs: nothing here reads a clock, touches the
//! database or keeps state between calls.

pub mod countdown;
pub mod status;
pub mod summary;

pub use countdown::{CountdownBreakdown, countdown};
pub use status::{AssignmentStatus, TimeWindow, classify};
pub use summary::{AssignmentSummary, summarize};
