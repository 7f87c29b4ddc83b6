//! Integration module for connecting object detection backends with the
//! tracker.
//!
//! The detector itself is out of scope for this crate; these traits and
//! utilities define its boundary so any inference backend can feed the
//! tracking core.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::DetectionSource;
pub use pipeline::TrackerPipeline;
