//! A multi-object tracking core.
//!
//! Turns independent per-frame detections into temporally consistent
//! identities by combining a Kalman-family motion estimator, a gated
//! IoU/appearance cost model and an optimal bipartite assignment solver,
//! wrapped in a track-lifecycle state machine.
//!
//! ```
//! use boxtrack_rs::{BoxTracker, Detection, TrackerConfig};
//!
//! let mut tracker = BoxTracker::new(TrackerConfig::strict()).unwrap();
//! tracker.update(&[Detection::new(10.0, 10.0, 30.0, 30.0, 0.9)]);
//! tracker.update(&[Detection::new(12.0, 10.0, 32.0, 30.0, 0.9)]);
//! assert_eq!(tracker.tracks().len(), 1);
//! assert_eq!(tracker.tracks()[0].id(), 0);
//! ```

pub mod integration;
pub mod tracker;

pub use integration::{DetectionBuilder, DetectionSource, TrackerPipeline};
pub use tracker::{
    BoxTracker, COST_MAX, ConfigError, CostModel, Detection, MotionModel, Rect, Track, TrackDatum,
    TrackState, TrackerConfig,
};
