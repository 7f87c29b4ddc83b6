mod box_tracker;
mod cost;
mod detection;
mod hungarian;
mod kalman_filter;
mod rect;
mod track;
mod track_state;

pub use box_tracker::{BoxTracker, ConfigError, TrackerConfig};
pub use cost::{COST_MAX, CostModel};
pub use detection::Detection;
pub use hungarian::solve as solve_assignment;
pub use kalman_filter::{JointKalmanFilter, MotionFilter, MotionModel, ScalarKalmanFilter};
pub use rect::{Rect, iou_batch};
pub use track::{Track, TrackDatum};
pub use track_state::TrackState;
