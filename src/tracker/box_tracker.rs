//! Per-frame tracking orchestration.

use ndarray::Array2;
use thiserror::Error;

use crate::tracker::cost::{COST_MAX, CostModel};
use crate::tracker::detection::Detection;
use crate::tracker::hungarian;
use crate::tracker::kalman_filter::MotionModel;
use crate::tracker::track::Track;
use crate::tracker::track_state::TrackState;

/// Invalid tracker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("appearance weight must be within [0, 1], got {0}")]
    AppearanceWeight(f32),
    #[error("distance gate scale must be positive, got {0}")]
    DistanceGateScale(f32),
    #[error("appearance rescale floor must be within [0, 1), got {0}")]
    AppearanceRescaleFloor(f32),
    #[error("deletion threshold must be at least 1")]
    DeletionThreshold,
    #[error("history length must be at least 1")]
    HistoryLen,
}

/// Configuration for the [`BoxTracker`], immutable per session.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Which motion filter variant new tracks use.
    pub motion_model: MotionModel,
    /// Per-scalar process noise (scalar filter variant only).
    pub process_noise: f64,
    /// Per-scalar measurement noise (scalar filter variant only).
    pub measurement_noise: f64,
    /// A track is removed once its consecutive miss count exceeds this.
    pub deletion_threshold: u32,
    /// Cap on per-track history length; oldest entries are dropped.
    pub history_len: usize,
    /// Pairwise matching cost parameters.
    pub cost: CostModel,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl TrackerConfig {
    /// Strict association profile: scalar filter, pure-IoU cost, tracks die
    /// after two consecutive misses.
    pub fn strict() -> Self {
        Self {
            motion_model: MotionModel::Scalar,
            process_noise: 1.0,
            measurement_noise: 1.0,
            deletion_threshold: 2,
            history_len: 500,
            cost: CostModel::default(),
        }
    }

    /// Re-identification profile: joint filter, appearance-blended cost and
    /// a long coasting budget so occluded objects can be recovered.
    pub fn reid() -> Self {
        Self {
            motion_model: MotionModel::Joint,
            deletion_threshold: 30,
            cost: CostModel {
                appearance_weight: 0.4,
                ..CostModel::default()
            },
            ..Self::strict()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.cost.appearance_weight) {
            return Err(ConfigError::AppearanceWeight(self.cost.appearance_weight));
        }
        if self.cost.distance_gate_scale <= 0.0 {
            return Err(ConfigError::DistanceGateScale(self.cost.distance_gate_scale));
        }
        // A floor of exactly 1.0 makes the appearance rescale divide by zero,
        // and the resulting NaN costs break the assignment solver.
        if !(0.0..1.0).contains(&self.cost.appearance_rescale_floor) {
            return Err(ConfigError::AppearanceRescaleFloor(
                self.cost.appearance_rescale_floor,
            ));
        }
        if self.deletion_threshold == 0 {
            return Err(ConfigError::DeletionThreshold);
        }
        if self.history_len == 0 {
            return Err(ConfigError::HistoryLen);
        }
        Ok(())
    }
}

/// Multi-object tracker: turns independent per-frame detections into
/// temporally consistent identities.
///
/// One tracker owns one independent tracking session; it is single-threaded
/// and every [`BoxTracker::update`] call runs to completion before the next
/// frame's call begins.
pub struct BoxTracker {
    config: TrackerConfig,
    tracks: Vec<Track>,
    next_id: u64,
}

impl BoxTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            tracks: Vec::new(),
            next_id: 0,
        })
    }

    /// Process one frame of detections.
    ///
    /// Detections must carry strictly positive widths and heights; degenerate
    /// boxes are expected to be filtered upstream.
    pub fn update(&mut self, detections: &[Detection]) {
        // Step 1: advance every motion filter exactly once per frame,
        // regardless of whether a match will be found.
        for track in &mut self.tracks {
            track.predict();
        }

        let n_tracks = self.tracks.len();
        let n_dets = detections.len();
        let mut claimed = vec![false; n_dets];

        if n_tracks > 0 && n_dets > 0 {
            // Step 2: full track-by-detection cost matrix, padded to square
            // with COST_MAX so the solver sees dummy rows/columns.
            let n = n_tracks.max(n_dets);
            let mut cost = Array2::from_elem((n, n), COST_MAX);
            for (i, track) in self.tracks.iter().enumerate() {
                for (j, detection) in detections.iter().enumerate() {
                    cost[[i, j]] = self.config.cost.cost(track, detection);
                }
            }

            // Step 3: optimal assignment.
            let (row_to_col, _) = hungarian::solve(&cost);

            // Step 4: accept only assignments below COST_MAX. The solver is
            // forced to pair every row, so an at-cost-max pairing just means
            // every gate failed and must be treated as "no match".
            for (i, track) in self.tracks.iter_mut().enumerate() {
                let j = row_to_col[i];
                if j < n_dets && cost[[i, j]] < COST_MAX {
                    track.update(&detections[j]);
                    claimed[j] = true;
                } else {
                    track.update_no_detect();
                }
            }
        } else {
            for track in &mut self.tracks {
                track.update_no_detect();
            }
        }

        // Step 5: remove tracks that outlived their coasting budget.
        let threshold = self.config.deletion_threshold;
        for track in &mut self.tracks {
            if track.undetected_count() > threshold {
                track.mark_deleted();
            }
        }
        self.tracks.retain(|t| t.state() != TrackState::Deleted);

        // Step 6: every unclaimed detection becomes a new track. Ids are
        // monotonically assigned and never reused.
        for (j, detection) in detections.iter().enumerate() {
            if !claimed[j] {
                let filter = self.config.motion_model.create(
                    &detection.rect,
                    self.config.process_noise,
                    self.config.measurement_noise,
                );
                self.tracks.push(Track::new(
                    self.next_id,
                    detection,
                    filter,
                    self.config.history_len,
                ));
                self.next_id += 1;
            }
        }
    }

    /// Read-only view of all active tracks.
    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Drop all tracks and restart the id counter.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 0;
    }
}
