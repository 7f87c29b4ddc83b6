//! Single object track: one identity's motion filter, bounded history and
//! detection/miss counters.

use std::collections::VecDeque;

use crate::tracker::detection::Detection;
use crate::tracker::kalman_filter::MotionFilter;
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// One historical frame of a track.
#[derive(Debug, Clone)]
pub struct TrackDatum {
    /// Filtered box. On coasting frames this is the predicted box.
    pub rect: Rect,
    /// Box as observed (matched frames) or predicted (coasting frames).
    pub rect_raw: Rect,
    /// Score of the matched detection. Forced to 0.0 on coasting frames as a
    /// consumer signal meaning "unconfirmed, purely predicted".
    pub score: f32,
    /// Appearance embedding of the matched detection, if one was provided.
    /// Always absent on coasting frames.
    pub embedding: Option<Vec<f32>>,
}

/// Single object track.
///
/// Created by the tracker for an unmatched detection and mutated every frame
/// by exactly one of [`Track::update`] or [`Track::update_no_detect`]. The
/// `id` never changes and is never reused.
#[derive(Debug)]
pub struct Track {
    id: u64,
    class_id: u32,
    label: String,
    state: TrackState,
    filter: Box<dyn MotionFilter>,
    history: VecDeque<TrackDatum>,
    history_cap: usize,
    detected_count: u32,
    undetected_count: u32,
    predicted: Rect,
}

impl Track {
    /// Create a track seeded directly from a detection's box.
    pub fn new(
        id: u64,
        detection: &Detection,
        filter: Box<dyn MotionFilter>,
        history_cap: usize,
    ) -> Self {
        let mut track = Self {
            id,
            class_id: detection.class_id,
            label: detection.label.clone(),
            state: TrackState::New,
            filter,
            history: VecDeque::with_capacity(history_cap.min(64)),
            history_cap,
            detected_count: 1,
            undetected_count: 0,
            predicted: detection.rect,
        };
        track.push_datum(TrackDatum {
            rect: detection.rect,
            rect_raw: detection.rect,
            score: detection.score,
            embedding: detection.embedding.clone(),
        });
        track
    }

    /// Unique track identifier.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Class id of the most recently matched detection.
    #[inline]
    pub fn class_id(&self) -> u32 {
        self.class_id
    }

    /// Label of the most recently matched detection.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Latest filtered box.
    #[inline]
    pub fn rect(&self) -> Rect {
        // History is never empty: a datum is pushed at construction.
        self.history.back().map(|d| d.rect).unwrap_or(self.predicted)
    }

    /// Score of the latest history entry (0.0 while coasting).
    #[inline]
    pub fn score(&self) -> f32 {
        self.history.back().map(|d| d.score).unwrap_or(0.0)
    }

    /// Box predicted by the last [`Track::predict`] call.
    #[inline]
    pub fn predicted_rect(&self) -> Rect {
        self.predicted
    }

    /// Bounded per-frame history, oldest first.
    #[inline]
    pub fn history(&self) -> &VecDeque<TrackDatum> {
        &self.history
    }

    /// Consecutive frames with a matched detection.
    #[inline]
    pub fn detected_count(&self) -> u32 {
        self.detected_count
    }

    /// Consecutive frames without a matched detection.
    #[inline]
    pub fn undetected_count(&self) -> u32 {
        self.undetected_count
    }

    /// Advance the motion filter one frame and cache the predicted box.
    pub fn predict(&mut self) -> Rect {
        self.predicted = self.filter.predict();
        self.predicted
    }

    /// Correct the filter with a matched detection and append a history entry
    /// holding the filtered box.
    pub fn update(&mut self, detection: &Detection) {
        let filtered = self.filter.update(&detection.rect);
        self.class_id = detection.class_id;
        if !detection.label.is_empty() {
            self.label = detection.label.clone();
        }
        self.push_datum(TrackDatum {
            rect: filtered,
            rect_raw: detection.rect,
            score: detection.score,
            embedding: detection.embedding.clone(),
        });
        self.detected_count += 1;
        self.undetected_count = 0;
        self.state = TrackState::Active;
    }

    /// Coast for one frame: the prediction stands as the current belief and
    /// the appended history entry carries a zero score.
    pub fn update_no_detect(&mut self) {
        self.push_datum(TrackDatum {
            rect: self.predicted,
            rect_raw: self.predicted,
            score: 0.0,
            embedding: None,
        });
        self.detected_count = 0;
        self.undetected_count += 1;
        self.state = TrackState::Coasting;
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.state = TrackState::Deleted;
    }

    fn push_datum(&mut self, datum: TrackDatum) {
        if self.history.len() == self.history_cap {
            self.history.pop_front();
        }
        self.history.push_back(datum);
    }
}
