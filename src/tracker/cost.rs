//! Track-to-detection matching cost with hard gating rules.
//!
//! Costs live in `[0, COST_MAX]`, lower meaning more similar. `COST_MAX` is
//! both the "impossible pairing" sentinel returned by the gates and the value
//! the tracker pads its cost matrix with, so a solver assignment at exactly
//! `COST_MAX` must be treated as "no match" by the caller.

use crate::tracker::detection::Detection;
use crate::tracker::track::Track;

/// Upper bound of the matching cost range.
pub const COST_MAX: f32 = 1.0;

/// Configuration of the pairwise cost function.
#[derive(Debug, Clone)]
pub struct CostModel {
    /// Scale of the size-adaptive center-distance gate. The gate threshold is
    /// `distance_gate_scale * (wp + hp + wd + hd) / 2`, proportional to the
    /// dimensions of both boxes.
    pub distance_gate_scale: f32,
    /// IoU above which a class-id mismatch is forgiven (detector label
    /// noise); below it, differing classes can never match.
    pub class_iou_forgiveness: f32,
    /// Weight of the appearance term in `[0, 1]`; the IoU term gets the
    /// complement. Zero reduces to pure-IoU tracking.
    pub appearance_weight: f32,
    /// Raw cosine similarity mapped to 0 by the affine rescale. Unrelated
    /// objects already score 0.8-0.99 with typical embedding families, so
    /// the useful range starts near 0.9.
    pub appearance_rescale_floor: f32,
    /// At most this many valid historical embeddings are compared per pair.
    pub appearance_max_samples: usize,
    /// Step between history entries while sampling, newest first.
    pub appearance_sample_stride: usize,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            distance_gate_scale: 2.0,
            class_iou_forgiveness: 0.9,
            appearance_weight: 0.0,
            appearance_rescale_floor: 0.9,
            appearance_max_samples: 8,
            appearance_sample_stride: 4,
        }
    }
}

impl CostModel {
    /// Matching cost between a track's predicted box and a candidate
    /// detection.
    ///
    /// The track must have been predicted this frame already; the predicted
    /// box is read from the track, never re-predicted here.
    pub fn cost(&self, track: &Track, detection: &Detection) -> f32 {
        let predicted = track.predicted_rect();
        let observed = detection.rect;

        // Distance gate: beyond a size-adaptive radius the pair cannot be
        // the same object, regardless of any other evidence.
        let gate = self.distance_gate_scale
            * (predicted.width + predicted.height + observed.width + observed.height)
            / 2.0;
        if predicted.center_distance(&observed) > gate {
            return COST_MAX;
        }

        let iou = predicted.iou(&observed);

        // Class gate: a mismatch is only forgiven when the overlap is almost
        // total (detector class-label noise).
        if track.class_id() != detection.class_id && iou < self.class_iou_forgiveness {
            return COST_MAX;
        }

        let mut appearance_weight = self.appearance_weight;
        let mut appearance = 0.0;
        if appearance_weight > 0.0 {
            match self.appearance_similarity(track, detection) {
                Some(similarity) => appearance = similarity,
                // No valid comparison: drop the appearance term for this pair.
                None => appearance_weight = 0.0,
            }
        }

        let similarity = (1.0 - appearance_weight) * iou + appearance_weight * appearance;
        (COST_MAX - similarity).clamp(0.0, COST_MAX)
    }

    /// Rescaled mean cosine similarity between the detection's embedding and
    /// a sample of the track's historical embeddings.
    ///
    /// History entries without an embedding (coasted frames) are skipped.
    /// Returns `None` when the detection has no embedding or no valid
    /// comparison exists (empty sample, dimension mismatch everywhere).
    fn appearance_similarity(&self, track: &Track, detection: &Detection) -> Option<f32> {
        let query = detection.embedding.as_deref()?;
        let stride = self.appearance_sample_stride.max(1);

        let mut sum = 0.0f32;
        let mut count = 0usize;
        for datum in track.history().iter().rev().step_by(stride) {
            if count == self.appearance_max_samples {
                break;
            }
            let Some(sample) = datum.embedding.as_deref() else {
                continue;
            };
            if let Some(similarity) = cosine_similarity(sample, query) {
                sum += similarity;
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        let mean = sum / count as f32;
        let floor = self.appearance_rescale_floor;
        Some(((mean - floor) / (1.0 - floor)).clamp(0.0, 1.0))
    }
}

/// Cosine similarity between two vectors; `None` when the lengths differ or
/// either vector has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
