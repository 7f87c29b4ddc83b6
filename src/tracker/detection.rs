//! Detection input type produced by an upstream detector.

use crate::tracker::rect::Rect;

/// One per-frame observation from the upstream detector.
///
/// A detection is a classified, scored bounding box plus an optional
/// fixed-length appearance embedding. Detections are read-only inputs: the
/// tracker copies what it needs into track history and never retains the
/// originals across frames.
///
/// Boxes entering the tracker must have strictly positive width and height;
/// degenerate boxes are expected to be filtered upstream.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Class index assigned by the detector.
    pub class_id: u32,
    /// Human-readable class label.
    pub label: String,
    /// Detection confidence score.
    pub score: f32,
    /// Bounding box in TLWH format.
    pub rect: Rect,
    /// Optional appearance embedding for re-identification.
    pub embedding: Option<Vec<f32>>,
}

impl Detection {
    /// Create a detection from a TLBR box without class or embedding data.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Self {
        Self::from_rect(Rect::from_tlbr(x1, y1, x2, y2), score)
    }

    /// Create a detection from an existing rect without class or embedding data.
    pub fn from_rect(rect: Rect, score: f32) -> Self {
        Self {
            class_id: 0,
            label: String::new(),
            score,
            rect,
            embedding: None,
        }
    }

    /// Set the class id and label.
    pub fn with_class(mut self, class_id: u32, label: impl Into<String>) -> Self {
        self.class_id = class_id;
        self.label = label.into();
        self
    }

    /// Attach an appearance embedding.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}
