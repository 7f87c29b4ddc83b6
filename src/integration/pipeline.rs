//! TrackerPipeline for combining detection with tracking.

use crate::tracker::{BoxTracker, ConfigError, Track, TrackerConfig};

use super::DetectionSource;

/// A combined pipeline that bundles detection inference with tracking.
///
/// This struct provides a convenient way to run end-to-end tracking by
/// combining any `DetectionSource` with a `BoxTracker`.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: BoxTracker,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given detector and tracker config.
    pub fn new(detector: D, config: TrackerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detector,
            tracker: BoxTracker::new(config)?,
        })
    }

    /// Create a new tracking pipeline with default tracker configuration.
    pub fn with_default_config(detector: D) -> Result<Self, ConfigError> {
        Self::new(detector, TrackerConfig::default())
    }

    /// Process a single frame and return a view of the active tracks.
    ///
    /// This method runs detection on the input image and then updates
    /// the tracker with the detected objects.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<&[Track], D::Error> {
        let detections = self.detector.detect(input, width, height)?;
        self.tracker.update(&detections);
        Ok(self.tracker.tracks())
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &BoxTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut BoxTracker {
        &mut self.tracker
    }
}
