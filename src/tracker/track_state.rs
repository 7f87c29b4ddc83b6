/// Track state enumeration for the object tracking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Newly created track, seeded from an unmatched detection
    #[default]
    New,
    /// Matched with a detection this frame
    Active,
    /// No matching detection this frame; the box is purely predicted
    Coasting,
    /// Exceeded the miss threshold, removed from the active set
    Deleted,
}
