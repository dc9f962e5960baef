//! Per-object motion state carried across frames.

use nalgebra::Vector2;

use crate::tracker::rect::Rect;

/// Lifecycle state of a motion track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Matched to a detection in the most recent frame
    #[default]
    Active,
    /// Unmatched recently, still eligible for re-association
    Lost,
}

/// Motion state for one tracked object: last observed box plus an
/// exponentially smoothed per-frame velocity of its center.
#[derive(Debug, Clone)]
pub struct MotionTrack {
    /// Identifier owned by the associator, stable for this object
    pub track_id: u64,
    /// Last observed bounding box
    pub rect: Rect,
    /// Estimated center displacement per frame
    pub velocity: Vector2<f32>,
    pub state: TrackState,
    /// Frames elapsed since the last matched detection
    pub time_since_update: u32,
}

impl MotionTrack {
    pub fn new(track_id: u64, rect: Rect) -> Self {
        Self {
            track_id,
            rect,
            velocity: Vector2::zeros(),
            state: TrackState::Active,
            time_since_update: 0,
        }
    }

    /// The box advanced by the estimated velocity, used as the match
    /// candidate for the next frame.
    pub fn predicted(&self) -> Rect {
        Rect::new(
            self.rect.x + self.velocity.x,
            self.rect.y + self.velocity.y,
            self.rect.width,
            self.rect.height,
        )
    }

    /// Fold a matched detection into the motion state.
    pub fn observe(&mut self, bbox: Rect, smoothing: f32) {
        let (prev_x, prev_y) = self.rect.center();
        let (x, y) = bbox.center();
        let measured = Vector2::new(x - prev_x, y - prev_y);
        self.velocity = self.velocity * smoothing + measured * (1.0 - smoothing);
        self.rect = bbox;
        self.state = TrackState::Active;
        self.time_since_update = 0;
    }

    /// Record a frame without a matching detection.
    pub fn mark_missed(&mut self) {
        self.state = TrackState::Lost;
        self.time_since_update += 1;
    }
}
