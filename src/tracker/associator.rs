//! Detection-to-track association strategy.
//!
//! The pipeline treats association as a replaceable strategy behind the
//! [`TrackAssociator`] trait; [`IouAssociator`] is the default
//! implementation, a deterministic SORT-style matcher with constant-velocity
//! prediction.

use crate::Result;
use crate::detect::{FrameDetections, TrackedDetection};
use crate::tracker::matching::{self, MatchOutcome};
use crate::tracker::rect::Rect;
use crate::tracker::track::{MotionTrack, TrackState};

/// Strategy that annotates each frame's detections with stable track ids.
///
/// Implementations carry state across successive `update` calls, so calls
/// must be made in strict frame order; out-of-order or skipped-frame calls
/// degrade association quality but are not a hard error. A strategy instance
/// is reset once per run and never shared across independent runs.
pub trait TrackAssociator {
    /// Drop all cross-frame state, returning the strategy to its initial
    /// state. Track ids restart from scratch afterwards.
    fn reset(&mut self);

    /// Annotate one frame's detections with track ids, consuming the frame's
    /// position in the sequence. Failures surface as
    /// [`Error::Association`](crate::Error::Association).
    fn update(&mut self, frame: &FrameDetections) -> Result<Vec<TrackedDetection>>;
}

/// Configuration for [`IouAssociator`].
#[derive(Debug, Clone)]
pub struct AssociatorConfig {
    /// Minimum IoU between a predicted track box and a detection for the
    /// pair to be accepted.
    pub match_iou: f32,
    /// Number of unmatched frames a lost track survives before retirement.
    pub max_age: u32,
    /// Weight of the previous velocity estimate when folding in a new
    /// observation (0 = trust the latest displacement only).
    pub velocity_smoothing: f32,
}

impl Default for AssociatorConfig {
    fn default() -> Self {
        Self {
            match_iou: 0.2,
            max_age: 30,
            velocity_smoothing: 0.8,
        }
    }
}

/// Default association strategy: constant-velocity prediction, IoU cost,
/// global linear assignment.
///
/// Ids are allocated from a per-instance counter starting at 1, so
/// independent pipeline runs in one process never share identities.
pub struct IouAssociator {
    config: AssociatorConfig,
    tracks: Vec<MotionTrack>,
    next_id: u64,
    frame_id: u64,
}

impl IouAssociator {
    pub fn new(config: AssociatorConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            next_id: 1,
            frame_id: 0,
        }
    }

    /// Number of tracks currently carried (active and lost).
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn next_track_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for IouAssociator {
    fn default() -> Self {
        Self::new(AssociatorConfig::default())
    }
}

impl TrackAssociator for IouAssociator {
    fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 1;
        self.frame_id = 0;
    }

    fn update(&mut self, frame: &FrameDetections) -> Result<Vec<TrackedDetection>> {
        self.frame_id += 1;

        let predicted: Vec<Rect> = self.tracks.iter().map(MotionTrack::predicted).collect();
        let det_rects: Vec<Rect> = frame.detections.iter().map(|d| d.bbox).collect();

        let MatchOutcome {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::match_by_iou(&predicted, &det_rects, self.config.match_iou);

        let mut assigned = vec![0u64; det_rects.len()];

        for (track_idx, det_idx) in matches {
            let track = &mut self.tracks[track_idx];
            track.observe(det_rects[det_idx], self.config.velocity_smoothing);
            assigned[det_idx] = track.track_id;
        }

        for track_idx in unmatched_tracks {
            self.tracks[track_idx].mark_missed();
        }

        for det_idx in unmatched_detections {
            let id = self.next_track_id();
            self.tracks.push(MotionTrack::new(id, det_rects[det_idx]));
            assigned[det_idx] = id;
        }

        let max_age = self.config.max_age;
        self.tracks
            .retain(|t| t.state == TrackState::Active || t.time_since_update <= max_age);

        Ok(frame
            .detections
            .iter()
            .zip(assigned)
            .map(|(detection, track_id)| TrackedDetection {
                detection: *detection,
                track_id,
            })
            .collect())
    }
}
