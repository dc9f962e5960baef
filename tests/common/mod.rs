//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use image::Rgb;
use pitchtrack::{
    ClassTable, Detection, DetectionSource, Frame, FrameDetections, Rect, TrackAssociator,
    TrackedDetection,
};

/// Error returned by scripted sources told to fail.
#[derive(Debug)]
pub struct ScriptError;

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scripted batch failure")
    }
}

impl std::error::Error for ScriptError {}

/// Detection source that replays pre-baked per-frame results in order,
/// optionally failing selected batch indices.
pub struct ScriptedSource {
    responses: Vec<FrameDetections>,
    cursor: usize,
    fail_batches: Vec<usize>,
    batch_count: usize,
}

impl ScriptedSource {
    pub fn new(responses: Vec<FrameDetections>) -> Self {
        Self {
            responses,
            cursor: 0,
            fail_batches: Vec::new(),
            batch_count: 0,
        }
    }

    pub fn failing(responses: Vec<FrameDetections>, fail_batches: Vec<usize>) -> Self {
        Self {
            fail_batches,
            ..Self::new(responses)
        }
    }
}

impl DetectionSource for ScriptedSource {
    type Error = ScriptError;

    fn detect_batch(&mut self, frames: &[Frame]) -> Result<Vec<FrameDetections>, ScriptError> {
        let batch = self.batch_count;
        self.batch_count += 1;

        let start = self.cursor;
        self.cursor += frames.len();

        if self.fail_batches.contains(&batch) {
            return Err(ScriptError);
        }
        Ok(self.responses[start..start + frames.len()].to_vec())
    }
}

/// Associator that hands out a scripted id list per frame, in call order.
pub struct ScriptedAssociator {
    ids: Vec<Vec<u64>>,
    cursor: usize,
}

impl ScriptedAssociator {
    pub fn new(ids: Vec<Vec<u64>>) -> Self {
        Self { ids, cursor: 0 }
    }
}

impl TrackAssociator for ScriptedAssociator {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn update(&mut self, frame: &FrameDetections) -> pitchtrack::Result<Vec<TrackedDetection>> {
        let ids = self.ids.get(self.cursor).cloned().unwrap_or_default();
        self.cursor += 1;

        Ok(frame
            .detections
            .iter()
            .zip(ids)
            .map(|(detection, track_id)| TrackedDetection {
                detection: *detection,
                track_id,
            })
            .collect())
    }
}

/// The label table of the football model: ball, goalkeeper, player, referee.
pub fn table() -> ClassTable {
    ClassTable::from_pairs([(0, "ball"), (1, "goalkeeper"), (2, "player"), (3, "referee")])
}

pub const BALL: u32 = 0;
pub const GOALKEEPER: u32 = 1;
pub const PLAYER: u32 = 2;
pub const REFEREE: u32 = 3;

pub fn det(class_id: u32, tlbr: [f32; 4]) -> Detection {
    Detection::new(
        Rect::from_tlbr(tlbr[0], tlbr[1], tlbr[2], tlbr[3]),
        class_id,
        0.9,
    )
}

pub fn frame_dets(detections: Vec<Detection>) -> FrameDetections {
    FrameDetections::new(detections, table())
}

/// Non-uniform frames so overlay drawing is visible in pixel comparisons.
pub fn clip(count: usize) -> Vec<Frame> {
    (0..count)
        .map(|i| {
            Frame::from_fn(64, 64, move |x, y| {
                Rgb([(x * 3) as u8, (y * 3) as u8, (i * 40) as u8])
            })
        })
        .collect()
}

/// Unique scratch path under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("pitchtrack-test-{}-{name}", std::process::id()));
    path
}
