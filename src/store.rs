//! Frame-indexed accumulation of per-category track attributes, with cache
//! persistence.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detect::{
    BatchedDetector, ClassNormalizer, DetectionSource, FrameDetections, TrackedDetection,
};
use crate::tracker::TrackAssociator;
use crate::{Error, Frame, Result};

/// Reserved track id for ball entries.
///
/// Ball identity is not derived from the associator: there is normally at
/// most one ball of interest per frame, so every ball detection is stored
/// under this single id.
pub const BALL_TRACK_ID: u64 = 1;

/// Detection categories the store keeps per-frame records for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Player,
    Referee,
    Ball,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Player, Category::Referee, Category::Ball];

    /// The label this category matches in a frame's class table.
    pub fn label(self) -> &'static str {
        match self {
            Category::Player => "player",
            Category::Referee => "referee",
            Category::Ball => "ball",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// How this category's per-frame entries are keyed.
    pub fn policy(self) -> StoragePolicy {
        match self {
            Category::Player | Category::Referee => StoragePolicy::Associated,
            Category::Ball => StoragePolicy::Reserved(BALL_TRACK_ID),
        }
    }
}

/// Per-category keying rule for the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePolicy {
    /// Key entries by the associator-assigned track id.
    Associated,
    /// Ignore the associator and key every entry under one reserved id;
    /// several detections in one frame resolve last-write-wins.
    Reserved(u64),
}

/// Attributes recorded for one track in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    /// Bounding box as [left, top, right, bottom]
    pub bbox: [f32; 4],
}

/// Mapping of track id to attributes within a single frame.
pub type FrameTracks = BTreeMap<u64, TrackEntry>;

/// The durable aggregate of a run: one mapping per frame per category.
///
/// Invariant: the three sequences always have equal length, the number of
/// processed frames. Either computed fresh (owning all writes) or loaded
/// whole from a cache, after which it is read-only for the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackStore {
    players: Vec<FrameTracks>,
    referees: Vec<FrameTracks>,
    ball: Vec<FrameTracks>,
}

impl TrackStore {
    /// Number of frames covered by the store.
    pub fn frame_count(&self) -> usize {
        self.players.len()
    }

    /// One category's full frame-indexed sequence.
    pub fn sequence(&self, category: Category) -> &[FrameTracks] {
        match category {
            Category::Player => &self.players,
            Category::Referee => &self.referees,
            Category::Ball => &self.ball,
        }
    }

    /// One category's mapping for one frame.
    pub fn frame(&self, category: Category, index: usize) -> Option<&FrameTracks> {
        self.sequence(category).get(index)
    }

    fn push_empty_frame(&mut self) {
        self.players.push(FrameTracks::new());
        self.referees.push(FrameTracks::new());
        self.ball.push(FrameTracks::new());
    }

    fn frame_slot(&mut self, category: Category) -> &mut FrameTracks {
        let sequence = match category {
            Category::Player => &mut self.players,
            Category::Referee => &mut self.referees,
            Category::Ball => &mut self.ball,
        };
        sequence.last_mut().expect("frame appended before recording")
    }

    /// Compute a store from a clip.
    ///
    /// Frames are processed strictly in order: normalize the frame's
    /// detections, feed them to the associator, append one empty mapping per
    /// category, then fill the mappings per each category's storage policy.
    pub fn compute<D, A>(
        frames: &[Frame],
        detector: &mut BatchedDetector<D>,
        normalizer: &ClassNormalizer,
        associator: &mut A,
    ) -> Result<Self>
    where
        D: DetectionSource,
        A: TrackAssociator,
    {
        let mut detections = detector.detect(frames)?;
        let mut store = Self::default();

        for (frame_num, frame) in detections.iter_mut().enumerate() {
            normalizer.normalize(frame)?;
            let tracked = associator.update(frame)?;

            store.push_empty_frame();
            store.record_frame(frame, &tracked);
            log::debug!(
                "frame {frame_num}: {} detections, {} tracked",
                frame.detections.len(),
                tracked.len()
            );
        }

        log::info!("computed tracks for {} frames", store.frame_count());
        Ok(store)
    }

    /// Fill the latest frame's mappings from one frame's results.
    ///
    /// `Associated` categories read the tracked detections; `Reserved`
    /// categories read the normalized but untracked detections, so their
    /// identity never depends on the associator.
    fn record_frame(&mut self, frame: &FrameDetections, tracked: &[TrackedDetection]) {
        for category in Category::ALL {
            match category.policy() {
                StoragePolicy::Associated => {
                    for item in tracked {
                        if category_of(frame, item.detection.class_id) == Some(category) {
                            self.frame_slot(category).insert(
                                item.track_id,
                                TrackEntry {
                                    bbox: item.detection.bbox.to_tlbr(),
                                },
                            );
                        }
                    }
                }
                StoragePolicy::Reserved(id) => {
                    for detection in &frame.detections {
                        if category_of(frame, detection.class_id) == Some(category) {
                            self.frame_slot(category).insert(
                                id,
                                TrackEntry {
                                    bbox: detection.bbox.to_tlbr(),
                                },
                            );
                        }
                    }
                }
            }
        }
    }

    /// Deserialize a previously persisted store.
    ///
    /// A missing file, unreadable payload, or structurally invalid document
    /// (wrong top-level shape, any category key absent) is a fatal
    /// [`Error::CacheRead`]; callers must not continue with partial data.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| Error::cache_read(path, err))?;
        let store: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| Error::cache_read(path, err))?;
        log::info!(
            "loaded track cache {} ({} frames)",
            path.display(),
            store.frame_count()
        );
        Ok(store)
    }

    /// Serialize the whole store atomically.
    ///
    /// Writes to a sibling temp file and renames it into place, so a failed
    /// write never leaves a truncated cache behind. Failure is
    /// [`Error::CacheWrite`]; the in-memory store stays valid.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("tmp");

        let file = File::create(&tmp).map_err(|err| Error::cache_write(path, err))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).map_err(|err| Error::cache_write(path, err))?;
        writer.flush().map_err(|err| Error::cache_write(path, err))?;
        fs::rename(&tmp, path).map_err(|err| Error::cache_write(path, err))?;

        log::info!(
            "saved track cache {} ({} frames)",
            path.display(),
            self.frame_count()
        );
        Ok(())
    }
}

fn category_of(frame: &FrameDetections, class_id: u32) -> Option<Category> {
    frame.names.name(class_id).and_then(Category::from_label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_policies() {
        assert_eq!(Category::Player.policy(), StoragePolicy::Associated);
        assert_eq!(Category::Referee.policy(), StoragePolicy::Associated);
        assert_eq!(
            Category::Ball.policy(),
            StoragePolicy::Reserved(BALL_TRACK_ID)
        );
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("goalkeeper"), None);
    }

    #[test]
    fn test_empty_store() {
        let store = TrackStore::default();
        assert_eq!(store.frame_count(), 0);
        assert!(store.frame(Category::Player, 0).is_none());
    }
}
