//! Detection data types shared across the pipeline.

use std::collections::BTreeMap;

use crate::tracker::Rect;

/// One object observation in one frame. Ephemeral: produced by the detector,
/// consumed by the associator and store within the same frame.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    /// Bounding box in frame pixel coordinates
    pub bbox: Rect,
    /// Model class id, resolvable through the frame's [`ClassTable`]
    pub class_id: u32,
    /// Detection confidence in [0, 1]
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: Rect, class_id: u32, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }
}

/// A detection annotated with a stable track identity.
///
/// The `track_id` is assigned and owned exclusively by the
/// [`TrackAssociator`](crate::tracker::TrackAssociator).
#[derive(Debug, Clone, Copy)]
pub struct TrackedDetection {
    pub detection: Detection,
    pub track_id: u64,
}

/// Lookup table mapping model class ids to label names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTable {
    names: BTreeMap<u32, String>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (u32, &'a str)>) -> Self {
        let mut table = Self::new();
        for (id, name) in pairs {
            table.insert(id, name);
        }
        table
    }

    pub fn insert(&mut self, id: u32, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Inverse lookup (name -> id). Labels are unique in practice; if a name
    /// appears twice the smallest id wins.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(&id, _)| id)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// All detections for a single frame plus the label table of the batch that
/// produced them. Detection order within a frame carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct FrameDetections {
    pub detections: Vec<Detection>,
    pub names: ClassTable,
}

impl FrameDetections {
    pub fn new(detections: Vec<Detection>, names: ClassTable) -> Self {
        Self { detections, names }
    }

    /// A frame with no detections, keeping the batch's label table.
    pub fn empty(names: ClassTable) -> Self {
        Self {
            detections: Vec::new(),
            names,
        }
    }
}
