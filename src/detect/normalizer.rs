//! Post-hoc class label rewriting.

use crate::detect::FrameDetections;
use crate::{Error, Result};

/// Rewrites detections labeled with a specialized sub-type to carry the
/// primary category's class id before association.
///
/// The default remaps `goalkeeper` to `player`: a goalkeeper is tracked and
/// stored exactly like any other player. Pure and frame-local; no state is
/// carried across frames.
#[derive(Debug, Clone)]
pub struct ClassNormalizer {
    alias: String,
    canonical: String,
}

impl ClassNormalizer {
    pub fn new(alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            canonical: canonical.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Rewrite alias-labeled detections in place.
    ///
    /// The canonical id is resolved through the inverse lookup of the
    /// frame's label table; its absence is a [`Error::LabelMismatch`] (a
    /// model/label mismatch, fatal for the frame). Frames with no detections
    /// pass through untouched, so placeholder frames from a skipped batch
    /// survive normalization.
    pub fn normalize(&self, frame: &mut FrameDetections) -> Result<()> {
        if frame.detections.is_empty() {
            return Ok(());
        }

        let canonical_id = frame
            .names
            .id_of(&self.canonical)
            .ok_or_else(|| Error::LabelMismatch(self.canonical.clone()))?;

        for detection in &mut frame.detections {
            if frame.names.name(detection.class_id) == Some(self.alias.as_str()) {
                detection.class_id = canonical_id;
            }
        }

        Ok(())
    }
}

impl Default for ClassNormalizer {
    fn default() -> Self {
        Self::new("goalkeeper", "player")
    }
}
