//! Error types for the tracking pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while computing, caching, or rendering tracks.
#[derive(Debug, Error)]
pub enum Error {
    /// Model file missing or corrupt. Fatal before any frame is processed.
    #[error("model initialization failed: {0}")]
    ModelInit(String),

    /// Inference failed for one batch of frames, or the source returned a
    /// result count that would desynchronize frame indices.
    #[error("detection failed for batch {batch}: {message}")]
    DetectionBatch { batch: usize, message: String },

    /// An expected class label is absent from a frame's label table.
    /// Fatal for that frame, not retried.
    #[error("label '{0}' missing from the detection label table")]
    LabelMismatch(String),

    /// The associator failed to update on a frame. Surfaced rather than
    /// swallowed: a skipped update breaks track identity continuity.
    #[error("track association failed at frame {frame}: {message}")]
    Association { frame: u64, message: String },

    /// The cache file is absent, unreadable, or structurally invalid.
    /// Callers must not continue with partial data.
    #[error("failed to read track cache {path}: {source}")]
    CacheRead { path: PathBuf, source: Source },

    /// The cache could not be persisted. Non-fatal: the in-memory store
    /// remains usable for rendering.
    #[error("failed to write track cache {path}: {source}")]
    CacheWrite { path: PathBuf, source: Source },

    /// A store was rendered against a clip with a different frame count.
    #[error("store covers {tracked} frames but {frames} frames were supplied")]
    FrameCountMismatch { frames: usize, tracked: usize },
}

impl Error {
    pub fn model_init(message: impl Into<String>) -> Self {
        Self::ModelInit(message.into())
    }

    pub fn association(frame: u64, message: impl Into<String>) -> Self {
        Self::Association {
            frame,
            message: message.into(),
        }
    }

    pub fn cache_read(path: impl Into<PathBuf>, source: impl Into<Source>) -> Self {
        Self::CacheRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn cache_write(path: impl Into<PathBuf>, source: impl Into<Source>) -> Self {
        Self::CacheWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let err = Error::model_init("weights not found");
        assert_eq!(
            err.to_string(),
            "model initialization failed: weights not found"
        );

        let err = Error::LabelMismatch("player".into());
        assert!(err.to_string().contains("'player'"));

        let err = Error::cache_read("stubs/tracks.json", std::io::Error::other("boom"));
        assert!(err.to_string().contains("stubs/tracks.json"));
    }
}
