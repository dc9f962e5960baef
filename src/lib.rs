//! Detection-to-track association and overlay rendering for football match
//! video.
//!
//! The crate turns independent per-frame bounding-box detections into a
//! persistent per-object history indexed by stable track ids, caches the
//! computed result, and renders foot-marker overlays:
//!
//! frames → [`BatchedDetector`] → [`ClassNormalizer`] → [`TrackAssociator`]
//! → [`TrackStore`] → [`OverlayRenderer`] → annotated frames.
//!
//! The detection model and the association strategy are injected behind the
//! [`DetectionSource`] and [`TrackAssociator`] traits; [`IouAssociator`] is
//! the bundled default strategy. Video decoding and encoding are left to the
//! caller: the pipeline consumes and produces ordered sequences of
//! [`Frame`]s.
//!
//! # Example
//!
//! ```ignore
//! use pitchtrack::{BatchedDetector, IouAssociator, Pipeline};
//!
//! let detector = BatchedDetector::new(my_model);
//! let mut pipeline = Pipeline::new(detector, IouAssociator::default());
//!
//! // Fresh run, persisting the tracks for later replays.
//! let annotated = pipeline.compute_and_cache(&frames, Some(cache_path))?;
//!
//! // Later: skip detection entirely and render from the cache.
//! let annotated = pipeline.load_and_render(cache_path, &frames)?;
//! ```

pub mod detect;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod tracker;

pub use detect::{
    BatchFailurePolicy, BatchedDetector, ClassNormalizer, ClassTable, DEFAULT_BATCH_SIZE,
    Detection, DetectionSource, FrameDetections, TrackedDetection,
};
pub use error::{Error, Result};
pub use pipeline::Pipeline;
pub use render::{OverlayRenderer, RenderStyle};
pub use store::{BALL_TRACK_ID, Category, StoragePolicy, TrackEntry, TrackStore};
pub use tracker::{AssociatorConfig, IouAssociator, Rect, TrackAssociator};

/// A decoded video frame, RGB, 8 bits per channel.
pub type Frame = image::RgbImage;
