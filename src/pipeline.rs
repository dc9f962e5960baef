//! End-to-end wiring of detection, association, storage, and rendering.

use std::path::Path;

use crate::detect::{BatchedDetector, ClassNormalizer, DetectionSource};
use crate::render::OverlayRenderer;
use crate::store::TrackStore;
use crate::tracker::TrackAssociator;
use crate::{Frame, Result};

/// A complete tracking pipeline over one clip.
///
/// Bundles a batched detector, a class normalizer, an association strategy,
/// and an overlay renderer into the two entry operations: compute tracks
/// fresh (optionally persisting them), or replay a previously persisted
/// cache. All collaborators are injected, so independent pipelines can run
/// in one process and tests can substitute deterministic stubs.
pub struct Pipeline<D: DetectionSource, A: TrackAssociator> {
    detector: BatchedDetector<D>,
    normalizer: ClassNormalizer,
    associator: A,
    renderer: OverlayRenderer,
}

impl<D: DetectionSource, A: TrackAssociator> Pipeline<D, A> {
    /// Create a pipeline with the default normalizer and renderer.
    pub fn new(detector: BatchedDetector<D>, associator: A) -> Self {
        Self {
            detector,
            normalizer: ClassNormalizer::default(),
            associator,
            renderer: OverlayRenderer::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: ClassNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_renderer(mut self, renderer: OverlayRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &BatchedDetector<D> {
        &self.detector
    }

    /// Get a reference to the underlying associator.
    pub fn associator(&self) -> &A {
        &self.associator
    }

    /// Compute tracks for a clip without rendering.
    ///
    /// The associator is reset first: each run starts from a clean identity
    /// space.
    pub fn compute_tracks(&mut self, frames: &[Frame]) -> Result<TrackStore> {
        self.associator.reset();
        TrackStore::compute(
            frames,
            &mut self.detector,
            &self.normalizer,
            &mut self.associator,
        )
    }

    /// Compute tracks, optionally persist them, and render overlays.
    ///
    /// A failed cache write is logged and does not fail the run: the
    /// in-memory store still backs a fully rendered output.
    pub fn compute_and_cache(
        &mut self,
        frames: &[Frame],
        cache_path: Option<&Path>,
    ) -> Result<Vec<Frame>> {
        let store = self.compute_tracks(frames)?;

        if let Some(path) = cache_path {
            if let Err(err) = store.save(path) {
                log::warn!("{err}; continuing with in-memory tracks");
            }
        }

        self.renderer.render(frames, &store)
    }

    /// Render overlays from a previously persisted store.
    ///
    /// Detection and association are skipped entirely; a missing or
    /// malformed cache aborts with no output frames.
    pub fn load_and_render(&self, cache_path: &Path, frames: &[Frame]) -> Result<Vec<Frame>> {
        let store = TrackStore::load(cache_path)?;
        self.renderer.render(frames, &store)
    }
}
