//! Fixed-size batching wrapper around a detection source.

use crate::detect::{DetectionSource, FrameDetections};
use crate::{Error, Frame, Result};

/// Default number of frames per inference batch.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// What to do when one batch's inference fails.
///
/// Either way, frame indices stay aligned: a failed batch never shrinks the
/// result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFailurePolicy {
    /// Abort the whole run on the first failed batch.
    #[default]
    Abort,
    /// Substitute one empty result per frame of the failed batch and
    /// continue. The failure is logged.
    EmptyFrames,
}

/// Runs a [`DetectionSource`] over a clip in fixed-size batches, bounding
/// peak memory while preserving frame order.
pub struct BatchedDetector<D> {
    source: D,
    batch_size: usize,
    failure_policy: BatchFailurePolicy,
}

impl<D: DetectionSource> BatchedDetector<D> {
    pub fn new(source: D) -> Self {
        Self {
            source,
            batch_size: DEFAULT_BATCH_SIZE,
            failure_policy: BatchFailurePolicy::default(),
        }
    }

    /// Set the number of frames per batch. Must be at least 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be at least 1");
        self.batch_size = batch_size;
        self
    }

    pub fn with_failure_policy(mut self, policy: BatchFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Run detection over all frames, batch by batch, in input order.
    ///
    /// The returned sequence always has exactly one entry per input frame.
    /// A source that returns a different count for a batch is a hard
    /// [`Error::DetectionBatch`] regardless of policy.
    pub fn detect(&mut self, frames: &[Frame]) -> Result<Vec<FrameDetections>> {
        let mut results = Vec::with_capacity(frames.len());

        for (batch, chunk) in frames.chunks(self.batch_size).enumerate() {
            log::debug!("detecting batch {batch} ({} frames)", chunk.len());
            match self.source.detect_batch(chunk) {
                Ok(batch_results) => {
                    if batch_results.len() != chunk.len() {
                        return Err(Error::DetectionBatch {
                            batch,
                            message: format!(
                                "source returned {} results for {} frames",
                                batch_results.len(),
                                chunk.len()
                            ),
                        });
                    }
                    results.extend(batch_results);
                }
                Err(err) => match self.failure_policy {
                    BatchFailurePolicy::Abort => {
                        return Err(Error::DetectionBatch {
                            batch,
                            message: err.to_string(),
                        });
                    }
                    BatchFailurePolicy::EmptyFrames => {
                        log::warn!(
                            "batch {batch} failed ({err}); substituting {} empty frames",
                            chunk.len()
                        );
                        let placeholders =
                            std::iter::repeat_with(FrameDetections::default).take(chunk.len());
                        results.extend(placeholders);
                    }
                },
            }
        }

        debug_assert_eq!(results.len(), frames.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{ClassTable, Detection};
    use crate::tracker::Rect;

    #[derive(Debug)]
    struct StubFailure;

    impl std::fmt::Display for StubFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "inference backend unavailable")
        }
    }

    impl std::error::Error for StubFailure {}

    /// Source that tags each detection with the frame's global index and
    /// records batch sizes, optionally failing selected batches.
    struct CountingSource {
        next_frame: u32,
        batch_sizes: Vec<usize>,
        fail_batches: Vec<usize>,
    }

    impl CountingSource {
        fn new(fail_batches: Vec<usize>) -> Self {
            Self {
                next_frame: 0,
                batch_sizes: Vec::new(),
                fail_batches,
            }
        }
    }

    impl DetectionSource for CountingSource {
        type Error = StubFailure;

        fn detect_batch(
            &mut self,
            frames: &[Frame],
        ) -> std::result::Result<Vec<FrameDetections>, StubFailure> {
            let batch = self.batch_sizes.len();
            self.batch_sizes.push(frames.len());
            let start = self.next_frame;
            self.next_frame += frames.len() as u32;

            if self.fail_batches.contains(&batch) {
                return Err(StubFailure);
            }

            Ok((0..frames.len() as u32)
                .map(|i| {
                    let det = Detection::new(Rect::new(0.0, 0.0, 10.0, 10.0), start + i, 0.9);
                    FrameDetections::new(vec![det], ClassTable::default())
                })
                .collect())
        }
    }

    fn frames(count: usize) -> Vec<Frame> {
        (0..count).map(|_| Frame::new(8, 8)).collect()
    }

    #[test]
    fn test_chunking_preserves_frame_order() {
        let mut detector = BatchedDetector::new(CountingSource::new(vec![])).with_batch_size(4);
        let results = detector.detect(&frames(10)).unwrap();

        assert_eq!(results.len(), 10);
        assert_eq!(detector.source().batch_sizes, vec![4, 4, 2]);
        for (i, frame) in results.iter().enumerate() {
            assert_eq!(frame.detections[0].class_id, i as u32);
        }
    }

    #[test]
    fn test_abort_policy_fails_run() {
        let mut detector = BatchedDetector::new(CountingSource::new(vec![1])).with_batch_size(3);
        let err = detector.detect(&frames(7)).unwrap_err();
        assert!(matches!(err, Error::DetectionBatch { batch: 1, .. }));
    }

    #[test]
    fn test_empty_frames_policy_preserves_indices() {
        let mut detector = BatchedDetector::new(CountingSource::new(vec![1]))
            .with_batch_size(3)
            .with_failure_policy(BatchFailurePolicy::EmptyFrames);
        let results = detector.detect(&frames(7)).unwrap();

        assert_eq!(results.len(), 7);
        // Frames 3..6 belong to the failed batch and are empty.
        for (i, frame) in results.iter().enumerate() {
            if (3..6).contains(&i) {
                assert!(frame.detections.is_empty());
            } else {
                assert_eq!(frame.detections.len(), 1);
            }
        }
    }

    #[test]
    fn test_desynchronizing_source_is_hard_error() {
        struct ShortSource;

        impl DetectionSource for ShortSource {
            type Error = StubFailure;

            fn detect_batch(
                &mut self,
                _frames: &[Frame],
            ) -> std::result::Result<Vec<FrameDetections>, StubFailure> {
                Ok(vec![FrameDetections::default()])
            }
        }

        let mut detector = BatchedDetector::new(ShortSource)
            .with_batch_size(3)
            .with_failure_policy(BatchFailurePolicy::EmptyFrames);
        let err = detector.detect(&frames(3)).unwrap_err();
        assert!(matches!(err, Error::DetectionBatch { batch: 0, .. }));
    }
}
