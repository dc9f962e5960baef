//! Trait for object detection inference backends.

use crate::Frame;
use crate::detect::FrameDetections;

/// Trait for object detection inference backends.
///
/// The model behind this trait is opaque to the pipeline: it receives a batch
/// of decoded frames and must return exactly one [`FrameDetections`] per
/// input frame, in input order, each carrying the batch's label table.
/// Setup failures (missing or corrupt model files) should be reported by the
/// implementation's constructor as
/// [`Error::ModelInit`](crate::Error::ModelInit) before any frame is
/// processed.
///
/// # Example
///
/// ```ignore
/// use pitchtrack::{DetectionSource, Frame, FrameDetections};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect_batch(&mut self, frames: &[Frame]) -> Result<Vec<FrameDetections>, Self::Error> {
///         // Run inference and return one result per frame
///         Ok(frames.iter().map(|_| FrameDetections::default()).collect())
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run inference on a batch of frames.
    ///
    /// Implementations may parallelize internally, but results must be
    /// reassembled in input order before returning.
    fn detect_batch(&mut self, frames: &[Frame]) -> Result<Vec<FrameDetections>, Self::Error>;
}
