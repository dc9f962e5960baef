//! Detection acquisition: the model-facing trait, fixed-size batching, and
//! post-hoc class label normalization.

mod batch;
mod detection;
mod normalizer;
mod source;

pub use batch::{BatchFailurePolicy, BatchedDetector, DEFAULT_BATCH_SIZE};
pub use detection::{ClassTable, Detection, FrameDetections, TrackedDetection};
pub use normalizer::ClassNormalizer;
pub use source::DetectionSource;
