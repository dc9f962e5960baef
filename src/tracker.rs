//! Track association: the pluggable strategy contract plus the default
//! IoU-based implementation and its support types.

mod associator;
mod matching;
mod rect;
mod track;

pub use associator::{AssociatorConfig, IouAssociator, TrackAssociator};
pub use matching::{MatchOutcome, match_by_iou};
pub use rect::Rect;
pub use track::{MotionTrack, TrackState};
