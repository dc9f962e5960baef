//! Track-to-detection assignment via IoU cost and Jonker-Volgenant solving.

use ndarray::Array2;

use crate::tracker::rect::Rect;

/// Cost assigned to padded cells so they are never preferred over a real pair.
const UNREACHABLE_COST: f64 = 1e6;

/// Outcome of one frame's assignment between predicted tracks and detections.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Accepted pairs as (track index, detection index).
    pub matches: Vec<(usize, usize)>,
    /// Track indices left without a detection this frame.
    pub unmatched_tracks: Vec<usize>,
    /// Detection indices not claimed by any track.
    pub unmatched_detections: Vec<usize>,
}

/// Globally assign detections to predicted track boxes.
///
/// Builds a padded square cost matrix of `1 - IoU`, solves it with lapjv, and
/// rejects any assignment whose IoU falls below `min_iou`. Rejected rows and
/// columns are reported as unmatched.
pub fn match_by_iou(tracks: &[Rect], detections: &[Rect], min_iou: f32) -> MatchOutcome {
    if tracks.is_empty() || detections.is_empty() {
        return MatchOutcome {
            matches: Vec::new(),
            unmatched_tracks: (0..tracks.len()).collect(),
            unmatched_detections: (0..detections.len()).collect(),
        };
    }

    let size = tracks.len().max(detections.len());
    let mut cost = Array2::<f64>::from_elem((size, size), UNREACHABLE_COST);
    for (i, track) in tracks.iter().enumerate() {
        for (j, det) in detections.iter().enumerate() {
            cost[[i, j]] = f64::from(1.0 - track.iou(det));
        }
    }

    let max_cost = f64::from(1.0 - min_iou);
    let mut outcome = MatchOutcome::default();
    let mut det_claimed = vec![false; detections.len()];

    match lapjv::lapjv(&cost) {
        Ok((row_to_col, _)) => {
            for (track_idx, &det_idx) in row_to_col.iter().enumerate().take(tracks.len()) {
                if det_idx < detections.len() && cost[[track_idx, det_idx]] <= max_cost {
                    outcome.matches.push((track_idx, det_idx));
                    det_claimed[det_idx] = true;
                } else {
                    outcome.unmatched_tracks.push(track_idx);
                }
            }
        }
        Err(_) => {
            outcome.unmatched_tracks = (0..tracks.len()).collect();
        }
    }

    outcome.unmatched_detections = det_claimed
        .iter()
        .enumerate()
        .filter_map(|(j, &claimed)| if claimed { None } else { Some(j) })
        .collect();

    outcome
}
