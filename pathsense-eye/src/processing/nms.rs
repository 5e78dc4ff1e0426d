//! Ordering and non-maximum suppression over detector output

use pathsense_core::DetectionCandidate;
use std::cmp::Ordering;

/// Drop candidates with unusable confidence and sort the rest descending.
/// The sort is stable, so equal scores keep detector order.
pub fn sort_by_confidence(candidates: &mut Vec<DetectionCandidate>) {
    candidates.retain(|c| c.confidence.is_finite() && (0.0..=1.0).contains(&c.confidence));
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
}

/// Class-aware non-maximum suppression.
///
/// Input must already be confidence-descending. A candidate is suppressed
/// when it overlaps a kept candidate with the same label by more than
/// `iou_threshold`. A threshold of 1.0 or more keeps everything.
pub fn apply_nms(candidates: Vec<DetectionCandidate>, iou_threshold: f64) -> Vec<DetectionCandidate> {
    if candidates.len() < 2 || iou_threshold >= 1.0 {
        return candidates;
    }

    let mut keep: Vec<DetectionCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let overlapped = keep.iter().any(|kept| {
            kept.label == candidate.label && kept.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !overlapped {
            keep.push(candidate);
        }
    }
    keep
}
