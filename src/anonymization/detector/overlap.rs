//! Overlap resolution for pattern matches
//!
//! Independent pattern scans routinely report the same characters twice (a
//! card number that also satisfies the phone pattern, a name inside a longer
//! match). Resolution is greedy: longer matches are preferred, then higher
//! confidence, then the earlier start; a candidate is kept only if it shares
//! no byte with an already kept match.

use crate::anonymization::models::Detection;
use std::cmp::Ordering;

/// Drop overlapping detections and return the survivors in left-to-right order
pub fn resolve_overlaps(mut detections: Vec<Detection>) -> Vec<Detection> {
    if detections.len() < 2 {
        return detections;
    }

    detections.sort_by(preference);

    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
    for candidate in detections {
        if kept.iter().all(|k| !k.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|d| d.start);
    kept
}

fn preference(a: &Detection, b: &Detection) -> Ordering {
    b.len()
        .cmp(&a.len())
        .then_with(|| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.start.cmp(&b.start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{DetectionMethod, PiiType};

    fn span(pii_type: PiiType, start: usize, end: usize, confidence: f32) -> Detection {
        Detection::new(pii_type, "x", start, end, DetectionMethod::Regex).with_confidence(confidence)
    }

    #[test]
    fn test_disjoint_spans_are_kept_in_order() {
        let resolved = resolve_overlaps(vec![
            span(PiiType::Email, 20, 30, 0.95),
            span(PiiType::Name, 0, 8, 0.85),
        ]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].start, 0);
        assert_eq!(resolved[1].start, 20);
    }

    #[test]
    fn test_longest_match_wins() {
        let resolved = resolve_overlaps(vec![
            span(PiiType::Phone, 5, 17, 0.95),
            span(PiiType::CreditCard, 0, 19, 0.92),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].pii_type, PiiType::CreditCard);
    }

    #[test]
    fn test_confidence_breaks_length_ties() {
        let resolved = resolve_overlaps(vec![
            span(PiiType::Ssn, 0, 11, 0.9),
            span(PiiType::Phone, 0, 11, 0.88),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].pii_type, PiiType::Ssn);
    }

    #[test]
    fn test_earlier_start_breaks_full_ties() {
        let resolved = resolve_overlaps(vec![
            span(PiiType::Name, 4, 12, 0.85),
            span(PiiType::Name, 0, 8, 0.85),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].start, 0);
    }

    #[test]
    fn test_adjacent_spans_do_not_overlap() {
        let resolved = resolve_overlaps(vec![
            span(PiiType::Name, 0, 5, 0.85),
            span(PiiType::Email, 5, 10, 0.95),
        ]);
        assert_eq!(resolved.len(), 2);
    }
}
