//! Anonymization engine
//!
//! Rewrites a text by substituting every detected span, working from the
//! rightmost span to the leftmost. Replacing a span only changes the part of
//! the string to its right, so the offsets of every span still to be
//! processed stay valid against the partially rewritten string and are never
//! recomputed.
//!
//! Placeholder numbering is assigned in left-to-right order independently of
//! the substitution order: the Nth email found reading the text top to bottom
//! is always `[EMAIL_N]`, and a type that occurs exactly once gets no suffix.
//!
//! # Examples
//!
//! ```
//! use veil::anonymization::config::AnonymizationMode;
//! use veil::anonymization::engine::anonymize;
//! use veil::anonymization::models::{Detection, DetectionMethod, PiiType};
//!
//! let text = "Mail a@x.io or b@y.io";
//! let detections = vec![
//!     Detection::new(PiiType::Email, "b@y.io", 15, 21, DetectionMethod::Regex),
//!     Detection::new(PiiType::Email, "a@x.io", 5, 11, DetectionMethod::Regex),
//! ];
//!
//! let output = anonymize(text, &detections, AnonymizationMode::Label)?;
//! assert_eq!(output, "Mail [EMAIL_1] or [EMAIL_2]");
//! # Ok::<(), veil::domain::AnonymizationError>(())
//! ```

use crate::anonymization::anonymizer::{self, PlaceholderSlot};
use crate::anonymization::config::AnonymizationMode;
use crate::anonymization::models::Detection;
use crate::domain::AnonymizationError;
use std::collections::HashMap;

/// Rewrite `text`, substituting every detection according to `mode`
///
/// Detections may be supplied in any order; all offsets refer to `text`.
/// An empty detection list returns the text unchanged.
///
/// Detections sharing a start offset are resolved in list order. When spans
/// overlap, each one only rewrites the part of its span not already claimed
/// by a span to its left, so no original character survives and no
/// replacement is cut; a span that is fully covered inserts its replacement
/// right after the covering one.
///
/// # Errors
///
/// Returns an [`AnonymizationError`] when a detection's offsets are empty,
/// exceed the text, or split a character. Offsets come from trusted
/// detectors, so this indicates a bug upstream.
pub fn anonymize(
    text: &str,
    detections: &[Detection],
    mode: AnonymizationMode,
) -> Result<String, AnonymizationError> {
    if detections.is_empty() {
        return Ok(text.to_string());
    }

    for detection in detections {
        validate_span(text, detection)?;
    }

    let slots = assign_slots(detections);
    let regions = claim_regions(detections);
    let strategy = anonymizer::for_mode(mode);

    let mut result = text.to_string();

    // Rightmost first: splicing only shifts text to the right of the region,
    // so the offsets of every region still to be processed remain valid
    for &(i, start, end) in regions.iter().rev() {
        let replacement = strategy.replacement(&text[start..end], &slots[i]);
        result.replace_range(start..end, &replacement);
    }

    Ok(result)
}

/// Disjoint region of the original text rewritten by each detection, in
/// left-to-right order as `(index, start, end)`
///
/// For non-overlapping detections every region is the detection's own span.
fn claim_regions(detections: &[Detection]) -> Vec<(usize, usize, usize)> {
    let mut regions = Vec::with_capacity(detections.len());
    let mut claimed_until = 0;

    for i in left_to_right(detections) {
        let detection = &detections[i];
        let start = detection.start.max(claimed_until);
        let end = detection.end.max(start);
        regions.push((i, start, end));
        claimed_until = end;
    }

    regions
}

/// Detection indices ordered by start; equal starts keep list order
fn left_to_right(detections: &[Detection]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by_key(|&i| detections[i].start);
    order
}

/// Placeholder slot of every detection, indexed like `detections`
///
/// Occurrence indices follow left-to-right order of the original text;
/// detections with the same start keep their list order.
pub fn assign_slots(detections: &[Detection]) -> Vec<PlaceholderSlot> {
    let mut totals: HashMap<&'static str, usize> = HashMap::new();
    for detection in detections {
        *totals
            .entry(detection.pii_type.placeholder_name())
            .or_insert(0) += 1;
    }

    let mut seen: HashMap<&'static str, usize> = HashMap::new();
    let mut slots = vec![
        PlaceholderSlot {
            name: "",
            index: 0,
            total: 0,
        };
        detections.len()
    ];

    for i in left_to_right(detections) {
        let name = detections[i].pii_type.placeholder_name();
        let index = seen.entry(name).or_insert(0);
        *index += 1;
        slots[i] = PlaceholderSlot {
            name,
            index: *index,
            total: totals.get(name).copied().unwrap_or(1),
        };
    }

    slots
}

fn validate_span(text: &str, detection: &Detection) -> Result<(), AnonymizationError> {
    let Detection { start, end, .. } = *detection;

    if start >= end || end > text.len() {
        return Err(AnonymizationError::SpanOutOfBounds {
            start,
            end,
            len: text.len(),
        });
    }

    for offset in [start, end] {
        if !text.is_char_boundary(offset) {
            return Err(AnonymizationError::NotCharBoundary { offset });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{DetectionMethod, PiiType};

    fn detection(pii_type: PiiType, text: &str, haystack: &str) -> Detection {
        let start = haystack.find(text).expect("fixture text present");
        Detection::new(pii_type, text, start, start + text.len(), DetectionMethod::Regex)
    }

    #[test]
    fn test_empty_detections_returns_text() {
        let text = "nothing to see ****";
        assert_eq!(anonymize(text, &[], AnonymizationMode::Mask).unwrap(), text);
    }

    #[test]
    fn test_single_occurrence_has_no_suffix() {
        let text = "Call 555-123-4567 now";
        let d = detection(PiiType::Phone, "555-123-4567", text);
        let output = anonymize(text, &[d], AnonymizationMode::Label).unwrap();
        assert_eq!(output, "Call [PHONE] now");
    }

    #[test]
    fn test_numbering_independent_of_input_order() {
        let text = "From a@x.io to b@y.io cc c@z.io";
        let a = detection(PiiType::Email, "a@x.io", text);
        let b = detection(PiiType::Email, "b@y.io", text);
        let c = detection(PiiType::Email, "c@z.io", text);

        let expected = "From [EMAIL_1] to [EMAIL_2] cc [EMAIL_3]";
        for ordering in [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), a.clone(), b.clone()],
            vec![b.clone(), c.clone(), a.clone()],
        ] {
            let output = anonymize(text, &ordering, AnonymizationMode::Replace).unwrap();
            assert_eq!(output, expected);
        }
    }

    #[test]
    fn test_mask_mode() {
        let text = "My number: 555-1234.";
        let d = Detection::new(PiiType::Phone, "555-1234", 11, 19, DetectionMethod::Regex);
        let output = anonymize(text, &[d], AnonymizationMode::Mask).unwrap();
        assert_eq!(output, "My number: ********.");
    }

    #[test]
    fn test_remove_mode_keeps_alignment() {
        let text = "Ann Lee wrote to bob@x.io about Cy Doe";
        let detections = vec![
            detection(PiiType::Name, "Ann Lee", text),
            detection(PiiType::Email, "bob@x.io", text),
            detection(PiiType::Name, "Cy Doe", text),
        ];
        let output = anonymize(text, &detections, AnonymizationMode::Remove).unwrap();
        assert_eq!(output, " wrote to  about ");
    }

    #[test]
    fn test_counts_are_per_placeholder_name() {
        let text = "Ann Lee <ann@x.io>, Bo Ray";
        let detections = vec![
            detection(PiiType::Name, "Ann Lee", text),
            detection(PiiType::Email, "ann@x.io", text),
            detection(PiiType::Name, "Bo Ray", text),
        ];
        let output = anonymize(text, &detections, AnonymizationMode::Label).unwrap();
        assert_eq!(output, "[NAME_1] <[EMAIL]>, [NAME_2]");
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Café owner José Núñez";
        let d = detection(PiiType::Name, "José Núñez", text);
        let masked = anonymize(text, &[d.clone()], AnonymizationMode::Mask).unwrap();
        assert_eq!(masked, "Café owner **********");
        let labelled = anonymize(text, &[d], AnonymizationMode::Label).unwrap();
        assert_eq!(labelled, "Café owner [NAME]");
    }

    #[test]
    fn test_identical_starts_follow_list_order() {
        let text = "id 123-45-6789 end";
        let ssn = detection(PiiType::Ssn, "123-45-6789", text);
        let phone = Detection::new(
            PiiType::Phone,
            "123-45",
            ssn.start,
            ssn.start + 6,
            DetectionMethod::Regex,
        );

        let first =
            anonymize(text, &[ssn.clone(), phone.clone()], AnonymizationMode::Label).unwrap();
        assert_eq!(first, "id [SSN][PHONE] end");

        let second = anonymize(text, &[phone, ssn], AnonymizationMode::Label).unwrap();
        assert_eq!(second, "id [PHONE][SSN] end");
    }

    #[test]
    fn test_overlap_is_clamped() {
        let text = "card 4111 1111 1111 1111 done";
        let card = detection(PiiType::CreditCard, "4111 1111 1111 1111", text);
        let tail = detection(PiiType::Phone, "1111 1111 1111", text);
        let output = anonymize(text, &[card, tail], AnonymizationMode::Label).unwrap();
        assert!(!output.contains("1111"));
        assert_eq!(output, "card [CREDIT_CARD][PHONE] done");
    }

    #[test]
    fn test_contained_span_does_not_leak() {
        let text = "ref 0123456789 end";
        let outer = detection(PiiType::Passport, "0123456789", text);
        let inner = detection(PiiType::Phone, "345", text);

        let masked = anonymize(text, &[inner.clone(), outer.clone()], AnonymizationMode::Mask)
            .unwrap();
        assert_eq!(masked, "ref ********** end");

        let labelled = anonymize(text, &[inner, outer], AnonymizationMode::Label).unwrap();
        assert_eq!(labelled, "ref [PASSPORT][PHONE] end");
    }

    #[test]
    fn test_out_of_bounds_span_rejected() {
        let d = Detection::new(PiiType::Email, "x", 3, 40, DetectionMethod::Regex);
        let err = anonymize("short", &[d], AnonymizationMode::Label).unwrap_err();
        assert_eq!(
            err,
            AnonymizationError::SpanOutOfBounds {
                start: 3,
                end: 40,
                len: 5
            }
        );
    }

    #[test]
    fn test_empty_span_rejected() {
        let d = Detection::new(PiiType::Email, "", 2, 2, DetectionMethod::Regex);
        assert!(anonymize("short", &[d], AnonymizationMode::Label).is_err());
    }

    #[test]
    fn test_split_character_rejected() {
        let text = "é@x.io";
        let d = Detection::new(PiiType::Email, "?", 1, 7, DetectionMethod::Regex);
        let err = anonymize(text, &[d], AnonymizationMode::Mask).unwrap_err();
        assert_eq!(err, AnonymizationError::NotCharBoundary { offset: 1 });
    }

    #[test]
    fn test_assign_slots() {
        let text = "b@y.io a@x.io";
        let detections = vec![
            detection(PiiType::Email, "a@x.io", text),
            detection(PiiType::Email, "b@y.io", text),
        ];
        let slots = assign_slots(&detections);
        assert_eq!(slots[0].index, 2);
        assert_eq!(slots[1].index, 1);
        assert!(slots.iter().all(|s| s.total == 2 && s.name == "EMAIL"));
    }
}
