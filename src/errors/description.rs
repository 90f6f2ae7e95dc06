//! Parser for `code:reason:values` failure descriptions.
//!
//! Validators attach a custom description such as
//! `nameLengthMustBeBetween:Name length must be between 3 and 32:3, 32`.
//! The string is split on `:` at most twice, skipping empty pieces; the
//! third segment is a list separated by the literal `", "`.

const SEGMENT_DELIMITER: char = ':';
const MAX_SPLITS: usize = 2;
const VALUES_DELIMITER: &str = ", ";

/// Parsed form of a custom failure description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDescription {
    pub code: String,
    pub reason: String,
    pub values: Vec<String>,
}

/// Split a custom failure description into code, reason and values.
///
/// A description with fewer than two non-empty segments yields an empty
/// code, the whole input as reason and no values.
pub fn parse_failure_description(description: &str) -> FailureDescription {
    let segments = split_segments(description);

    match segments.as_slice() {
        [code, reason, values] => FailureDescription {
            code: (*code).to_string(),
            reason: (*reason).to_string(),
            values: split_values(values),
        },
        [code, reason] => FailureDescription {
            code: (*code).to_string(),
            reason: (*reason).to_string(),
            values: Vec::new(),
        },
        _ => FailureDescription {
            code: String::new(),
            reason: description.to_string(),
            values: Vec::new(),
        },
    }
}

/// Split on `:` at most [`MAX_SPLITS`] times. Empty pieces are dropped and
/// do not count as splits; the remainder after the last split is kept as is.
fn split_segments(description: &str) -> Vec<&str> {
    let mut segments = Vec::with_capacity(MAX_SPLITS + 1);
    let mut rest = description;

    while segments.len() < MAX_SPLITS {
        let Some((piece, tail)) = rest.split_once(SEGMENT_DELIMITER) else {
            break;
        };
        if !piece.is_empty() {
            segments.push(piece);
        }
        rest = tail;
    }

    if !rest.is_empty() {
        segments.push(rest);
    }

    segments
}

fn split_values(segment: &str) -> Vec<String> {
    segment.split(VALUES_DELIMITER).map(str::to_string).collect()
}
