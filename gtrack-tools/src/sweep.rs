//! Overlap of two sorted interval sets.
//!
//! Both algorithms take the intervals of each set as parallel `starts` /
//! `ends` slices. Within a set, every interval must have `start <= end` and
//! the set must be sorted by end. The encoded sweep additionally needs the
//! intervals of a set to be disjoint, which is what a `noOverlaps` store
//! holds. Violations are reported as [`GtrackError::MalformedSequence`].
use gtrack_core::{GtrackError, Result};

/// Largest coordinate the encoded sweep can pack without overflowing `i64`.
pub const MAX_ENCODED_COORDINATE: i64 = (i64::MAX - 7) / 8;

// event tags: position * 8 + tag
const A_START: i64 = 5;
const A_END: i64 = 3;
const B_START: i64 = 6;
const B_END: i64 = 2;
const BOTH_COVERED: i64 = 3;

///
/// Check that one interval set is sorted by end and has no negative-length
/// intervals.
///
pub fn validate_intervals(starts: &[i64], ends: &[i64]) -> Result<()> {
    if starts.len() != ends.len() {
        return Err(GtrackError::MalformedSequence(format!(
            "{} starts but {} ends",
            starts.len(),
            ends.len()
        )));
    }

    let mut previous_end = i64::MIN;
    for (i, (&start, &end)) in starts.iter().zip(ends).enumerate() {
        if end < start {
            return Err(GtrackError::MalformedSequence(format!(
                "interval {} ends before it starts: [{}, {})",
                i, start, end
            )));
        }
        if end < previous_end {
            return Err(GtrackError::MalformedSequence(format!(
                "interval {} is not sorted by end: {} after {}",
                i, end, previous_end
            )));
        }
        previous_end = end;
    }
    Ok(())
}

///
/// Check that no interval of a set starts before its predecessor ends.
///
/// The cover status of the encoded sweep can't tell one set covering a
/// stretch twice from the other set covering it once.
///
pub fn validate_disjoint(starts: &[i64], ends: &[i64]) -> Result<()> {
    for (i, window) in ends.windows(2).enumerate() {
        let start = starts[i + 1];
        if start < window[0] {
            return Err(GtrackError::MalformedSequence(format!(
                "interval {} overlaps its predecessor: starts at {} before {}",
                i + 1,
                start,
                window[0]
            )));
        }
    }
    Ok(())
}

///
/// Two-cursor sweep: walk both sets by ascending end, adding the overlap of
/// the two current intervals and advancing the one that ends first.
///
/// An empty set on either side overlaps nothing. Intervals within a set may
/// overlap each other; each pair of current intervals is counted once.
///
pub fn sweep_overlap(
    starts1: &[i64],
    ends1: &[i64],
    starts2: &[i64],
    ends2: &[i64],
) -> Result<i64> {
    validate_intervals(starts1, ends1)?;
    validate_intervals(starts2, ends2)?;

    let (mut i, mut j) = (0, 0);
    let mut total = 0;
    while i < ends1.len() && j < ends2.len() {
        let overlap = ends1[i].min(ends2[j]) - starts1[i].max(starts2[j]);
        if overlap > 0 {
            total += overlap;
        }

        match ends1[i].cmp(&ends2[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    Ok(total)
}

///
/// Encoded sweep: pack every boundary of both sets into one integer,
/// `position * 8 + tag`, sort once and run the cover status along.
///
/// Tags order ties so that ends come before starts at the same position.
/// `tag - 4` is the change in cover status: +1/-1 for set A, +2/-2 for set B,
/// so a status of 3 means both sets cover the stretch up to the next boundary.
///
/// # Returns
/// - the total overlap, `MalformedSequence` if the intervals of either set
///   overlap each other, or `CoordinateOverflow` for coordinates outside
///   `[0, MAX_ENCODED_COORDINATE]`
pub fn encoded_overlap(
    starts1: &[i64],
    ends1: &[i64],
    starts2: &[i64],
    ends2: &[i64],
) -> Result<i64> {
    validate_intervals(starts1, ends1)?;
    validate_intervals(starts2, ends2)?;
    validate_disjoint(starts1, ends1)?;
    validate_disjoint(starts2, ends2)?;
    if ends1.is_empty() || ends2.is_empty() {
        return Ok(0);
    }

    let mut events = Vec::with_capacity(2 * (ends1.len() + ends2.len()));
    for (positions, tag) in [
        (starts1, A_START),
        (ends1, A_END),
        (starts2, B_START),
        (ends2, B_END),
    ] {
        for &position in positions {
            events.push(encode(position, tag)?);
        }
    }
    events.sort_unstable();

    let mut cover = 0;
    let mut total = 0;
    let mut previous = 0;
    for event in events {
        let position = event / 8;
        if cover == BOTH_COVERED {
            total += position - previous;
        }
        cover += event % 8 - 4;
        previous = position;
    }
    Ok(total)
}

fn encode(position: i64, tag: i64) -> Result<i64> {
    if !(0..=MAX_ENCODED_COORDINATE).contains(&position) {
        return Err(GtrackError::CoordinateOverflow(position));
    }
    Ok(position * 8 + tag)
}
