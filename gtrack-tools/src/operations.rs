//! Metrics over single track views and pairs of views.
use std::cmp::Ordering;

use log::warn;

use gtrack_core::{GtrackError, Result};
use gtrack_track::{TrackElement, TrackElementIter, TrackView};

use crate::models::{OverlapAlgorithm, WeightSum};
use crate::sweep::encoded_overlap;

/// Format-dependent coverage of the view, see [`TrackView::coverage`].
pub fn coverage(view: &mut TrackView) -> Result<i64> {
    view.coverage()
}

pub fn count_elements(view: &TrackView) -> usize {
    view.num_elements()
}

///
/// Overlap of two views by the encoded sweep over their start and end
/// columns. Fails with `MalformedSequence` when the elements of either view
/// overlap each other; use [`overlap_iter`] for those.
///
pub fn overlap(view1: &mut TrackView, view2: &mut TrackView) -> Result<i64> {
    let starts1 = view1.starts_as_array()?;
    let ends1 = view1.ends_as_array()?;
    let starts2 = view2.starts_as_array()?;
    let ends2 = view2.ends_as_array()?;
    encoded_overlap(&starts1, &ends1, &starts2, &ends2)
}

///
/// Overlap of two views by walking their elements with two cursors.
///
/// Elements of one view may overlap each other but must come sorted by end.
/// They are validated as they are visited, so a malformed tail after the
/// point where one view runs out goes unnoticed.
///
pub fn overlap_iter(view1: &mut TrackView, view2: &mut TrackView) -> Result<i64> {
    let mut first = CheckedElements::new(view1.iter()?);
    let mut second = CheckedElements::new(view2.iter()?);

    let mut a = first.next_checked()?;
    let mut b = second.next_checked()?;
    let mut total = 0;

    while let (Some(x), Some(y)) = (a, b) {
        let overlap = x.end().min(y.end()) - x.start().max(y.start());
        if overlap > 0 {
            total += overlap;
        }

        match x.end().cmp(&y.end()) {
            Ordering::Less => a = first.next_checked()?,
            Ordering::Greater => b = second.next_checked()?,
            Ordering::Equal => {
                a = first.next_checked()?;
                b = second.next_checked()?;
            }
        }
    }
    Ok(total)
}

pub fn overlap_with(
    view1: &mut TrackView,
    view2: &mut TrackView,
    algorithm: OverlapAlgorithm,
) -> Result<i64> {
    if view1.region().chr != view2.region().chr {
        warn!(
            "Overlapping views on different sequences: {} and {}",
            view1.region(),
            view2.region()
        );
        return Ok(0);
    }

    match algorithm {
        OverlapAlgorithm::Sweep => overlap_iter(view1, view2),
        OverlapAlgorithm::Encoded => overlap(view1, view2),
    }
}

/// Sum of the value column. Missing values (NaN) are skipped.
pub fn sum_of_values(view: &mut TrackView) -> Result<f64> {
    Ok(view
        .vals_as_array()?
        .iter()
        .filter(|v| !v.is_nan())
        .sum())
}

/// Sum of all edge weights of the view, read as one column.
pub fn sum_of_weights(view: &mut TrackView) -> Result<f64> {
    let weights = view.weights_as_array()?;
    let values = weights.as_f64().ok_or_else(|| GtrackError::DtypeMismatch {
        node: "weights".to_string(),
        expected: "float64".to_string(),
        found: weights.dtype().to_string(),
    })?;
    Ok(values.iter().filter(|w| !w.is_nan()).sum())
}

/// Sum of all edge weights of the view, accumulated element by element.
pub fn sum_of_weights_iter(view: &mut TrackView) -> Result<f64> {
    if !view.format().is_linked() {
        return Err(GtrackError::InvalidFormat(format!(
            "'{}' tracks have no weights",
            view.format()
        )));
    }

    let mut total = 0.0;
    for element in view.iter()? {
        total += element.weights().sum::<f64>();
    }
    Ok(total)
}

pub fn sum_of_weights_with(view: &mut TrackView, method: WeightSum) -> Result<f64> {
    match method {
        WeightSum::Bulk => sum_of_weights(view),
        WeightSum::Streaming => sum_of_weights_iter(view),
    }
}

/// Element cursor that checks the sweep preconditions on the fly.
struct CheckedElements<'a> {
    elements: TrackElementIter<'a>,
    previous_end: i64,
    index: usize,
}

impl<'a> CheckedElements<'a> {
    fn new(elements: TrackElementIter<'a>) -> Self {
        CheckedElements {
            elements,
            previous_end: i64::MIN,
            index: 0,
        }
    }

    fn next_checked(&mut self) -> Result<Option<TrackElement<'a>>> {
        let Some(element) = self.elements.next() else {
            return Ok(None);
        };

        if element.end() < element.start() || element.end() < self.previous_end {
            return Err(GtrackError::MalformedSequence(format!(
                "element {} at [{}, {}) is not sorted by end after {}",
                self.index,
                element.start(),
                element.end(),
                self.previous_end
            )));
        }
        self.previous_end = element.end();
        self.index += 1;
        Ok(Some(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use gtrack_core::{GenomeRegion, GtrackConfig, TrackFormat, TrackName};
    use gtrack_track::{GenomeElement, Track, TrackBuilder};

    const GENOME: &str = "testgenome";

    fn open(
        config: &GtrackConfig,
        name: &str,
        builder: &TrackBuilder,
        allow_overlaps: bool,
    ) -> Track {
        let name: TrackName = name.parse().unwrap();
        builder
            .write_variant(config, GENOME, &name, allow_overlaps)
            .unwrap();
        Track::open(config, GENOME, &name, allow_overlaps).unwrap()
    }

    fn chr1(start: i64, end: i64) -> GenomeRegion {
        GenomeRegion::new(GENOME, "chr1", start, end).unwrap()
    }

    #[fixture]
    fn tempdir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn test_points_overlap_segments(tempdir: tempfile::TempDir) {
        let config = GtrackConfig::new(tempdir.path());

        let mut points = TrackBuilder::new(TrackFormat::Points);
        for start in [1, 5, 12, 30] {
            points.add_element(GenomeElement::point("chr1", start));
        }
        let mut segments = TrackBuilder::new(TrackFormat::Segments);
        segments
            .add_element(GenomeElement::segment("chr1", 0, 10))
            .add_element(GenomeElement::segment("chr1", 25, 31));

        let points = open(&config, "points", &points, false);
        let segments = open(&config, "segments", &segments, false);

        let mut p = points.get_track_view(&chr1(0, 100)).unwrap();
        let mut s = segments.get_track_view(&chr1(0, 100)).unwrap();
        assert_eq!(overlap(&mut p, &mut s).unwrap(), 3);
        assert_eq!(overlap_iter(&mut p, &mut s).unwrap(), 3);
        assert_eq!(
            overlap_with(&mut s, &mut p, OverlapAlgorithm::Encoded).unwrap(),
            3
        );
    }

    #[rstest]
    fn test_overlapping_elements_need_the_sweep(tempdir: tempfile::TempDir) {
        let config = GtrackConfig::new(tempdir.path());
        let mut builder = TrackBuilder::new(TrackFormat::ValuedSegments);
        builder
            .add_element(GenomeElement::segment("chr1", 0, 20).with_val(1.0))
            .add_element(GenomeElement::segment("chr1", 10, 30).with_val(1.0));
        let track = open(&config, "valued", &builder, true);

        let mut v1 = track.get_track_view(&chr1(0, 100)).unwrap();
        let mut v2 = v1.clone();
        assert_eq!(overlap_iter(&mut v1, &mut v2).unwrap(), 40);
        assert!(matches!(
            overlap(&mut v1, &mut v2),
            Err(GtrackError::MalformedSequence(_))
        ));
    }

    #[rstest]
    fn test_ends_out_of_order_are_malformed(tempdir: tempfile::TempDir) {
        let config = GtrackConfig::new(tempdir.path());
        let mut builder = TrackBuilder::new(TrackFormat::Segments);
        builder
            .add_element(GenomeElement::segment("chr1", 0, 50))
            .add_element(GenomeElement::segment("chr1", 10, 20));
        let track = open(&config, "nested", &builder, true);

        let mut v1 = track.get_track_view(&chr1(0, 100)).unwrap();
        let mut v2 = v1.clone();
        for algorithm in [OverlapAlgorithm::Sweep, OverlapAlgorithm::Encoded] {
            assert!(matches!(
                overlap_with(&mut v1, &mut v2, algorithm),
                Err(GtrackError::MalformedSequence(_))
            ));
        }
    }

    #[rstest]
    fn test_sum_of_values_skips_missing(tempdir: tempfile::TempDir) {
        let config = GtrackConfig::new(tempdir.path());
        let mut builder = TrackBuilder::new(TrackFormat::ValuedPoints);
        builder
            .add_element(GenomeElement::point("chr1", 1).with_val(1.5))
            .add_element(GenomeElement::point("chr1", 2))
            .add_element(GenomeElement::point("chr1", 3).with_val(2.5));
        let track = open(&config, "valued", &builder, false);

        let mut view = track.get_track_view(&chr1(0, 10)).unwrap();
        assert_eq!(sum_of_values(&mut view).unwrap(), 4.0);
        assert_eq!(count_elements(&view), 3);
        assert_eq!(coverage(&mut view).unwrap(), 3);
    }

    #[rstest]
    fn test_weights_need_linked_format(tempdir: tempfile::TempDir) {
        let config = GtrackConfig::new(tempdir.path());
        let mut builder = TrackBuilder::new(TrackFormat::Segments);
        builder.add_element(GenomeElement::segment("chr1", 0, 10));
        let track = open(&config, "plain", &builder, false);

        let mut view = track.get_track_view(&chr1(0, 10)).unwrap();
        for method in [WeightSum::Bulk, WeightSum::Streaming] {
            assert!(matches!(
                sum_of_weights_with(&mut view, method),
                Err(GtrackError::InvalidFormat(_))
            ));
        }
        assert!(matches!(
            sum_of_values(&mut view),
            Err(GtrackError::InvalidFormat(_))
        ));
    }

    #[rstest]
    fn test_empty_view_overlaps_nothing(tempdir: tempfile::TempDir) {
        let config = GtrackConfig::new(tempdir.path());
        let mut builder = TrackBuilder::new(TrackFormat::Segments);
        builder.add_element(GenomeElement::segment("chr1", 0, 10));
        let track = open(&config, "plain", &builder, false);

        let mut full = track.get_track_view(&chr1(0, 10)).unwrap();
        let mut empty = track.get_track_view(&chr1(50, 60)).unwrap();
        assert!(empty.is_empty());
        for algorithm in [OverlapAlgorithm::Sweep, OverlapAlgorithm::Encoded] {
            assert_eq!(
                overlap_with(&mut full, &mut empty, algorithm).unwrap(),
                0
            );
        }
    }
}
