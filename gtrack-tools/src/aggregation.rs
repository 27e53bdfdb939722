//! Folding per-view metrics over region lists and over whole tracks.
use std::ops::Add;

use log::info;

use gtrack_core::{GenomeRegion, GtrackConfig, Result, TrackName};
use gtrack_track::{Track, TrackView};

use crate::models::{OverlapAlgorithm, WeightSum};
use crate::operations;

///
/// Sum `metric` over one view per bounding region of `track`.
///
/// Together the bounding regions hold all the data of the track, so this is
/// the genome-wide value of the metric.
///
pub fn fold_bounding_regions<T, F>(track: &Track, metric: F) -> Result<T>
where
    T: Default + Add<Output = T>,
    F: FnMut(&mut TrackView) -> Result<T>,
{
    let regions: Vec<GenomeRegion> = track
        .bounding_regions()
        .get_all_bounding_regions()
        .iter()
        .map(|br| br.region.clone())
        .collect();
    fold_regions(track, &regions, metric)
}

///
/// Sum `metric` over one view of `track` per region.
///
pub fn fold_regions<T, F>(track: &Track, regions: &[GenomeRegion], mut metric: F) -> Result<T>
where
    T: Default + Add<Output = T>,
    F: FnMut(&mut TrackView) -> Result<T>,
{
    let mut total = T::default();
    for region in regions {
        let mut view = track.get_track_view(region)?;
        total = total + metric(&mut view)?;
    }
    Ok(total)
}

pub fn count_elements_in_all_bounding_regions(
    config: &GtrackConfig,
    genome: &str,
    track_name: &TrackName,
    allow_overlaps: bool,
) -> Result<usize> {
    let track = Track::open(config, genome, track_name, allow_overlaps)?;
    let count = fold_bounding_regions(&track, |view| Ok(operations::count_elements(view)))?;

    info!(
        "Track '{}' of genome '{}' has {} elements in {} bounding regions",
        track_name,
        genome,
        count,
        track.bounding_regions().get_all_bounding_regions().len()
    );
    Ok(count)
}

pub fn coverage_in_regions(track: &Track, regions: &[GenomeRegion]) -> Result<i64> {
    fold_regions(track, regions, operations::coverage)
}

pub fn count_elements_in_regions(track: &Track, regions: &[GenomeRegion]) -> Result<usize> {
    fold_regions(track, regions, |view| Ok(operations::count_elements(view)))
}

pub fn sum_of_values_in_regions(track: &Track, regions: &[GenomeRegion]) -> Result<f64> {
    fold_regions(track, regions, operations::sum_of_values)
}

pub fn sum_of_weights_in_regions(
    track: &Track,
    regions: &[GenomeRegion],
    method: WeightSum,
) -> Result<f64> {
    fold_regions(track, regions, |view| {
        operations::sum_of_weights_with(view, method)
    })
}

///
/// Overlap of two tracks summed over `regions`. Each region is viewed in
/// both tracks and the views are overlapped with `algorithm`.
///
pub fn overlap_in_regions(
    track1: &Track,
    track2: &Track,
    regions: &[GenomeRegion],
    algorithm: OverlapAlgorithm,
) -> Result<i64> {
    fold_regions(track1, regions, |view1| {
        let mut view2 = track2.get_track_view(view1.region())?;
        operations::overlap_with(view1, &mut view2, algorithm)
    })
}
