//! Interval algebra over gtrack tracks.
//!
//! The functions in [`operations`] compute one metric over one [`TrackView`]
//! (or a pair of views): coverage, element counts, overlap, sums of values and
//! of edge weights. [`aggregation`] folds those metrics over lists of regions
//! or over all bounding regions of a track.
//!
//! Overlap comes in two flavours that agree on well-formed input, see
//! [`OverlapAlgorithm`]. Only the two-cursor sweep accepts views whose
//! elements overlap each other. The slice-level versions live in [`sweep`].
//!
//! ```no_run
//! use gtrack_core::{GtrackConfig, GenomeRegion};
//! use gtrack_track::Track;
//! use gtrack_tools::operations::{coverage, overlap_iter};
//!
//! # fn main() -> gtrack_core::Result<()> {
//! let config = GtrackConfig::from_env();
//! let genes = Track::open(&config, "hg19", &"Genes:Refseq".parse()?, false)?;
//! let peaks = Track::open(&config, "hg19", &"Peaks".parse()?, false)?;
//!
//! let region = GenomeRegion::parse("hg19", "chr21:0-1,000,000")?;
//! let mut gene_view = genes.get_track_view(&region)?;
//! let mut peak_view = peaks.get_track_view(&region)?;
//!
//! println!("{}", coverage(&mut gene_view)?);
//! println!("{}", overlap_iter(&mut gene_view, &mut peak_view)?);
//! # Ok(())
//! # }
//! ```
//!
//! [`TrackView`]: gtrack_track::TrackView
pub mod aggregation;
pub mod models;
pub mod operations;
pub mod sweep;

// re-exports
pub use self::aggregation::{
    count_elements_in_all_bounding_regions, count_elements_in_regions, coverage_in_regions,
    fold_bounding_regions, fold_regions, overlap_in_regions, sum_of_values_in_regions,
    sum_of_weights_in_regions,
};
pub use self::models::{OverlapAlgorithm, WeightSum};
pub use self::operations::{
    count_elements, coverage, overlap, overlap_iter, overlap_with, sum_of_values,
    sum_of_weights, sum_of_weights_iter, sum_of_weights_with,
};
