use std::sync::Arc;

use log::debug;

use gtrack_core::consts::{EDGES_NODE, END_NODE, ID_NODE, START_NODE, VAL_NODE, WEIGHTS_NODE};
use gtrack_core::utils::store_path;
use gtrack_core::{
    BoundingRegion, GenomeRegion, GtrackConfig, GtrackError, Result, TrackFormat, TrackName,
};
use gtrack_store::{StoreReader, VirtualColumn};

use crate::bounding_region::BoundingRegionHandler;
use crate::metadata::{StoredTrackMetadata, TrackMetadata};
use crate::track_view::{TrackView, ViewColumns};

///
/// A handle on one stored track.
///
/// The track owns no element data. Every call to [`Track::get_track_view`]
/// builds a fresh view whose columns read from the store on demand.
///
#[derive(Debug, Clone)]
pub struct Track {
    genome: String,
    name: TrackName,
    allow_overlaps: bool,
    reader: Arc<StoreReader>,
    format: TrackFormat,
    bounding_regions: BoundingRegionHandler,
}

impl Track {
    ///
    /// Open the track `name` of `genome` under the configured data directory.
    ///
    /// # Arguments
    /// - config: decides where track stores live
    /// - genome: genome the track is defined on
    /// - name: hierarchical track name
    /// - allow_overlaps: open the `withOverlaps` variant instead of `noOverlaps`
    ///
    pub fn open(
        config: &GtrackConfig,
        genome: &str,
        name: &TrackName,
        allow_overlaps: bool,
    ) -> Result<Self> {
        let reader = StoreReader::new(store_path(config, genome, name, allow_overlaps));
        Track::from_store(reader, genome, name.clone(), allow_overlaps)
    }

    /// Open a track from an explicit store file, reading its format from the store.
    pub fn from_store(
        reader: StoreReader,
        genome: &str,
        name: TrackName,
        allow_overlaps: bool,
    ) -> Result<Self> {
        let reader = Arc::new(reader);
        let metadata = StoredTrackMetadata::new(Arc::clone(&reader));
        Track::with_metadata(reader, genome, name, allow_overlaps, &metadata)
    }

    /// Open a track whose format is supplied by `metadata` instead of the store.
    pub fn with_metadata(
        reader: Arc<StoreReader>,
        genome: &str,
        name: TrackName,
        allow_overlaps: bool,
        metadata: &dyn TrackMetadata,
    ) -> Result<Self> {
        if !reader.exists() {
            return Err(GtrackError::NotFound(format!(
                "No store for track '{}' of genome '{}' at {}",
                name,
                genome,
                reader.path().display()
            )));
        }

        let format = metadata.track_format()?;
        let bounding_regions = BoundingRegionHandler::from_reader(&reader, genome, allow_overlaps)?;

        debug!(
            "Opened track '{}' ({}) with {} bounding regions",
            name,
            format,
            bounding_regions.get_all_bounding_regions().len()
        );

        Ok(Track {
            genome: genome.to_string(),
            name,
            allow_overlaps,
            reader,
            format,
            bounding_regions,
        })
    }

    pub fn genome(&self) -> &str {
        &self.genome
    }

    pub fn name(&self) -> &TrackName {
        &self.name
    }

    pub fn allow_overlaps(&self) -> bool {
        self.allow_overlaps
    }

    pub fn format(&self) -> TrackFormat {
        self.format
    }

    pub fn bounding_regions(&self) -> &BoundingRegionHandler {
        &self.bounding_regions
    }

    ///
    /// Restrict the track to `region`.
    ///
    /// Sparse tracks return every row overlapping the region, possibly across
    /// several bounding regions. Dense tracks need the region to lie inside a
    /// single bounding region.
    ///
    pub fn get_track_view(&self, region: &GenomeRegion) -> Result<TrackView> {
        if region.genome != self.genome {
            return Err(GtrackError::OutsideBoundingRegion(format!(
                "region {} is not on genome '{}' of track '{}'",
                region, self.genome, self.name
            )));
        }

        let view = if self.format.is_dense() {
            self.dense_view(region)?
        } else {
            self.sparse_view(region)?
        };

        debug!(
            "View of '{}' over {} has {} elements",
            self.name,
            region,
            view.num_elements()
        );
        Ok(view)
    }

    fn sparse_view(&self, region: &GenomeRegion) -> Result<TrackView> {
        let brs = self.bounding_regions.overlapping(region);
        let span = match (brs.first(), brs.last()) {
            (Some(first), Some(last)) => (first.start_index, last.end_index),
            _ => (0, 0),
        };

        let mut columns = self.columns(span.0, span.1)?;
        if span.0 < span.1 {
            let (lower, upper) = sparse_row_bounds(&mut columns, self.format, region)?;
            narrow(&mut columns, lower, upper)?;
        }

        TrackView::new(
            region.clone(),
            self.format,
            self.allow_overlaps,
            region.start,
            columns,
        )
    }

    fn dense_view(&self, region: &GenomeRegion) -> Result<TrackView> {
        let br = self.enclosing(region)?;
        let mut columns = self.columns(br.start_index, br.end_index)?;

        let (lower, upper, first_start) = if self.format.is_partition() {
            let ends = match columns.ends.as_mut() {
                Some(ends) => ends.i64_values()?,
                None => &[],
            };
            let lower = ends.partition_point(|&e| e <= region.start);
            let upper = if region.is_empty() {
                lower
            } else {
                (ends.partition_point(|&e| e < region.end) + 1).min(ends.len())
            };
            let previous_end = match lower {
                0 => br.region.start,
                _ => ends[lower - 1],
            };
            (lower, upper.max(lower), previous_end.max(region.start))
        } else {
            let rows = br.num_rows();
            let lower = ((region.start - br.region.start) as usize).min(rows);
            let upper = ((region.end - br.region.start) as usize).min(rows);
            (lower, upper, br.region.start + lower as i64)
        };

        narrow(&mut columns, lower, upper)?;
        TrackView::new(
            region.clone(),
            self.format,
            self.allow_overlaps,
            first_start,
            columns,
        )
    }

    fn enclosing(&self, region: &GenomeRegion) -> Result<&BoundingRegion> {
        self.bounding_regions.enclosing(region).ok_or_else(|| {
            GtrackError::OutsideBoundingRegion(format!(
                "region {} is not inside a single bounding region of track '{}'",
                region, self.name
            ))
        })
    }

    fn columns(&self, start_index: usize, end_index: usize) -> Result<ViewColumns> {
        let active = self.format.columns();
        let column = |present: bool, node: &str| -> Result<Option<VirtualColumn>> {
            if !present {
                return Ok(None);
            }
            VirtualColumn::new(Arc::clone(&self.reader), node, start_index, end_index).map(Some)
        };

        Ok(ViewColumns {
            starts: column(active.starts, START_NODE)?,
            ends: column(active.ends, END_NODE)?,
            vals: column(active.vals, VAL_NODE)?,
            ids: column(active.linked, ID_NODE)?,
            edges: column(active.linked, EDGES_NODE)?,
            weights: column(active.linked, WEIGHTS_NODE)?,
        })
    }
}

///
/// Rows of a sparse span that may overlap `region`: from the first row ending
/// after the region start up to the first row starting at or after the region
/// end. Rows are sorted by start, so every overlapping row lies in between.
///
fn sparse_row_bounds(
    columns: &mut ViewColumns,
    format: TrackFormat,
    region: &GenomeRegion,
) -> Result<(usize, usize)> {
    let starts = match columns.starts.as_mut() {
        Some(starts) => starts.i64_values()?.to_vec(),
        None => return Ok((0, 0)),
    };
    let upper = starts.partition_point(|&s| s < region.end);

    let lower = if format.is_point_like() {
        starts.partition_point(|&s| s + 1 <= region.start)
    } else {
        let ends = match columns.ends.as_mut() {
            Some(ends) => ends.i64_values()?,
            None => &[],
        };
        ends.iter()
            .position(|&e| e > region.start)
            .unwrap_or(ends.len())
    };

    Ok((lower.min(upper), upper))
}

fn narrow(columns: &mut ViewColumns, lower: usize, upper: usize) -> Result<()> {
    for column in [
        &mut columns.starts,
        &mut columns.ends,
        &mut columns.vals,
        &mut columns.ids,
        &mut columns.edges,
        &mut columns.weights,
    ]
    .into_iter()
    .flatten()
    {
        column.update_offset(Some(lower as i64), Some(upper as i64), None)?;
    }
    Ok(())
}
