//! Turning parsed elements into track stores.
//!
//! Text parsing happens elsewhere; a [`TrackBuilder`] receives elements that
//! are already split into fields, groups them into bounding regions, sorts them
//! and writes one store per overlap variant.
use std::collections::BTreeMap;
use std::path::PathBuf;

use fxhash::FxHashMap;
use log::{info, warn};

use gtrack_core::consts::{
    BR_END_INDEX_NODE, BR_END_NODE, BR_SEQID_NODE, BR_START_INDEX_NODE, BR_START_NODE, EDGES_NODE,
    END_NODE, FORMAT_NODE, ID_NODE, START_NODE, VAL_NODE, WEIGHTS_NODE,
};
use gtrack_core::utils::store_path;
use gtrack_core::{GtrackConfig, GtrackError, Result, TrackFormat, TrackName};
use gtrack_store::{Array, ArrayValues, StoreWriter};

///
/// One parsed track element. Which fields matter depends on the format:
/// points ignore `end`, partitions ignore `start`, functions only use `val`.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenomeElement {
    pub seqid: String,
    pub start: i64,
    pub end: i64,
    pub val: Option<f64>,
    pub id: Option<String>,
    pub edges: Vec<(String, f64)>,
}

impl GenomeElement {
    pub fn segment(seqid: &str, start: i64, end: i64) -> Self {
        GenomeElement {
            seqid: seqid.to_string(),
            start,
            end,
            ..Default::default()
        }
    }

    pub fn point(seqid: &str, start: i64) -> Self {
        GenomeElement::segment(seqid, start, start + 1)
    }

    /// A partition cell, known only by where it ends
    pub fn boundary(seqid: &str, end: i64) -> Self {
        GenomeElement::segment(seqid, end, end)
    }

    /// A function sample; its position is its row within the bounding region
    pub fn value(val: f64) -> Self {
        GenomeElement {
            val: Some(val),
            ..Default::default()
        }
    }

    pub fn with_val(mut self, val: f64) -> Self {
        self.val = Some(val);
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_edge(mut self, id: &str, weight: f64) -> Self {
        self.edges.push((id.to_string(), weight));
        self
    }
}

#[derive(Debug, Clone)]
struct Block {
    seqid: String,
    start: i64,
    end: i64,
    elements: Vec<GenomeElement>,
}

///
/// Collects the elements of one track and writes its stores.
///
/// Elements are either added one by one, in which case every sequence gets
/// one bounding region, or in explicit bounding-region blocks. Dense formats
/// need explicit blocks.
///
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    format: TrackFormat,
    elements: Vec<GenomeElement>,
    blocks: Vec<Block>,
    sequence_lengths: FxHashMap<String, i64>,
}

impl TrackBuilder {
    pub fn new(format: TrackFormat) -> Self {
        TrackBuilder {
            format,
            elements: Vec::new(),
            blocks: Vec::new(),
            sequence_lengths: FxHashMap::default(),
        }
    }

    pub fn format(&self) -> TrackFormat {
        self.format
    }

    pub fn add_element(&mut self, element: GenomeElement) -> &mut Self {
        self.elements.push(element);
        self
    }

    ///
    /// Add a bounding region `[start, end)` on `seqid` together with its elements.
    ///
    pub fn add_bounding_region(
        &mut self,
        seqid: &str,
        start: i64,
        end: i64,
        elements: Vec<GenomeElement>,
    ) -> Result<&mut Self> {
        if start < 0 || end < start {
            return Err(GtrackError::InvalidRegion {
                chr: seqid.to_string(),
                start,
                end,
            });
        }
        self.blocks.push(Block {
            seqid: seqid.to_string(),
            start,
            end,
            elements,
        });
        Ok(self)
    }

    ///
    /// Known sequence lengths. Implicit bounding regions then span the whole
    /// sequence instead of ending at the last element.
    ///
    pub fn with_sequence_lengths<I, S>(&mut self, lengths: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        self.sequence_lengths
            .extend(lengths.into_iter().map(|(seqid, len)| (seqid.into(), len)));
        self
    }

    ///
    /// Write both overlap variants of the track.
    ///
    /// The `noOverlaps` variant is skipped with a warning when the elements
    /// overlap and the format can't merge them.
    ///
    /// # Returns
    /// - paths of the stores written
    pub fn write(
        &self,
        config: &GtrackConfig,
        genome: &str,
        track_name: &TrackName,
    ) -> Result<Vec<PathBuf>> {
        let mut written = vec![self.write_variant(config, genome, track_name, true)?];

        match self.write_variant(config, genome, track_name, false) {
            Ok(path) => written.push(path),
            Err(GtrackError::MalformedSequence(reason)) => {
                warn!(
                    "Skipping noOverlaps store of track '{}': {}",
                    track_name, reason
                );
            }
            Err(e) => return Err(e),
        }

        Ok(written)
    }

    /// Write one overlap variant of the track, failing if it can't be built.
    pub fn write_variant(
        &self,
        config: &GtrackConfig,
        genome: &str,
        track_name: &TrackName,
        allow_overlaps: bool,
    ) -> Result<PathBuf> {
        let path = store_path(config, genome, track_name, allow_overlaps);
        let writer = self.build_store(allow_overlaps)?;
        writer.write(&path)?;

        info!(
            "Wrote {} track '{}' of genome '{}' to {}",
            self.format,
            track_name,
            genome,
            path.display()
        );
        Ok(path)
    }

    ///
    /// Lay the elements out as store columns without touching the disk.
    ///
    pub fn build_store(&self, allow_overlaps: bool) -> Result<StoreWriter> {
        let blocks = self.resolve_blocks()?;

        let mut rows: Vec<GenomeElement> = Vec::new();
        let mut br_seqids = Vec::with_capacity(blocks.len());
        let mut br_starts = Vec::with_capacity(blocks.len());
        let mut br_ends = Vec::with_capacity(blocks.len());
        let mut br_start_indices = Vec::with_capacity(blocks.len());
        let mut br_end_indices = Vec::with_capacity(blocks.len());

        for block in blocks {
            let block_rows = if self.format.is_dense() {
                self.dense_rows(&block)?
            } else {
                self.sparse_rows(&block, allow_overlaps)?
            };

            br_seqids.push(block.seqid.clone());
            br_starts.push(block.start);
            br_ends.push(block.end);
            br_start_indices.push(rows.len() as i64);
            rows.extend(block_rows);
            br_end_indices.push(rows.len() as i64);
        }

        let columns = self.format.columns();
        let mut writer = StoreWriter::new();
        if columns.starts {
            writer.add_array(START_NODE, Array::from_i64(rows.iter().map(|r| r.start).collect()));
        }
        if columns.ends {
            writer.add_array(END_NODE, Array::from_i64(rows.iter().map(|r| r.end).collect()));
        }
        if columns.vals {
            writer.add_array(
                VAL_NODE,
                Array::from_f64(rows.iter().map(|r| r.val.unwrap_or(f64::NAN)).collect()),
            );
        }
        if columns.linked {
            let (ids, edges, weights) = linked_columns(&rows)?;
            writer
                .add_array(ID_NODE, ids)
                .add_array(EDGES_NODE, edges)
                .add_array(WEIGHTS_NODE, weights);
        }

        writer
            .add_array(BR_SEQID_NODE, Array::from_strings(br_seqids))
            .add_array(BR_START_NODE, Array::from_i64(br_starts))
            .add_array(BR_END_NODE, Array::from_i64(br_ends))
            .add_array(BR_START_INDEX_NODE, Array::from_i64(br_start_indices))
            .add_array(BR_END_INDEX_NODE, Array::from_i64(br_end_indices))
            .add_array(
                FORMAT_NODE,
                Array::from_strings(vec![self.format.name().to_string()]),
            );

        Ok(writer)
    }

    fn resolve_blocks(&self) -> Result<Vec<Block>> {
        if !self.blocks.is_empty() && !self.elements.is_empty() {
            return Err(GtrackError::InvalidFormat(
                "elements must either all be in explicit bounding regions or none".to_string(),
            ));
        }

        let mut blocks = if self.blocks.is_empty() {
            if self.format.is_dense() && !self.elements.is_empty() {
                return Err(GtrackError::InvalidFormat(format!(
                    "'{}' tracks need explicit bounding regions",
                    self.format
                )));
            }
            self.implicit_blocks()?
        } else {
            self.blocks.clone()
        };

        blocks.sort_by(|a, b| (&a.seqid, a.start).cmp(&(&b.seqid, b.start)));
        for pair in blocks.windows(2) {
            if pair[0].seqid == pair[1].seqid && pair[1].start < pair[0].end {
                return Err(GtrackError::MalformedSequence(format!(
                    "bounding regions {}:{}-{} and {}:{}-{} overlap",
                    pair[0].seqid, pair[0].start, pair[0].end, pair[1].seqid, pair[1].start, pair[1].end
                )));
            }
        }
        Ok(blocks)
    }

    fn implicit_blocks(&self) -> Result<Vec<Block>> {
        let mut by_seqid: BTreeMap<&str, Vec<GenomeElement>> = BTreeMap::new();
        for element in &self.elements {
            by_seqid
                .entry(element.seqid.as_str())
                .or_default()
                .push(element.clone());
        }

        let mut blocks = Vec::with_capacity(by_seqid.len());
        for (seqid, elements) in by_seqid {
            let max_end = elements
                .iter()
                .map(|e| self.element_end(e))
                .max()
                .unwrap_or(0);
            let end = match self.sequence_lengths.get(seqid) {
                Some(&len) if len < max_end => {
                    return Err(GtrackError::MalformedSequence(format!(
                        "element ends at {} beyond the end of sequence {} ({})",
                        max_end, seqid, len
                    )));
                }
                Some(&len) => len,
                None => max_end,
            };
            blocks.push(Block {
                seqid: seqid.to_string(),
                start: 0,
                end,
                elements,
            });
        }
        Ok(blocks)
    }

    fn element_end(&self, element: &GenomeElement) -> i64 {
        if self.format.is_point_like() {
            element.start + 1
        } else {
            element.end
        }
    }

    fn sparse_rows(&self, block: &Block, allow_overlaps: bool) -> Result<Vec<GenomeElement>> {
        let mut rows = block.elements.clone();
        for row in rows.iter_mut() {
            if self.format.is_point_like() {
                row.end = row.start + 1;
            }
            if row.start < block.start || row.end > block.end || row.end < row.start {
                return Err(GtrackError::MalformedSequence(format!(
                    "element {}:{}-{} is not inside bounding region {}:{}-{}",
                    row.seqid, row.start, row.end, block.seqid, block.start, block.end
                )));
            }
        }
        rows.sort_by_key(|r| (r.start, r.end));

        if allow_overlaps {
            Ok(rows)
        } else {
            self.remove_overlaps(rows)
        }
    }

    ///
    /// Merge overlapping (and touching) segments and duplicate points. Valued
    /// and linked elements can't be merged, so overlaps among them are an error.
    ///
    fn remove_overlaps(&self, rows: Vec<GenomeElement>) -> Result<Vec<GenomeElement>> {
        let points = self.format.is_point_like();
        let mergeable = !self.format.is_valued() && !self.format.is_linked();

        let mut merged: Vec<GenomeElement> = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(last) = merged.last_mut() else {
                merged.push(row);
                continue;
            };

            let overlapping = if points {
                row.start == last.start
            } else {
                row.start < last.end
            };
            let touching = !points && row.start == last.end;

            if mergeable && (overlapping || touching) {
                last.end = last.end.max(row.end);
            } else if overlapping {
                return Err(GtrackError::MalformedSequence(format!(
                    "overlapping {} elements at {}:{}",
                    self.format, row.seqid, row.start
                )));
            } else {
                merged.push(row);
            }
        }
        Ok(merged)
    }

    fn dense_rows(&self, block: &Block) -> Result<Vec<GenomeElement>> {
        let rows = block.elements.clone();

        if self.format.is_partition() {
            let mut previous = block.start;
            for row in &rows {
                if row.end <= previous {
                    return Err(GtrackError::MalformedSequence(format!(
                        "partition boundaries in {}:{}-{} must increase, got {} after {}",
                        block.seqid, block.start, block.end, row.end, previous
                    )));
                }
                previous = row.end;
            }
            if previous != block.end {
                return Err(GtrackError::MalformedSequence(format!(
                    "last partition boundary {} doesn't close bounding region {}:{}-{}",
                    previous, block.seqid, block.start, block.end
                )));
            }
        } else if rows.len() as i64 != block.end - block.start {
            return Err(GtrackError::MalformedSequence(format!(
                "bounding region {}:{}-{} needs {} values, got {}",
                block.seqid,
                block.start,
                block.end,
                block.end - block.start,
                rows.len()
            )));
        }

        Ok(rows)
    }
}

fn linked_columns(rows: &[GenomeElement]) -> Result<(Array, Array, Array)> {
    let width = rows.iter().map(|r| r.edges.len()).max().unwrap_or(0).max(1);

    let mut ids = Vec::with_capacity(rows.len());
    let mut edges = Vec::with_capacity(rows.len() * width);
    let mut weights = Vec::with_capacity(rows.len() * width);
    for row in rows {
        ids.push(row.id.clone().unwrap_or_default());
        for i in 0..width {
            match row.edges.get(i) {
                Some((id, weight)) => {
                    edges.push(id.clone());
                    weights.push(*weight);
                }
                None => {
                    edges.push(String::new());
                    weights.push(f64::NAN);
                }
            }
        }
    }

    Ok((
        Array::from_strings(ids),
        Array::new(ArrayValues::Utf8(edges), width)?,
        Array::new(ArrayValues::Float64(weights), width)?,
    ))
}
