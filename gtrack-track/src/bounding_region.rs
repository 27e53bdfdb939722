use log::debug;

use gtrack_core::consts::{
    BR_END_INDEX_NODE, BR_END_NODE, BR_SEQID_NODE, BR_START_INDEX_NODE, BR_START_NODE,
};
use gtrack_core::utils::store_path;
use gtrack_core::{BoundingRegion, GenomeRegion, GtrackConfig, GtrackError, Result, TrackName};
use gtrack_store::{OpenStore, StoreReader};

///
/// Enumerates the bounding regions a stored track is partitioned into.
///
/// Regions are kept sorted by sequence id, then by start, so that any fold
/// over them visits them in the same order every time.
///
#[derive(Debug, Clone)]
pub struct BoundingRegionHandler {
    genome: String,
    allow_overlaps: bool,
    regions: Vec<BoundingRegion>,
}

impl BoundingRegionHandler {
    pub fn new(
        config: &GtrackConfig,
        genome: &str,
        track_name: &TrackName,
        allow_overlaps: bool,
    ) -> Result<Self> {
        let reader = StoreReader::new(store_path(config, genome, track_name, allow_overlaps));
        BoundingRegionHandler::from_reader(&reader, genome, allow_overlaps)
    }

    pub fn from_reader(reader: &StoreReader, genome: &str, allow_overlaps: bool) -> Result<Self> {
        let mut store = reader.open()?;

        let seqids = read_strings(&mut store, BR_SEQID_NODE)?;
        let starts = read_i64(&mut store, BR_START_NODE)?;
        let ends = read_i64(&mut store, BR_END_NODE)?;
        let start_indices = read_i64(&mut store, BR_START_INDEX_NODE)?;
        let end_indices = read_i64(&mut store, BR_END_INDEX_NODE)?;
        store.close();

        let n = seqids.len();
        if [starts.len(), ends.len(), start_indices.len(), end_indices.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(GtrackError::CorruptStore(
                "Bounding region columns differ in length".to_string(),
            ));
        }

        let mut regions = Vec::with_capacity(n);
        for i in 0..n {
            if start_indices[i] < 0 || end_indices[i] < start_indices[i] {
                return Err(GtrackError::CorruptStore(format!(
                    "Bounding region {} has row span [{}, {})",
                    i, start_indices[i], end_indices[i]
                )));
            }
            regions.push(BoundingRegion {
                region: GenomeRegion::new(genome, &seqids[i], starts[i], ends[i])?,
                allow_overlaps,
                start_index: start_indices[i] as usize,
                end_index: end_indices[i] as usize,
            });
        }
        regions.sort();

        debug!(
            "Loaded {} bounding regions from {}",
            regions.len(),
            reader.path().display()
        );

        Ok(BoundingRegionHandler {
            genome: genome.to_string(),
            allow_overlaps,
            regions,
        })
    }

    pub fn genome(&self) -> &str {
        &self.genome
    }

    pub fn allow_overlaps(&self) -> bool {
        self.allow_overlaps
    }

    pub fn get_all_bounding_regions(&self) -> &[BoundingRegion] {
        &self.regions
    }

    /// Bounding regions on the sequence of `region` that share at least one base with it
    pub fn overlapping(&self, region: &GenomeRegion) -> Vec<&BoundingRegion> {
        self.regions
            .iter()
            .filter(|br| br.region.overlaps(region))
            .collect()
    }

    /// The single bounding region `region` lies in, if any
    pub fn enclosing(&self, region: &GenomeRegion) -> Option<&BoundingRegion> {
        self.regions.iter().find(|br| br.region.contains(region))
    }
}

fn read_strings(store: &mut OpenStore, node: &str) -> Result<Vec<String>> {
    let array = store.get_node(node)?.read_all()?;
    match array.as_strings() {
        Some(values) => Ok(values.to_vec()),
        None => Err(GtrackError::DtypeMismatch {
            node: node.to_string(),
            expected: "utf8".to_string(),
            found: array.dtype().to_string(),
        }),
    }
}

fn read_i64(store: &mut OpenStore, node: &str) -> Result<Vec<i64>> {
    let array = store.get_node(node)?.read_all()?;
    match array.as_i64() {
        Some(values) => Ok(values.to_vec()),
        None => Err(GtrackError::DtypeMismatch {
            node: node.to_string(),
            expected: "int64".to_string(),
            found: array.dtype().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use gtrack_store::{Array, StoreWriter};

    fn write_table(path: &std::path::Path, rows: &[(&str, i64, i64, i64, i64)]) {
        let mut writer = StoreWriter::new();
        writer
            .add_array(
                BR_SEQID_NODE,
                Array::from_strings(rows.iter().map(|r| r.0.to_string()).collect()),
            )
            .add_array(BR_START_NODE, Array::from_i64(rows.iter().map(|r| r.1).collect()))
            .add_array(BR_END_NODE, Array::from_i64(rows.iter().map(|r| r.2).collect()))
            .add_array(
                BR_START_INDEX_NODE,
                Array::from_i64(rows.iter().map(|r| r.3).collect()),
            )
            .add_array(
                BR_END_INDEX_NODE,
                Array::from_i64(rows.iter().map(|r| r.4).collect()),
            );
        writer.write(path).unwrap();
    }

    #[rstest]
    fn test_regions_are_sorted_by_seqid_then_start() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        write_table(
            &path,
            &[
                ("chrM", 0, 200, 4, 5),
                ("chr21", 500, 1000, 2, 4),
                ("chr21", 0, 500, 0, 2),
            ],
        );

        let handler =
            BoundingRegionHandler::from_reader(&StoreReader::new(&path), "testgenome", false)
                .unwrap();
        let regions: Vec<(String, i64)> = handler
            .get_all_bounding_regions()
            .iter()
            .map(|br| (br.region.chr.clone(), br.region.start))
            .collect();

        assert_eq!(
            regions,
            vec![
                ("chr21".to_string(), 0),
                ("chr21".to_string(), 500),
                ("chrM".to_string(), 0)
            ]
        );
    }

    #[rstest]
    fn test_enclosing_and_overlapping() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        write_table(&path, &[("chr21", 0, 500, 0, 2), ("chr21", 500, 1000, 2, 4)]);

        let handler =
            BoundingRegionHandler::from_reader(&StoreReader::new(&path), "testgenome", false)
                .unwrap();

        let inside = GenomeRegion::new("testgenome", "chr21", 100, 200).unwrap();
        assert_eq!(handler.enclosing(&inside).unwrap().start_index, 0);

        let spanning = GenomeRegion::new("testgenome", "chr21", 400, 600).unwrap();
        assert!(handler.enclosing(&spanning).is_none());
        assert_eq!(handler.overlapping(&spanning).len(), 2);

        let elsewhere = GenomeRegion::new("testgenome", "chrM", 0, 10).unwrap();
        assert!(handler.overlapping(&elsewhere).is_empty());
    }

    #[rstest]
    fn test_missing_table_is_not_found() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        let mut writer = StoreWriter::new();
        writer.add_array("start", Array::from_i64(vec![]));
        writer.write(&path).unwrap();

        let result = BoundingRegionHandler::from_reader(&StoreReader::new(&path), "g", false);
        assert!(matches!(result, Err(GtrackError::NotFound(_))));
    }

    #[rstest]
    fn test_ragged_table_is_corrupt() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        write_table(&path, &[("chr21", 0, 500, 0, 2)]);

        // overwrite one column with a longer one
        let mut open = StoreReader::new(&path).open().unwrap();
        let seqids = open.get_node(BR_SEQID_NODE).unwrap().read_all().unwrap();
        open.close();
        let mut writer = StoreWriter::new();
        writer
            .add_array(BR_SEQID_NODE, seqids)
            .add_array(BR_START_NODE, Array::from_i64(vec![0, 1]))
            .add_array(BR_END_NODE, Array::from_i64(vec![500]))
            .add_array(BR_START_INDEX_NODE, Array::from_i64(vec![0]))
            .add_array(BR_END_INDEX_NODE, Array::from_i64(vec![2]));
        writer.write(&path).unwrap();

        let result = BoundingRegionHandler::from_reader(&StoreReader::new(&path), "g", false);
        assert!(matches!(result, Err(GtrackError::CorruptStore(_))));
    }
}
