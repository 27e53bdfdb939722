use std::cmp::Ordering;

use crate::models::GenomeRegion;

///
/// One disjoint partition of a track's stored data.
///
/// Besides the covered region it records the `[start_index, end_index)` row
/// span the partition occupies in the track store.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct BoundingRegion {
    pub region: GenomeRegion,
    pub allow_overlaps: bool,
    pub start_index: usize,
    pub end_index: usize,
}

impl BoundingRegion {
    pub fn num_rows(&self) -> usize {
        self.end_index - self.start_index
    }
}

impl Ord for BoundingRegion {
    /// Sequence id first, then region start
    fn cmp(&self, other: &Self) -> Ordering {
        self.region
            .chr
            .cmp(&other.region.chr)
            .then(self.region.start.cmp(&other.region.start))
            .then(self.region.end.cmp(&other.region.end))
            .then(self.start_index.cmp(&other.start_index))
    }
}

impl PartialOrd for BoundingRegion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
