use std::fmt::{self, Display};

use crate::errors::{GtrackError, Result};

///
/// A half-open `[start, end)` range on one sequence of a genome.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GenomeRegion {
    pub genome: String,
    pub chr: String,
    pub start: i64,
    pub end: i64,
}

impl GenomeRegion {
    ///
    /// Create a region, rejecting `start > end` and negative starts.
    ///
    pub fn new(genome: &str, chr: &str, start: i64, end: i64) -> Result<Self> {
        if start > end || start < 0 {
            return Err(GtrackError::InvalidRegion {
                chr: chr.to_string(),
                start,
                end,
            });
        }
        Ok(GenomeRegion {
            genome: genome.to_string(),
            chr: chr.to_string(),
            start,
            end,
        })
    }

    ///
    /// Parse `chr:start-end` (commas in the numbers are ignored).
    ///
    pub fn parse(genome: &str, value: &str) -> Result<Self> {
        let invalid = || GtrackError::Config(format!("Can't parse region '{}'", value));

        let (chr, range) = value.rsplit_once(':').ok_or_else(invalid)?;
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        let start: i64 = start.replace(',', "").parse().map_err(|_| invalid())?;
        let end: i64 = end.replace(',', "").parse().map_err(|_| invalid())?;

        GenomeRegion::new(genome, chr, start, end)
    }

    pub fn width(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check whether two regions share at least one base on the same sequence
    pub fn overlaps(&self, other: &GenomeRegion) -> bool {
        self.chr == other.chr && self.start < other.end && other.start < self.end
    }

    /// Check whether `other` lies completely inside this region
    pub fn contains(&self, other: &GenomeRegion) -> bool {
        self.chr == other.chr && self.start <= other.start && other.end <= self.end
    }
}

impl Display for GenomeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}-{}", self.genome, self.chr, self.start, self.end)
    }
}
