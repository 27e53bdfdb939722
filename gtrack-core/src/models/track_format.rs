use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::GtrackError;

///
/// Which fields a track stores. Linked tracks always store ids together with
/// edges and edge weights.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Default)]
pub struct ColumnSet {
    pub starts: bool,
    pub ends: bool,
    pub vals: bool,
    pub linked: bool,
}

/// How [`TrackFormat`] tracks measure the amount of genome they cover.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CoverageRule {
    /// `sum(ends) - sum(starts)`, overlapping elements are counted twice.
    SummedLength,
    /// Every point or function sample covers exactly one base.
    ElementCount,
    /// Every row is a partition cell of the view.
    RowCount,
}

///
/// The structural variant of a track's elements.
///
/// Sparse formats (points and segments) store their starts; dense formats
/// (functions, partitions and base pairs) cover their bounding region
/// completely and derive their starts from the row index or from the previous
/// row's end.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum TrackFormat {
    Points,
    ValuedPoints,
    LinkedPoints,
    LinkedValuedPoints,
    Segments,
    ValuedSegments,
    LinkedSegments,
    LinkedValuedSegments,
    Function,
    LinkedFunction,
    GenomePartition,
    StepFunction,
    LinkedGenomePartition,
    LinkedStepFunction,
    LinkedBasePairs,
}

impl TrackFormat {
    pub const ALL: [TrackFormat; 15] = [
        TrackFormat::Points,
        TrackFormat::ValuedPoints,
        TrackFormat::LinkedPoints,
        TrackFormat::LinkedValuedPoints,
        TrackFormat::Segments,
        TrackFormat::ValuedSegments,
        TrackFormat::LinkedSegments,
        TrackFormat::LinkedValuedSegments,
        TrackFormat::Function,
        TrackFormat::LinkedFunction,
        TrackFormat::GenomePartition,
        TrackFormat::StepFunction,
        TrackFormat::LinkedGenomePartition,
        TrackFormat::LinkedStepFunction,
        TrackFormat::LinkedBasePairs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TrackFormat::Points => "Points",
            TrackFormat::ValuedPoints => "Valued points",
            TrackFormat::LinkedPoints => "Linked points",
            TrackFormat::LinkedValuedPoints => "Linked valued points",
            TrackFormat::Segments => "Segments",
            TrackFormat::ValuedSegments => "Valued segments",
            TrackFormat::LinkedSegments => "Linked segments",
            TrackFormat::LinkedValuedSegments => "Linked valued segments",
            TrackFormat::Function => "Function",
            TrackFormat::LinkedFunction => "Linked function",
            TrackFormat::GenomePartition => "Genome partition",
            TrackFormat::StepFunction => "Step function",
            TrackFormat::LinkedGenomePartition => "Linked genome partition",
            TrackFormat::LinkedStepFunction => "Linked step function",
            TrackFormat::LinkedBasePairs => "Linked base pairs",
        }
    }

    pub fn columns(&self) -> ColumnSet {
        let (starts, ends, vals, linked) = match self {
            TrackFormat::Points => (true, false, false, false),
            TrackFormat::ValuedPoints => (true, false, true, false),
            TrackFormat::LinkedPoints => (true, false, false, true),
            TrackFormat::LinkedValuedPoints => (true, false, true, true),
            TrackFormat::Segments => (true, true, false, false),
            TrackFormat::ValuedSegments => (true, true, true, false),
            TrackFormat::LinkedSegments => (true, true, false, true),
            TrackFormat::LinkedValuedSegments => (true, true, true, true),
            TrackFormat::Function => (false, false, true, false),
            TrackFormat::LinkedFunction => (false, false, true, true),
            TrackFormat::GenomePartition => (false, true, false, false),
            TrackFormat::StepFunction => (false, true, true, false),
            TrackFormat::LinkedGenomePartition => (false, true, false, true),
            TrackFormat::LinkedStepFunction => (false, true, true, true),
            TrackFormat::LinkedBasePairs => (false, false, false, true),
        };
        ColumnSet {
            starts,
            ends,
            vals,
            linked,
        }
    }

    ///
    /// Derive the format from the set of stored columns.
    ///
    pub fn from_columns(columns: ColumnSet) -> Result<Self, GtrackError> {
        TrackFormat::ALL
            .into_iter()
            .find(|format| format.columns() == columns)
            .ok_or_else(|| GtrackError::InvalidFormat(format!("{:?}", columns)))
    }

    pub fn coverage_rule(&self) -> CoverageRule {
        match self {
            TrackFormat::Segments
            | TrackFormat::ValuedSegments
            | TrackFormat::LinkedSegments
            | TrackFormat::LinkedValuedSegments => CoverageRule::SummedLength,
            TrackFormat::Points
            | TrackFormat::ValuedPoints
            | TrackFormat::LinkedPoints
            | TrackFormat::LinkedValuedPoints
            | TrackFormat::Function
            | TrackFormat::LinkedFunction => CoverageRule::ElementCount,
            TrackFormat::GenomePartition
            | TrackFormat::StepFunction
            | TrackFormat::LinkedGenomePartition
            | TrackFormat::LinkedStepFunction
            | TrackFormat::LinkedBasePairs => CoverageRule::RowCount,
        }
    }

    /// Dense tracks have no stored starts and fill their bounding regions.
    pub fn is_dense(&self) -> bool {
        !self.columns().starts
    }

    /// Points have a stored start but no stored end.
    pub fn is_point_like(&self) -> bool {
        let columns = self.columns();
        columns.starts && !columns.ends
    }

    /// Partitions store only their ends.
    pub fn is_partition(&self) -> bool {
        let columns = self.columns();
        !columns.starts && columns.ends
    }

    pub fn is_interval(&self) -> bool {
        let columns = self.columns();
        columns.starts && columns.ends
    }

    pub fn is_valued(&self) -> bool {
        self.columns().vals
    }

    pub fn is_linked(&self) -> bool {
        self.columns().linked
    }
}

impl FromStr for TrackFormat {
    type Err = GtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TrackFormat::ALL
            .into_iter()
            .find(|format| format.name().to_lowercase() == wanted)
            .ok_or_else(|| GtrackError::InvalidFormat(s.to_string()))
    }
}

impl Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
