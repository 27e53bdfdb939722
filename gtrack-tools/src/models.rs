use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use gtrack_core::GtrackError;

/// Algorithm used to compute the overlap of two track views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapAlgorithm {
    /// Two-cursor walk over the elements of both views.
    #[default]
    Sweep,
    /// One sort over the encoded boundaries of both views.
    Encoded,
}

/// How the edge weights of a linked view are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightSum {
    /// Sum the whole weights column at once.
    #[default]
    Bulk,
    /// Accumulate while iterating over the elements.
    Streaming,
}

impl FromStr for OverlapAlgorithm {
    type Err = GtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sweep" => Ok(OverlapAlgorithm::Sweep),
            "encoded" => Ok(OverlapAlgorithm::Encoded),
            other => Err(GtrackError::InvalidFormat(format!(
                "unknown overlap algorithm '{}'",
                other
            ))),
        }
    }
}

impl Display for OverlapAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapAlgorithm::Sweep => write!(f, "sweep"),
            OverlapAlgorithm::Encoded => write!(f, "encoded"),
        }
    }
}

impl From<bool> for WeightSum {
    fn from(streaming: bool) -> Self {
        if streaming {
            WeightSum::Streaming
        } else {
            WeightSum::Bulk
        }
    }
}
