use std::fmt::{self, Display};
use std::str::FromStr;

use crate::consts::TRACK_NAME_SEPARATORS;
use crate::errors::GtrackError;

///
/// Hierarchical track identifier, e.g. `Genes and gene subsets:Genes:Refseq`.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct TrackName(Vec<String>);

impl TrackName {
    pub fn new<S: AsRef<str>>(components: &[S]) -> Self {
        TrackName(components.iter().map(|c| c.as_ref().to_string()).collect())
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }
}

impl FromStr for TrackName {
    type Err = GtrackError;

    /// Split on any of `:`, `^` or `|`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components: Vec<String> = s
            .split(&TRACK_NAME_SEPARATORS[..])
            .map(|c| c.trim().to_string())
            .collect();

        if components.iter().any(|c| c.is_empty()) {
            return Err(GtrackError::InvalidTrackName(s.to_string()));
        }

        Ok(TrackName(components))
    }
}

impl From<Vec<String>> for TrackName {
    fn from(value: Vec<String>) -> Self {
        TrackName(value)
    }
}

impl Display for TrackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Genes and gene subsets:Genes:Refseq")]
    #[case("Genes and gene subsets^Genes^Refseq")]
    #[case("Genes and gene subsets|Genes|Refseq")]
    fn test_parse_separators(#[case] input: &str) {
        let track_name: TrackName = input.parse().unwrap();
        assert_eq!(
            track_name.components(),
            &["Genes and gene subsets", "Genes", "Refseq"]
        );
        assert_eq!(track_name.to_string(), "Genes and gene subsets:Genes:Refseq");
    }

    #[rstest]
    #[case("")]
    #[case("a::b")]
    #[case("a:")]
    fn test_parse_rejects_empty_components(#[case] input: &str) {
        assert!(input.parse::<TrackName>().is_err());
    }
}
