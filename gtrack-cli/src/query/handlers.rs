use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::Serialize;

use gtrack_core::{GenomeRegion, GtrackConfig, TrackName};
use gtrack_tools::aggregation::{
    count_elements_in_all_bounding_regions, count_elements_in_regions, coverage_in_regions,
    fold_bounding_regions, overlap_in_regions, sum_of_values_in_regions,
    sum_of_weights_in_regions,
};
use gtrack_tools::operations::{coverage, sum_of_values, sum_of_weights_with};
use gtrack_tools::{OverlapAlgorithm, WeightSum};
use gtrack_track::Track;

use super::cli::{
    ALGORITHM_ARG, ALLOW_OVERLAPS_ARG, GENOME_ARG, OTHER_ARG, REGION_ARG, STREAMING_ARG,
    TRACK_ARG,
};

/// The track and regions a query runs on.
#[derive(Debug, Clone, PartialEq)]
struct TrackQuery {
    genome: String,
    track_name: TrackName,
    allow_overlaps: bool,
    regions: Option<Vec<GenomeRegion>>,
}

impl TrackQuery {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let genome = matches
            .get_one::<String>(GENOME_ARG)
            .context("A genome is required.")?
            .to_string();
        let track_name: TrackName = matches
            .get_one::<String>(TRACK_ARG)
            .context("A track name is required.")?
            .parse()?;

        let regions = match matches.get_many::<String>(REGION_ARG) {
            Some(values) => Some(
                values
                    .map(|value| {
                        GenomeRegion::parse(&genome, value)
                            .with_context(|| format!("Invalid region '{}'", value))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };

        Ok(TrackQuery {
            genome,
            track_name,
            allow_overlaps: matches.get_flag(ALLOW_OVERLAPS_ARG),
            regions,
        })
    }

    fn open(&self, track_name: &TrackName, config: &GtrackConfig) -> Result<Track> {
        Track::open(config, &self.genome, track_name, self.allow_overlaps).with_context(|| {
            format!(
                "Failed to open track '{}' of genome '{}'",
                track_name, self.genome
            )
        })
    }
}

#[derive(Debug, Serialize)]
struct QueryResult<'a, T: Serialize> {
    metric: &'a str,
    genome: &'a str,
    track: String,
    allow_overlaps: bool,
    regions: Option<Vec<String>>,
    value: T,
}

fn report<T: Serialize + std::fmt::Display>(
    metric: &str,
    query: &TrackQuery,
    value: T,
    json: bool,
) -> Result<()> {
    if json {
        let result = QueryResult {
            metric,
            genome: &query.genome,
            track: query.track_name.to_string(),
            allow_overlaps: query.allow_overlaps,
            regions: query
                .regions
                .as_ref()
                .map(|regions| regions.iter().map(|r| r.to_string()).collect()),
            value,
        };
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

pub fn run_count(matches: &ArgMatches, config: &GtrackConfig, json: bool) -> Result<()> {
    let query = TrackQuery::from_matches(matches)?;

    let count = match &query.regions {
        Some(regions) => count_elements_in_regions(&query.open(&query.track_name, config)?, regions)?,
        None => count_elements_in_all_bounding_regions(
            config,
            &query.genome,
            &query.track_name,
            query.allow_overlaps,
        )?,
    };
    report("count", &query, count, json)
}

pub fn run_coverage(matches: &ArgMatches, config: &GtrackConfig, json: bool) -> Result<()> {
    let query = TrackQuery::from_matches(matches)?;
    let track = query.open(&query.track_name, config)?;

    let total = match &query.regions {
        Some(regions) => coverage_in_regions(&track, regions)?,
        None => fold_bounding_regions(&track, coverage)?,
    };
    report("coverage", &query, total, json)
}

pub fn run_sum_values(matches: &ArgMatches, config: &GtrackConfig, json: bool) -> Result<()> {
    let query = TrackQuery::from_matches(matches)?;
    let track = query.open(&query.track_name, config)?;

    let total = match &query.regions {
        Some(regions) => sum_of_values_in_regions(&track, regions)?,
        None => fold_bounding_regions(&track, sum_of_values)?,
    };
    report("sum-values", &query, total, json)
}

pub fn run_sum_weights(matches: &ArgMatches, config: &GtrackConfig, json: bool) -> Result<()> {
    let query = TrackQuery::from_matches(matches)?;
    let track = query.open(&query.track_name, config)?;
    let method = WeightSum::from(matches.get_flag(STREAMING_ARG));

    let total = match &query.regions {
        Some(regions) => sum_of_weights_in_regions(&track, regions, method)?,
        None => fold_bounding_regions(&track, |view| sum_of_weights_with(view, method))?,
    };
    report("sum-weights", &query, total, json)
}

pub fn run_overlap(matches: &ArgMatches, config: &GtrackConfig, json: bool) -> Result<()> {
    let query = TrackQuery::from_matches(matches)?;
    let other: TrackName = matches
        .get_one::<String>(OTHER_ARG)
        .context("A second track is required.")?
        .parse()?;
    let algorithm: OverlapAlgorithm = matches
        .get_one::<String>(ALGORITHM_ARG)
        .map(|name| name.parse::<OverlapAlgorithm>())
        .transpose()?
        .unwrap_or_default();

    let track1 = query.open(&query.track_name, config)?;
    let track2 = query.open(&other, config)?;

    // without explicit regions, walk the bounding regions of the first track
    let regions = match &query.regions {
        Some(regions) => regions.clone(),
        None => track1
            .bounding_regions()
            .get_all_bounding_regions()
            .iter()
            .map(|br| br.region.clone())
            .collect(),
    };

    let total = overlap_in_regions(&track1, &track2, &regions, algorithm)?;
    report("overlap", &query, total, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::query::cli::create_count_cli;

    #[rstest]
    fn test_query_from_matches() {
        let matches = create_count_cli().get_matches_from([
            "count",
            "--genome",
            "hg19",
            "--track",
            "Genes|Refseq",
            "--allow-overlaps",
            "-r",
            "chr1:1,000-2,000",
            "-r",
            "chr2:0-10",
        ]);
        let query = TrackQuery::from_matches(&matches).unwrap();

        assert_eq!(query.track_name.to_string(), "Genes:Refseq");
        assert!(query.allow_overlaps);
        assert_eq!(
            query.regions.unwrap(),
            vec![
                GenomeRegion::new("hg19", "chr1", 1000, 2000).unwrap(),
                GenomeRegion::new("hg19", "chr2", 0, 10).unwrap(),
            ]
        );
    }

    #[rstest]
    fn test_bad_region_is_rejected() {
        let matches = create_count_cli().get_matches_from([
            "count", "-g", "hg19", "-t", "Genes", "-r", "chr1:20-10",
        ]);
        assert!(TrackQuery::from_matches(&matches).is_err());
    }
}
