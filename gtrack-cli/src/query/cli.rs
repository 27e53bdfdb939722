use clap::{Arg, ArgAction, Command};

pub const COUNT_CMD: &str = "count";
pub const COVERAGE_CMD: &str = "coverage";
pub const SUM_VALUES_CMD: &str = "sum-values";
pub const SUM_WEIGHTS_CMD: &str = "sum-weights";
pub const OVERLAP_CMD: &str = "overlap";

pub const GENOME_ARG: &str = "genome";
pub const TRACK_ARG: &str = "track";
pub const OTHER_ARG: &str = "other";
pub const ALLOW_OVERLAPS_ARG: &str = "allow-overlaps";
pub const REGION_ARG: &str = "region";
pub const STREAMING_ARG: &str = "streaming";
pub const ALGORITHM_ARG: &str = "algorithm";

/// Arguments every query takes: which track, which variant, which regions.
fn with_track_args(command: Command) -> Command {
    command
        .arg_required_else_help(true)
        .arg(
            Arg::new(GENOME_ARG)
                .long(GENOME_ARG)
                .short('g')
                .required(true)
                .help("Genome the track is defined on"),
        )
        .arg(
            Arg::new(TRACK_ARG)
                .long(TRACK_ARG)
                .short('t')
                .required(true)
                .help("Track name, components separated by ':', '^' or '|'"),
        )
        .arg(
            Arg::new(ALLOW_OVERLAPS_ARG)
                .long(ALLOW_OVERLAPS_ARG)
                .action(ArgAction::SetTrue)
                .help("Query the variant of the track that keeps overlapping elements"),
        )
        .arg(
            Arg::new(REGION_ARG)
                .long(REGION_ARG)
                .short('r')
                .action(ArgAction::Append)
                .help("Region as chr:start-end; repeatable. Defaults to all bounding regions"),
        )
}

pub fn create_count_cli() -> Command {
    with_track_args(Command::new(COUNT_CMD).about("Count the elements of a track"))
}

pub fn create_coverage_cli() -> Command {
    with_track_args(
        Command::new(COVERAGE_CMD).about("Base pairs (or elements) of the genome a track covers"),
    )
}

pub fn create_sum_values_cli() -> Command {
    with_track_args(Command::new(SUM_VALUES_CMD).about("Sum the values of a valued track"))
}

pub fn create_sum_weights_cli() -> Command {
    with_track_args(
        Command::new(SUM_WEIGHTS_CMD).about("Sum the edge weights of a linked track"),
    )
    .arg(
        Arg::new(STREAMING_ARG)
            .long(STREAMING_ARG)
            .action(ArgAction::SetTrue)
            .help("Accumulate element by element instead of summing the weights column"),
    )
}

pub fn create_overlap_cli() -> Command {
    with_track_args(
        Command::new(OVERLAP_CMD).about("Base pairs covered by both of two tracks"),
    )
    .arg(
        Arg::new(OTHER_ARG)
            .long(OTHER_ARG)
            .short('o')
            .required(true)
            .help("Name of the second track"),
    )
    .arg(
        Arg::new(ALGORITHM_ARG)
            .long(ALGORITHM_ARG)
            .short('a')
            .value_parser(["sweep", "encoded"])
            .default_value("sweep")
            .help("Overlap algorithm; only sweep accepts tracks with overlapping elements"),
    )
}
