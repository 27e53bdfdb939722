mod catalog;
mod query;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;

use gtrack_core::GtrackConfig;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "gtrack";
    pub const BIN_NAME: &str = "gtrack";

    pub const DATA_DIR_ARG: &str = "data-dir";
    pub const CONFIG_ARG: &str = "config";
    pub const JSON_ARG: &str = "json";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Query genomic tracks stored as columnar arrays: coverage, overlap, counts and sums.")
        .subcommand_required(true)
        .arg(
            Arg::new(consts::DATA_DIR_ARG)
                .long(consts::DATA_DIR_ARG)
                .global(true)
                .help("Directory holding the track stores (overrides the config and GTRACK_DATA_DIR)"),
        )
        .arg(
            Arg::new(consts::CONFIG_ARG)
                .long(consts::CONFIG_ARG)
                .global(true)
                .help("TOML config file"),
        )
        .arg(
            Arg::new(consts::JSON_ARG)
                .long(consts::JSON_ARG)
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .subcommand(query::cli::create_count_cli())
        .subcommand(query::cli::create_coverage_cli())
        .subcommand(query::cli::create_sum_values_cli())
        .subcommand(query::cli::create_sum_weights_cli())
        .subcommand(query::cli::create_overlap_cli())
        .subcommand(catalog::cli::create_list_genomes_cli())
        .subcommand(catalog::cli::create_list_tracks_cli())
}

fn load_config(matches: &ArgMatches) -> Result<GtrackConfig> {
    let mut config = match matches.get_one::<String>(consts::CONFIG_ARG) {
        Some(path) => GtrackConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => GtrackConfig::from_env(),
    };

    if let Some(data_dir) = matches.get_one::<String>(consts::DATA_DIR_ARG) {
        config.data_dir = data_dir.into();
    }

    debug!("Using data dir {}", config.data_dir.display());
    Ok(config)
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();
    let config = load_config(&matches)?;
    let json = matches.get_flag(consts::JSON_ARG);

    match matches.subcommand() {
        //
        // QUERIES
        //
        Some((query::cli::COUNT_CMD, matches)) => {
            query::handlers::run_count(matches, &config, json)?;
        }
        Some((query::cli::COVERAGE_CMD, matches)) => {
            query::handlers::run_coverage(matches, &config, json)?;
        }
        Some((query::cli::SUM_VALUES_CMD, matches)) => {
            query::handlers::run_sum_values(matches, &config, json)?;
        }
        Some((query::cli::SUM_WEIGHTS_CMD, matches)) => {
            query::handlers::run_sum_weights(matches, &config, json)?;
        }
        Some((query::cli::OVERLAP_CMD, matches)) => {
            query::handlers::run_overlap(matches, &config, json)?;
        }

        //
        // CATALOGUE
        //
        Some((catalog::cli::LIST_GENOMES_CMD, _)) => {
            catalog::handlers::run_list_genomes(&config, json)?;
        }
        Some((catalog::cli::LIST_TRACKS_CMD, matches)) => {
            catalog::handlers::run_list_tracks(matches, &config, json)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
