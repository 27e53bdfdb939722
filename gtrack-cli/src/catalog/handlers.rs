use anyhow::{Context, Result};
use clap::ArgMatches;

use gtrack_core::GtrackConfig;
use gtrack_track::catalog::{list_genomes, list_tracks};

use super::cli::GENOME_ARG;

fn print_names(names: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}

pub fn run_list_genomes(config: &GtrackConfig, json: bool) -> Result<()> {
    let genomes = list_genomes(config)?;
    print_names(&genomes, json)
}

pub fn run_list_tracks(matches: &ArgMatches, config: &GtrackConfig, json: bool) -> Result<()> {
    let genome = matches
        .get_one::<String>(GENOME_ARG)
        .context("A genome is required.")?;

    let tracks: Vec<String> = list_tracks(config, genome)?
        .iter()
        .map(|name| name.to_string())
        .collect();
    print_names(&tracks, json)
}
