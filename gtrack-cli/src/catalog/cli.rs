use clap::{Arg, Command};

pub const LIST_GENOMES_CMD: &str = "list-genomes";
pub const LIST_TRACKS_CMD: &str = "list-tracks";

pub const GENOME_ARG: &str = "genome";

pub fn create_list_genomes_cli() -> Command {
    Command::new(LIST_GENOMES_CMD).about("List the genomes in the data directory")
}

pub fn create_list_tracks_cli() -> Command {
    Command::new(LIST_TRACKS_CMD)
        .about("List the tracks of a genome")
        .arg_required_else_help(true)
        .arg(
            Arg::new(GENOME_ARG)
                .long(GENOME_ARG)
                .short('g')
                .required(true)
                .help("Genome to list"),
        )
}
