//! Path layout of track stores under the data directory.
//!
//! `<data_dir>/<genome>/<component>/.../<component>/{withOverlaps,noOverlaps}.gtc`
use std::path::PathBuf;

use crate::config::GtrackConfig;
use crate::consts::{NO_OVERLAPS_STEM, STORE_FILE_EXTENSION, WITH_OVERLAPS_STEM};
use crate::models::TrackName;

pub fn genome_dir(config: &GtrackConfig, genome: &str) -> PathBuf {
    config.data_dir.join(genome)
}

pub fn track_dir(config: &GtrackConfig, genome: &str, track_name: &TrackName) -> PathBuf {
    let mut path = genome_dir(config, genome);
    for component in track_name.components() {
        path.push(component);
    }
    path
}

pub fn store_file_name(allow_overlaps: bool) -> String {
    let stem = if allow_overlaps {
        WITH_OVERLAPS_STEM
    } else {
        NO_OVERLAPS_STEM
    };
    format!("{}.{}", stem, STORE_FILE_EXTENSION)
}

pub fn store_path(
    config: &GtrackConfig,
    genome: &str,
    track_name: &TrackName,
    allow_overlaps: bool,
) -> PathBuf {
    track_dir(config, genome, track_name).join(store_file_name(allow_overlaps))
}
