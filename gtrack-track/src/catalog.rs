//! Listing the genomes and tracks that exist under a data directory.
use std::fs;

use log::debug;
use walkdir::WalkDir;

use gtrack_core::utils::{genome_dir, store_file_name, track_dir};
use gtrack_core::{GtrackConfig, GtrackError, Result, TrackName};

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

///
/// All genomes with a directory under the data directory, sorted by name.
/// A missing data directory holds no genomes.
///
pub fn list_genomes(config: &GtrackConfig) -> Result<Vec<String>> {
    if !config.data_dir.is_dir() {
        debug!("Data dir {} doesn't exist", config.data_dir.display());
        return Ok(Vec::new());
    }

    let mut genomes = Vec::new();
    for entry in fs::read_dir(&config.data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_hidden(&name) {
            genomes.push(name);
        }
    }
    genomes.sort();
    Ok(genomes)
}

///
/// Every track of `genome` that has at least one store file, sorted.
///
pub fn list_tracks(config: &GtrackConfig, genome: &str) -> Result<Vec<TrackName>> {
    let root = genome_dir(config, genome);
    if !root.is_dir() {
        return Err(GtrackError::NotFound(format!(
            "Genome '{}' not found in {}",
            genome,
            config.data_dir.display()
        )));
    }

    let mut tracks = Vec::new();
    let walker = WalkDir::new(&root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry.map_err(|e| GtrackError::Io(e.into()))?;
        if !entry.file_type().is_dir() || !has_store(entry.path()) {
            continue;
        }

        let components: Vec<String> = entry
            .path()
            .strip_prefix(&root)
            .map_err(|e| GtrackError::NotFound(e.to_string()))?
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        tracks.push(TrackName::from(components));
    }

    debug!("Found {} tracks for genome '{}'", tracks.len(), genome);
    Ok(tracks)
}

pub fn is_valid_track(config: &GtrackConfig, genome: &str, track_name: &TrackName) -> bool {
    has_store(&track_dir(config, genome, track_name))
}

fn has_store(dir: &std::path::Path) -> bool {
    [true, false]
        .into_iter()
        .any(|allow_overlaps| dir.join(store_file_name(allow_overlaps)).is_file())
}
