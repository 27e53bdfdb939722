//! Core types for gtrack.
//!
//! A genomic *track* is a named, typed collection of intervals, points or
//! values defined over chromosome coordinates. This crate holds the value
//! types shared by the storage, track and tools crates: regions, hierarchical
//! track names, the closed set of track formats, bounding regions, the error
//! taxonomy and the configuration that decides where track stores live.
pub mod config;
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

// re-export for cleaner imports
pub use self::config::GtrackConfig;
pub use self::errors::{GtrackError, Result};
pub use self::models::{BoundingRegion, ColumnSet, CoverageRule, GenomeRegion, TrackFormat, TrackName};
