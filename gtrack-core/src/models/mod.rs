pub mod bounding_region;
pub mod genome_region;
pub mod track_format;
pub mod track_name;

// re-export for cleaner imports
pub use self::bounding_region::BoundingRegion;
pub use self::genome_region::GenomeRegion;
pub use self::track_format::{ColumnSet, CoverageRule, TrackFormat};
pub use self::track_name::TrackName;
