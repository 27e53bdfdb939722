use thiserror::Error;

#[derive(Error, Debug)]
pub enum GtrackError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid track name: {0}")]
    InvalidTrackName(String),

    #[error("Invalid track format: {0}")]
    InvalidFormat(String),

    #[error("Malformed element sequence: {0}")]
    MalformedSequence(String),

    #[error("Invalid region {chr}:{start}-{end} (start must not exceed end)")]
    InvalidRegion { chr: String, start: i64, end: i64 },

    #[error("Invalid offset [{start}, {end}) for column of {len} rows")]
    InvalidOffset { start: i64, end: i64, len: usize },

    #[error("Region is not inside a single bounding region: {0}")]
    OutsideBoundingRegion(String),

    #[error("Coordinate {0} is too large to be encoded as a sweep event")]
    CoordinateOverflow(i64),

    #[error("Node '{node}' has dtype {found}, expected {expected}")]
    DtypeMismatch {
        node: String,
        expected: String,
        found: String,
    },

    #[error("Corrupted track store: {0}")]
    CorruptStore(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GtrackError>;
