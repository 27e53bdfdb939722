/// Environment variable overriding the directory that holds track stores.
pub const GTRACK_DATA_DIR_ENV: &str = "GTRACK_DATA_DIR";

/// Folder created under the home directory when no data dir is configured.
pub const DEFAULT_DATA_SUBFOLDER: &str = ".gtrack/data";

pub const STORE_FILE_EXTENSION: &str = "gtc";
pub const WITH_OVERLAPS_STEM: &str = "withOverlaps";
pub const NO_OVERLAPS_STEM: &str = "noOverlaps";

/// Characters accepted as separators between track name components.
pub const TRACK_NAME_SEPARATORS: [char; 3] = [':', '^', '|'];

// column nodes
pub const START_NODE: &str = "start";
pub const END_NODE: &str = "end";
pub const VAL_NODE: &str = "val";
pub const ID_NODE: &str = "id";
pub const EDGES_NODE: &str = "edges";
pub const WEIGHTS_NODE: &str = "weights";

// bounding region table
pub const BR_SEQID_NODE: &str = "br/seqid";
pub const BR_START_NODE: &str = "br/start";
pub const BR_END_NODE: &str = "br/end";
pub const BR_START_INDEX_NODE: &str = "br/start_index";
pub const BR_END_INDEX_NODE: &str = "br/end_index";

// metadata
pub const FORMAT_NODE: &str = "meta/format";
