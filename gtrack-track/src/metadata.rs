use std::sync::Arc;

use gtrack_core::consts::{EDGES_NODE, END_NODE, FORMAT_NODE, ID_NODE, START_NODE, VAL_NODE};
use gtrack_core::{ColumnSet, GtrackError, Result, TrackFormat};
use gtrack_store::StoreReader;

///
/// Supplies the format of a stored track.
///
pub trait TrackMetadata {
    fn track_format(&self) -> Result<TrackFormat>;
}

///
/// Reads the format name stored in the track store itself. Stores written
/// without a format name fall back to the set of stored columns.
///
pub struct StoredTrackMetadata {
    reader: Arc<StoreReader>,
}

impl StoredTrackMetadata {
    pub fn new(reader: Arc<StoreReader>) -> Self {
        StoredTrackMetadata { reader }
    }
}

impl TrackMetadata for StoredTrackMetadata {
    fn track_format(&self) -> Result<TrackFormat> {
        let mut store = self.reader.open()?;

        if store.has_node(FORMAT_NODE) {
            let array = store.get_node(FORMAT_NODE)?.read_all()?;
            let name = array
                .as_strings()
                .and_then(|names| names.first())
                .ok_or_else(|| GtrackError::InvalidFormat("empty format node".to_string()))?;
            return name.parse();
        }

        let columns = ColumnSet {
            starts: store.has_node(START_NODE),
            ends: store.has_node(END_NODE),
            vals: store.has_node(VAL_NODE),
            linked: store.has_node(ID_NODE) && store.has_node(EDGES_NODE),
        };
        TrackFormat::from_columns(columns)
    }
}

impl TrackMetadata for TrackFormat {
    fn track_format(&self) -> Result<TrackFormat> {
        Ok(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use gtrack_store::{Array, StoreWriter};

    #[rstest]
    fn test_format_from_format_node() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        let mut writer = StoreWriter::new();
        writer.add_array(FORMAT_NODE, Array::from_strings(vec!["Step function".into()]));
        writer.write(&path).unwrap();

        let metadata = StoredTrackMetadata::new(Arc::new(StoreReader::new(path)));
        assert_eq!(metadata.track_format().unwrap(), TrackFormat::StepFunction);
    }

    #[rstest]
    fn test_unknown_format_name_is_invalid() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        let mut writer = StoreWriter::new();
        writer.add_array(FORMAT_NODE, Array::from_strings(vec!["Wiggle".into()]));
        writer.write(&path).unwrap();

        let metadata = StoredTrackMetadata::new(Arc::new(StoreReader::new(path)));
        assert!(matches!(
            metadata.track_format(),
            Err(GtrackError::InvalidFormat(_))
        ));
    }

    #[rstest]
    fn test_format_from_stored_columns() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        let mut writer = StoreWriter::new();
        writer
            .add_array(START_NODE, Array::from_i64(vec![1]))
            .add_array(VAL_NODE, Array::from_f64(vec![1.0]));
        writer.write(&path).unwrap();

        let metadata = StoredTrackMetadata::new(Arc::new(StoreReader::new(path)));
        assert_eq!(metadata.track_format().unwrap(), TrackFormat::ValuedPoints);
    }
}
