use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use fxhash::FxHashMap as HashMap;
use log::debug;

use gtrack_core::{GtrackError, Result};

use crate::array::{Array, ArrayValues};
use crate::consts::{ITEM_SIZE, STORE_HEADER, STORE_VERSION};
use crate::dtype::DType;

///
/// Handle to a track store file on disk.
///
/// The reader itself holds no open file. Every read goes through
/// [`StoreReader::open`], which returns a guard that owns the file handle for
/// exactly as long as the caller needs it.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreReader {
    path: PathBuf,
}

#[derive(Debug, Clone)]
struct NodeHeader {
    name: String,
    dtype: DType,
    rows: u64,
    width: u64,
    offset: u64,
    length: u64,
}

///
/// An open track store. The file is closed when this value is dropped.
///
pub struct OpenStore {
    path: PathBuf,
    reader: BufReader<File>,
    nodes: HashMap<String, NodeHeader>,
}

///
/// One named array inside an [`OpenStore`].
///
pub struct ArrayNode<'a> {
    reader: &'a mut BufReader<File>,
    header: NodeHeader,
}

impl StoreReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreReader { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    ///
    /// Open the store and read its node table.
    ///
    /// # Returns
    /// - a guard that closes the file on drop, or `NotFound` if the file doesn't exist
    pub fn open(&self) -> Result<OpenStore> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                GtrackError::NotFound(format!("Track store {}", self.path.display()))
            }
            _ => GtrackError::Io(e),
        })?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let nodes = read_node_table(&mut reader, file_len).map_err(|e| match e {
            GtrackError::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
                GtrackError::CorruptStore(format!("{} is truncated", self.path.display()))
            }
            other => other,
        })?;

        debug!("Opened track store {}", self.path.display());

        Ok(OpenStore {
            path: self.path.clone(),
            reader,
            nodes,
        })
    }
}

fn read_node_table<R: Read>(reader: &mut R, file_len: u64) -> Result<HashMap<String, NodeHeader>> {
    let mut header = [0; 4];
    reader.read_exact(&mut header)?;
    if &header != STORE_HEADER {
        return Err(GtrackError::CorruptStore(
            "File doesn't appear to be a valid track store".to_string(),
        ));
    }

    let version = reader.read_u8()?;
    if version != STORE_VERSION {
        return Err(GtrackError::CorruptStore(format!(
            "Unsupported store version {}",
            version
        )));
    }

    let n_nodes = reader.read_u32::<LittleEndian>()?;
    let mut nodes = HashMap::default();

    for _ in 0..n_nodes {
        let name_len = reader.read_u16::<LittleEndian>()?;
        let mut name = vec![0; name_len as usize];
        reader.read_exact(&mut name)?;
        let name = String::from_utf8(name)
            .map_err(|_| GtrackError::CorruptStore("Node name is not valid UTF-8".to_string()))?;

        let dtype = DType::from_flag(reader.read_u8()?)?;
        let rows = reader.read_u64::<LittleEndian>()?;
        let width = reader.read_u64::<LittleEndian>()?;
        let offset = reader.read_u64::<LittleEndian>()?;
        let length = reader.read_u64::<LittleEndian>()?;

        if width == 0 || offset.saturating_add(length) > file_len {
            return Err(GtrackError::CorruptStore(format!(
                "Node '{}' points outside the file",
                name
            )));
        }

        // utf8 nodes carry one more offset than they have items
        let items = rows
            .checked_mul(width)
            .and_then(|n| match dtype {
                DType::Utf8 => n.checked_add(1),
                DType::Int64 | DType::Float64 => Some(n),
            })
            .and_then(|n| n.checked_mul(ITEM_SIZE));
        if items.is_none_or(|size| size > length) {
            return Err(GtrackError::CorruptStore(format!(
                "Node '{}' holds {} x {} items but only {} bytes",
                name, rows, width, length
            )));
        }

        nodes.insert(
            name.clone(),
            NodeHeader {
                name,
                dtype,
                rows,
                width,
                offset,
                length,
            },
        );
    }

    Ok(nodes)
}

impl OpenStore {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn get_node(&mut self, name: &str) -> Result<ArrayNode<'_>> {
        let header = self
            .nodes
            .get(name)
            .cloned()
            .ok_or_else(|| {
                GtrackError::NotFound(format!("Node '{}' in {}", name, self.path.display()))
            })?;

        Ok(ArrayNode {
            reader: &mut self.reader,
            header,
        })
    }

    /// Close the store. Dropping the value has the same effect.
    pub fn close(self) {}
}

impl Drop for OpenStore {
    fn drop(&mut self) {
        debug!("Closed track store {}", self.path.display());
    }
}

impl ArrayNode<'_> {
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn dtype(&self) -> DType {
        self.header.dtype
    }

    /// `(rows, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.header.rows as usize, self.header.width as usize)
    }

    pub fn rows(&self) -> usize {
        self.header.rows as usize
    }

    pub fn read_all(&mut self) -> Result<Array> {
        self.read(0, self.rows(), 1)
    }

    ///
    /// Read the rows `[start, end)` taking every `step`th row.
    ///
    pub fn read(&mut self, start: usize, end: usize, step: usize) -> Result<Array> {
        if start > end || end > self.rows() {
            return Err(GtrackError::InvalidOffset {
                start: start as i64,
                end: end as i64,
                len: self.rows(),
            });
        }

        let width = self.header.width as usize;
        let first_item = (start * width) as u64;
        let n_items = (end - start) * width;

        let values = match self.header.dtype {
            DType::Int64 => {
                self.seek_item(first_item)?;
                let mut values = vec![0i64; n_items];
                self.reader.read_i64_into::<LittleEndian>(&mut values)?;
                ArrayValues::Int64(values)
            }
            DType::Float64 => {
                self.seek_item(first_item)?;
                let mut values = vec![0f64; n_items];
                self.reader.read_f64_into::<LittleEndian>(&mut values)?;
                ArrayValues::Float64(values)
            }
            DType::Utf8 => ArrayValues::Utf8(self.read_strings(first_item, n_items)?),
        };

        let array = Array::new(values, width)?;
        if step > 1 {
            Ok(array.slice_rows(0, end - start, step))
        } else {
            Ok(array)
        }
    }

    fn seek_item(&mut self, item: u64) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(self.header.offset + item * ITEM_SIZE))?;
        Ok(())
    }

    fn read_strings(&mut self, first_item: u64, n_items: usize) -> Result<Vec<String>> {
        let total_items = self.header.rows * self.header.width;

        // offsets [first_item, first_item + n_items] bracket the wanted bytes
        self.seek_item(first_item)?;
        let mut offsets = vec![0u64; n_items + 1];
        self.reader.read_u64_into::<LittleEndian>(&mut offsets)?;

        let string_area = self.header.offset + (total_items + 1) * ITEM_SIZE;
        let first = offsets[0];
        let last = offsets[n_items];
        if last < first || string_area + last > self.header.offset + self.header.length {
            return Err(GtrackError::CorruptStore(format!(
                "String offsets of node '{}' are out of range",
                self.header.name
            )));
        }

        self.reader.seek(SeekFrom::Start(string_area + first))?;
        let mut bytes = vec![0u8; (last - first) as usize];
        self.reader.read_exact(&mut bytes)?;

        offsets
            .windows(2)
            .map(|w| {
                let (lo, hi) = ((w[0] - first) as usize, (w[1] - first) as usize);
                if hi < lo || hi > bytes.len() {
                    return Err(GtrackError::CorruptStore(format!(
                        "String offsets of node '{}' are not ascending",
                        self.header.name
                    )));
                }
                String::from_utf8(bytes[lo..hi].to_vec()).map_err(|_| {
                    GtrackError::CorruptStore(format!(
                        "Node '{}' holds invalid UTF-8",
                        self.header.name
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use tempfile::TempDir;

    use crate::writer::StoreWriter;

    #[fixture]
    fn store() -> (TempDir, StoreReader) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");

        let mut writer = StoreWriter::new();
        writer.add_array("start", Array::from_i64(vec![100, 150, 200, 300]));
        writer.add_array("val", Array::from_f64(vec![1.5, 2.5, 3.5, 4.5]));
        writer.add_array(
            "id",
            Array::from_strings(vec!["a".into(), "bb".into(), "".into(), "dddd".into()]),
        );
        writer.add_array(
            "edges",
            Array::new(
                ArrayValues::Utf8(vec![
                    "b".into(),
                    "".into(),
                    "a".into(),
                    "c".into(),
                    "".into(),
                    "".into(),
                    "a".into(),
                    "b".into(),
                ]),
                2,
            )
            .unwrap(),
        );
        writer.write(&path).unwrap();

        (tempdir, StoreReader::new(path))
    }

    #[rstest]
    fn test_open_missing_store_is_not_found() {
        let tempdir = tempfile::tempdir().unwrap();
        let reader = StoreReader::new(tempdir.path().join("missing.gtc"));
        assert!(matches!(reader.open(), Err(GtrackError::NotFound(_))));
    }

    #[rstest]
    fn test_open_rejects_foreign_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a store at all").unwrap();

        let reader = StoreReader::new(file.path());
        assert!(matches!(reader.open(), Err(GtrackError::CorruptStore(_))));
    }

    #[rstest]
    fn test_open_rejects_truncated_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"GTCS").unwrap();

        let reader = StoreReader::new(file.path());
        assert!(matches!(reader.open(), Err(GtrackError::CorruptStore(_))));
    }

    #[rstest]
    #[case(1 << 40)]
    #[case(u64::MAX)]
    fn test_open_rejects_rows_beyond_node_length(#[case] rows: u64) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("store.gtc");
        let mut writer = StoreWriter::new();
        writer.add_array("start", Array::from_i64(vec![1, 2, 3]));
        writer.write(&path).unwrap();

        // magic, version, node count, name length, "start", dtype flag
        let rows_at = 4 + 1 + 4 + 2 + "start".len() + 1;
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[rows_at..rows_at + 8].copy_from_slice(&rows.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let result = StoreReader::new(&path).open();
        assert!(matches!(result, Err(GtrackError::CorruptStore(_))));
    }

    #[rstest]
    fn test_missing_node_is_not_found(store: (TempDir, StoreReader)) {
        let (_dir, reader) = store;
        let mut open = reader.open().unwrap();
        assert!(matches!(open.get_node("end"), Err(GtrackError::NotFound(_))));
    }

    #[rstest]
    fn test_node_names_and_shape(store: (TempDir, StoreReader)) {
        let (_dir, reader) = store;
        let mut open = reader.open().unwrap();
        assert_eq!(open.node_names(), vec!["edges", "id", "start", "val"]);

        let node = open.get_node("edges").unwrap();
        assert_eq!(node.shape(), (4, 2));
        assert_eq!(node.dtype(), DType::Utf8);
    }

    #[rstest]
    fn test_read_numeric_slices(store: (TempDir, StoreReader)) {
        let (_dir, reader) = store;
        let mut open = reader.open().unwrap();

        let starts = open.get_node("start").unwrap().read(1, 3, 1).unwrap();
        assert_eq!(starts.as_i64().unwrap(), &[150, 200]);

        let vals = open.get_node("val").unwrap().read(0, 4, 2).unwrap();
        assert_eq!(vals.as_f64().unwrap(), &[1.5, 3.5]);
    }

    #[rstest]
    fn test_read_string_slices(store: (TempDir, StoreReader)) {
        let (_dir, reader) = store;
        let mut open = reader.open().unwrap();

        let ids = open.get_node("id").unwrap().read(1, 4, 1).unwrap();
        assert_eq!(ids.as_strings().unwrap(), &["bb", "", "dddd"]);

        let edges = open.get_node("edges").unwrap().read(1, 2, 1).unwrap();
        assert_eq!(edges.as_strings().unwrap(), &["a", "c"]);
    }

    #[rstest]
    fn test_read_out_of_range(store: (TempDir, StoreReader)) {
        let (_dir, reader) = store;
        let mut open = reader.open().unwrap();
        let result = open.get_node("start").unwrap().read(2, 5, 1);
        assert!(matches!(result, Err(GtrackError::InvalidOffset { .. })));
    }

    #[rstest]
    fn test_read_empty_slice(store: (TempDir, StoreReader)) {
        let (_dir, reader) = store;
        let mut open = reader.open().unwrap();
        let ids = open.get_node("id").unwrap().read(2, 2, 1).unwrap();
        assert!(ids.is_empty());
    }
}
