use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;

use gtrack_core::{GtrackError, Result};

use crate::array::{Array, ArrayValues};
use crate::consts::{ITEM_SIZE, STORE_HEADER, STORE_VERSION};

///
/// Collects named arrays and writes them as one track store file.
///
#[derive(Debug, Default)]
pub struct StoreWriter {
    arrays: Vec<(String, Array)>,
}

impl StoreWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an array, replacing any earlier array with the same name
    pub fn add_array(&mut self, name: &str, array: Array) -> &mut Self {
        self.arrays.retain(|(n, _)| n != name);
        self.arrays.push((name.to_string(), array));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    ///
    /// Write all arrays to `path`.
    ///
    /// The file is written next to its destination first and renamed into
    /// place, so readers never observe a half-written store.
    ///
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        for (name, _) in &self.arrays {
            if name.len() > u16::MAX as usize {
                return Err(GtrackError::CorruptStore(format!(
                    "Node name too long: {}",
                    name
                )));
            }
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        {
            let file = File::create(tmp_path)?;
            let mut writer = BufWriter::new(file);
            self.write_to(&mut writer)?;
            writer.flush()?;
        }
        fs::rename(tmp_path, path)?;

        debug!(
            "Wrote track store {} with {} nodes",
            path.display(),
            self.arrays.len()
        );
        Ok(())
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let table_len: u64 = self
            .arrays
            .iter()
            .map(|(name, _)| 2 + name.len() as u64 + 1 + 4 * ITEM_SIZE)
            .sum();
        let mut offset = STORE_HEADER.len() as u64 + 1 + 4 + table_len;

        writer.write_all(STORE_HEADER)?;
        writer.write_u8(STORE_VERSION)?;
        writer.write_u32::<LittleEndian>(self.arrays.len() as u32)?;

        for (name, array) in &self.arrays {
            let length = block_len(array);
            writer.write_u16::<LittleEndian>(name.len() as u16)?;
            writer.write_all(name.as_bytes())?;
            writer.write_u8(array.dtype().flag())?;
            writer.write_u64::<LittleEndian>(array.rows() as u64)?;
            writer.write_u64::<LittleEndian>(array.width() as u64)?;
            writer.write_u64::<LittleEndian>(offset)?;
            writer.write_u64::<LittleEndian>(length)?;
            offset += length;
        }

        for (_, array) in &self.arrays {
            match array.values() {
                ArrayValues::Int64(values) => {
                    for v in values {
                        writer.write_i64::<LittleEndian>(*v)?;
                    }
                }
                ArrayValues::Float64(values) => {
                    for v in values {
                        writer.write_f64::<LittleEndian>(*v)?;
                    }
                }
                ArrayValues::Utf8(values) => {
                    let mut position = 0u64;
                    writer.write_u64::<LittleEndian>(position)?;
                    for v in values {
                        position += v.len() as u64;
                        writer.write_u64::<LittleEndian>(position)?;
                    }
                    for v in values {
                        writer.write_all(v.as_bytes())?;
                    }
                }
            }
        }

        Ok(())
    }
}

fn block_len(array: &Array) -> u64 {
    match array.values() {
        ArrayValues::Int64(v) => v.len() as u64 * ITEM_SIZE,
        ArrayValues::Float64(v) => v.len() as u64 * ITEM_SIZE,
        ArrayValues::Utf8(v) => {
            (v.len() as u64 + 1) * ITEM_SIZE + v.iter().map(|s| s.len() as u64).sum::<u64>()
        }
    }
}
