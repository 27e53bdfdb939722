use std::sync::Arc;

use log::debug;

use gtrack_core::{GtrackError, Result};

use crate::array::Array;
use crate::dtype::DType;
use crate::reader::StoreReader;

/// A materialized slice together with the row range it is valid for.
#[derive(Debug, Clone, PartialEq)]
struct CachedSlice {
    start_index: usize,
    end_index: usize,
    step: usize,
    array: Array,
}

///
/// An offset-addressable, lazily materialized view over one stored array.
///
/// The column addresses the rows `[start_index, end_index)` (every `step`th
/// row) of the node `node_name`. Nothing is read until [`VirtualColumn::as_array`]
/// or [`VirtualColumn::materialize`] is called; `as_array` keeps what it read.
///
/// Narrowing the offset to a range nested inside the cached one slices the
/// cache in place. Any other offset change drops the cache.
///
/// Cloning a column copies the cache; the clone and the original never share
/// mutable state afterwards.
///
#[derive(Debug, Clone)]
pub struct VirtualColumn {
    reader: Arc<StoreReader>,
    node_name: String,
    start_index: usize,
    end_index: usize,
    step: usize,
    shape: (usize, usize),
    dtype: DType,
    cache: Option<CachedSlice>,
}

impl VirtualColumn {
    ///
    /// Bind a column to `node_name` in the store behind `reader`.
    ///
    /// Opens the store once to learn the node's shape and dtype.
    ///
    /// # Returns
    /// - the column, or `NotFound` if the store or the node doesn't exist
    pub fn new(
        reader: Arc<StoreReader>,
        node_name: &str,
        start_index: usize,
        end_index: usize,
    ) -> Result<Self> {
        let (shape, dtype) = {
            let mut store = reader.open()?;
            let node = store.get_node(node_name)?;
            (node.shape(), node.dtype())
        };

        let mut column = VirtualColumn {
            reader,
            node_name: node_name.to_string(),
            start_index: 0,
            end_index: 0,
            step: 1,
            shape,
            dtype,
            cache: None,
        };
        column.set_offset(start_index, end_index, 1)?;
        Ok(column)
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn reader(&self) -> &Arc<StoreReader> {
        &self.reader
    }

    /// `(rows, width)` of the whole stored array
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn offset(&self) -> (usize, usize) {
        (self.start_index, self.end_index)
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    ///
    /// Move the column to the absolute rows `[start_index, end_index)`.
    ///
    pub fn set_offset(&mut self, start_index: usize, end_index: usize, step: usize) -> Result<()> {
        if start_index > end_index || end_index > self.shape.0 {
            return Err(GtrackError::InvalidOffset {
                start: start_index as i64,
                end: end_index as i64,
                len: self.shape.0,
            });
        }
        let step = step.max(1);

        if let Some(cache) = self.cache.take() {
            let nested = cache.step == 1
                && start_index >= cache.start_index
                && end_index <= cache.end_index;

            if nested {
                let array = cache.array.slice_rows(
                    start_index - cache.start_index,
                    end_index - cache.start_index,
                    step,
                );
                self.cache = Some(CachedSlice {
                    start_index,
                    end_index,
                    step,
                    array,
                });
            } else {
                debug!(
                    "Dropping cache of '{}' for offset [{}, {})",
                    self.node_name, start_index, end_index
                );
            }
        }

        self.start_index = start_index;
        self.end_index = end_index;
        self.step = step;
        Ok(())
    }

    ///
    /// Reslice relative to the current window.
    ///
    /// Non-negative indices count from the current start, negative ones from
    /// the current end. `None` keeps the current bound. On an empty column
    /// this does nothing.
    ///
    pub fn update_offset(
        &mut self,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<usize>,
    ) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let translate = |relative: Option<i64>, default: usize| -> i64 {
            match relative {
                Some(r) if r >= 0 => self.start_index as i64 + r,
                Some(r) => self.end_index as i64 + r,
                None => default as i64,
            }
        };
        let start_index = translate(start, self.start_index);
        let end_index = translate(stop, self.end_index);

        if start_index < 0 || end_index < start_index {
            return Err(GtrackError::InvalidOffset {
                start: start_index,
                end: end_index,
                len: self.shape.0,
            });
        }

        self.set_offset(start_index as usize, end_index as usize, step.unwrap_or(1))
    }

    ///
    /// Read the addressed rows from the store. The cache is left untouched.
    ///
    pub fn materialize(&self) -> Result<Array> {
        let mut store = self.reader.open()?;
        let array = store
            .get_node(&self.node_name)?
            .read(self.start_index, self.end_index, self.step)?;
        store.close();
        Ok(array)
    }

    ///
    /// The addressed rows, read from the store once and cached.
    ///
    pub fn as_array(&mut self) -> Result<&Array> {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => CachedSlice {
                start_index: self.start_index,
                end_index: self.end_index,
                step: self.step,
                array: self.materialize()?,
            },
        };
        Ok(&self.cache.insert(cache).array)
    }

    /// The cached rows, if the column has been materialized through [`VirtualColumn::as_array`]
    pub fn cached(&self) -> Option<&Array> {
        self.cache.as_ref().map(|cache| &cache.array)
    }

    pub fn i64_values(&mut self) -> Result<&[i64]> {
        self.check_dtype(DType::Int64)?;
        self.as_array()?
            .as_i64()
            .ok_or_else(|| GtrackError::CorruptStore("int64 node without int64 data".into()))
    }

    pub fn f64_values(&mut self) -> Result<&[f64]> {
        self.check_dtype(DType::Float64)?;
        self.as_array()?
            .as_f64()
            .ok_or_else(|| GtrackError::CorruptStore("float64 node without float64 data".into()))
    }

    pub fn string_values(&mut self) -> Result<&[String]> {
        self.check_dtype(DType::Utf8)?;
        self.as_array()?
            .as_strings()
            .ok_or_else(|| GtrackError::CorruptStore("utf8 node without utf8 data".into()))
    }

    ///
    /// Ends of a points track: each point covers exactly one base, so the end
    /// is `start + 1`. The column must address the stored starts.
    ///
    pub fn ends_from_starts(&self) -> Result<Vec<i64>> {
        self.check_dtype(DType::Int64)?;
        let materialized;
        let starts = match &self.cache {
            Some(cache) => &cache.array,
            None => {
                materialized = self.materialize()?;
                &materialized
            }
        };

        Ok(starts
            .as_i64()
            .unwrap_or_default()
            .iter()
            .map(|s| s + 1)
            .collect())
    }

    fn check_dtype(&self, expected: DType) -> Result<()> {
        if self.dtype != expected {
            return Err(GtrackError::DtypeMismatch {
                node: self.node_name.clone(),
                expected: expected.to_string(),
                found: self.dtype.to_string(),
            });
        }
        Ok(())
    }
}
