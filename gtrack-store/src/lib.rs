//! Columnar storage for gtrack.
//!
//! A track store is one binary file holding named, row-aligned arrays: one
//! array per element field (`start`, `end`, `val`, ...), the bounding region
//! table and the track format. The store is only ever read through a scoped
//! handle: [`StoreReader::open`] returns an [`OpenStore`] that closes its file
//! when dropped, so no handle outlives the read it was opened for.
//!
//! [`VirtualColumn`] builds on top of this: an offset-addressable view over
//! one stored array that materializes lazily and caches what it read.
//!
//! ```no_run
//! use std::sync::Arc;
//! use gtrack_store::{StoreReader, VirtualColumn};
//!
//! # fn main() -> gtrack_core::Result<()> {
//! let reader = Arc::new(StoreReader::new("noOverlaps.gtc"));
//! let mut starts = VirtualColumn::new(reader, "start", 0, 10)?;
//! starts.update_offset(Some(2), Some(-2), None)?;
//! let values = starts.i64_values()?;
//! assert_eq!(values.len(), 6);
//! # Ok(())
//! # }
//! ```
pub mod array;
pub mod consts;
pub mod dtype;
pub mod reader;
pub mod virtual_column;
pub mod writer;

// re-exports
pub use self::array::{Array, ArrayValues};
pub use self::dtype::DType;
pub use self::reader::{ArrayNode, OpenStore, StoreReader};
pub use self::virtual_column::VirtualColumn;
pub use self::writer::StoreWriter;
