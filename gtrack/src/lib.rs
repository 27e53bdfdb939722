//! Genomic tracks stored as columnar arrays.
//!
//! Each part of gtrack lives in its own crate and is re-exported here behind
//! a cargo feature:
//!
//! | feature | crate          | contents                                       |
//! |---------|----------------|------------------------------------------------|
//! | `core`  | `gtrack-core`  | regions, track names, formats, errors, config  |
//! | `store` | `gtrack-store` | the on-disk columnar store and virtual columns |
//! | `track` | `gtrack-track` | tracks, track views, preprocessing, catalogue  |
//! | `tools` | `gtrack-tools` | coverage, overlap, counts, sums, aggregation   |
#[cfg(feature = "core")]
#[doc(inline)]
pub use gtrack_core as core;

#[cfg(feature = "store")]
#[doc(inline)]
pub use gtrack_store as store;

#[cfg(feature = "track")]
#[doc(inline)]
pub use gtrack_track as track;

#[cfg(feature = "tools")]
#[doc(inline)]
pub use gtrack_tools as tools;
