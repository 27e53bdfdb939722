//! Tracks and track views.
//!
//! A [`Track`] is a handle on one stored track (genome, hierarchical name and
//! overlap variant). It owns no element data; [`Track::get_track_view`]
//! restricts the track to one [`GenomeRegion`](gtrack_core::GenomeRegion) and
//! returns a [`TrackView`] made of offset-synchronized
//! [`VirtualColumn`](gtrack_store::VirtualColumn)s, one per active field of the
//! track's [`TrackFormat`](gtrack_core::TrackFormat).
//!
//! The track's data is partitioned into bounding regions, see
//! [`BoundingRegionHandler`]. [`TrackBuilder`] turns already parsed elements
//! into track stores, and the [`catalog`] module lists what is on disk.
pub mod bounding_region;
pub mod catalog;
pub mod metadata;
pub mod preprocess;
pub mod track;
pub mod track_view;

// re-exports
pub use self::bounding_region::BoundingRegionHandler;
pub use self::metadata::{StoredTrackMetadata, TrackMetadata};
pub use self::preprocess::{GenomeElement, TrackBuilder};
pub use self::track::Track;
pub use self::track_view::{TrackElement, TrackElementIter, TrackView, ViewColumns};
