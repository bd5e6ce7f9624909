//! Host-side collaborators: frame extraction, surface writes, and owner-thread call marshaling.

/// Owner-thread call marshaling.
pub mod proxy;
/// In-memory raster host with PNG export/import.
pub mod raster;
/// Write-side host interface.
pub mod sink;
/// Read-side host interface and mask helpers.
pub mod source;
