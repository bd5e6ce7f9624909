//! Layer-border is a border growth engine for image layers.
//!
//! A border is grown around the opaque pixels of a layer by a bit-field automaton driven by a
//! [`Recipe`], then written back to the host, once per frame for animations. The public API is
//! run-oriented:
//!
//! - Describe the run with [`BorderOpts`] (or load a [`BorderConfig`])
//! - Create a [`Border`] and keep its [`PipelineStatus`] handle for cancellation
//! - Run it against any [`Host`], such as the in-memory [`RasterHost`]
//!
//! Hosts are single-owner resources. Worker threads reach them through [`HostClient`], which
//! marshals every call onto the thread running the [`HostService`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Growth automaton, policies and recipes.
pub mod growth;
/// Host interfaces and implementations.
pub mod host;
/// Reader, generator and writer stages.
pub mod pipeline;
/// Orchestration, rollback and configuration.
pub mod session;

pub use crate::foundation::core::{Canvas, FrameIndex, FrameRange, OpacityMask, Rect};
pub use crate::foundation::error::{BorderError, BorderResult};

pub use crate::growth::automaton::GrowthAutomaton;
pub use crate::growth::index::IndexWidth;
pub use crate::growth::policy::{GrowthPolicy, NeighborFlags};
pub use crate::growth::recipe::{Recipe, RecipePreset, RecipeStep};
pub use crate::host::proxy::{HostClient, HostService};
pub use crate::host::raster::{RasterHost, Surface};
pub use crate::host::sink::{FrameSink, Host, SurfaceId};
pub use crate::host::source::{AlphaMatch, FrameSource};
pub use crate::pipeline::progress::{Phase, Progress};
pub use crate::pipeline::status::PipelineStatus;
pub use crate::session::border::{Border, BorderOpts, BorderOutcome, BorderReport};
pub use crate::session::config::BorderConfig;
